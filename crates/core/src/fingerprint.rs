//! Content fingerprinting.
//!
//! A [`Digest`] is the lowercase hex SHA-256 of a file's full byte content.
//! Files are streamed through the hasher in fixed [`CHUNK_SIZE`] reads so
//! memory stays bounded regardless of file size. The digest depends on
//! content only, never on name, path, or timestamps.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use sha2::{Digest as _, Sha256};
use tracing::debug;

use crate::errors::FingerprintError;

/// Bytes read per hashing step.
pub const CHUNK_SIZE: usize = 4096;

/// Hex-encoded SHA-256 content digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest(String);

impl Digest {
    /// The digest as a 64-character lowercase hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hash everything `reader` yields, one chunk at a time.
pub fn fingerprint_reader<R: Read>(mut reader: R) -> io::Result<Digest> {
    let mut hasher = Sha256::new();
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }
    Ok(Digest(hex::encode(hasher.finalize())))
}

/// Compute the content digest of the file at `path`.
pub fn fingerprint(path: &Path) -> Result<Digest, FingerprintError> {
    let to_err = |source| FingerprintError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(to_err)?;
    let digest = fingerprint_reader(file).map_err(to_err)?;
    debug!(path = %path.display(), digest = %digest, "fingerprinted file");
    Ok(digest)
}
