//! Pass planning: the pure classification step.
//!
//! Given a source and a destination [`Snapshot`], [`plan`] decides what each
//! file needs without touching the disk.
//!
//! # Decision model
//!
//! | Condition | Action |
//! |-----------|--------|
//! | In source, absent from destination | `Copy { reason: New }` |
//! | In both, modification times differ | `Copy { reason: MetadataChanged }` |
//! | In both, modification times equal | `Verify` (hash both sides) |
//! | In destination only | `Remove` |
//!
//! `Verify` is resolved by the engine: differing digests become a copy with
//! [`CopyReason::ContentUpdated`], equal digests mean the file is unchanged.

use std::fmt;

use crate::snapshot::Snapshot;

/// Why a file is being copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CopyReason {
    New,
    MetadataChanged,
    ContentUpdated,
}

impl CopyReason {
    pub fn label(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::MetadataChanged => "metadata changed",
            Self::ContentUpdated => "content updated",
        }
    }
}

impl fmt::Display for CopyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One decision for one file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlannedAction {
    Copy { name: String, reason: CopyReason },
    /// Metadata is equal; compare content digests before deciding.
    Verify { name: String },
    Remove { name: String },
}

impl PlannedAction {
    pub fn name(&self) -> &str {
        match self {
            Self::Copy { name, .. } | Self::Verify { name } | Self::Remove { name } => name,
        }
    }
}

/// Classify every file in both snapshots.
///
/// Source-side decisions come first, then removals, each in name order.
/// No decision depends on any other, so executing them in a different order
/// reaches the same end state.
pub fn plan(source: &Snapshot, dest: &Snapshot) -> Vec<PlannedAction> {
    let mut actions = Vec::with_capacity(source.len());

    for (name, src) in source.iter() {
        let action = match dest.get(name) {
            None => PlannedAction::Copy {
                name: name.to_string(),
                reason: CopyReason::New,
            },
            Some(dst) if dst.modified != src.modified => PlannedAction::Copy {
                name: name.to_string(),
                reason: CopyReason::MetadataChanged,
            },
            Some(_) => PlannedAction::Verify {
                name: name.to_string(),
            },
        };
        actions.push(action);
    }

    for name in dest.names() {
        if !source.contains(name) {
            actions.push(PlannedAction::Remove {
                name: name.to_string(),
            });
        }
    }

    actions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::FileEntry;
    use std::time::{Duration, UNIX_EPOCH};

    fn entry(secs: u64) -> FileEntry {
        FileEntry::new(UNIX_EPOCH + Duration::from_secs(secs), 10)
    }

    fn snap(files: &[(&str, u64)]) -> Snapshot {
        files
            .iter()
            .map(|(n, t)| (n.to_string(), entry(*t)))
            .collect()
    }

    #[test]
    fn test_empty_destination_copies_everything_as_new() {
        let actions = plan(&snap(&[("a.txt", 1), ("b.txt", 2)]), &Snapshot::new());
        assert_eq!(
            actions,
            vec![
                PlannedAction::Copy {
                    name: "a.txt".into(),
                    reason: CopyReason::New
                },
                PlannedAction::Copy {
                    name: "b.txt".into(),
                    reason: CopyReason::New
                },
            ]
        );
    }

    #[test]
    fn test_mtime_difference_is_metadata_change() {
        let actions = plan(&snap(&[("a.txt", 5)]), &snap(&[("a.txt", 4)]));
        assert_eq!(
            actions,
            vec![PlannedAction::Copy {
                name: "a.txt".into(),
                reason: CopyReason::MetadataChanged
            }]
        );
    }

    #[test]
    fn test_older_source_still_copies() {
        let actions = plan(&snap(&[("a.txt", 3)]), &snap(&[("a.txt", 9)]));
        assert!(matches!(
            actions[0],
            PlannedAction::Copy {
                reason: CopyReason::MetadataChanged,
                ..
            }
        ));
    }

    #[test]
    fn test_equal_mtime_needs_verification() {
        let actions = plan(&snap(&[("a.txt", 7)]), &snap(&[("a.txt", 7)]));
        assert_eq!(
            actions,
            vec![PlannedAction::Verify {
                name: "a.txt".into()
            }]
        );
    }

    #[test]
    fn test_destination_only_files_are_removed() {
        let actions = plan(&snap(&[("a.txt", 1)]), &snap(&[("a.txt", 1), ("c.txt", 1)]));
        assert_eq!(
            actions,
            vec![
                PlannedAction::Verify {
                    name: "a.txt".into()
                },
                PlannedAction::Remove {
                    name: "c.txt".into()
                },
            ]
        );
    }

    #[test]
    fn test_empty_source_removes_everything() {
        let actions = plan(&Snapshot::new(), &snap(&[("x", 1), ("y", 2)]));
        assert!(actions
            .iter()
            .all(|a| matches!(a, PlannedAction::Remove { .. })));
        assert_eq!(actions.len(), 2);
    }

    #[test]
    fn test_reason_labels() {
        assert_eq!(CopyReason::New.to_string(), "new");
        assert_eq!(CopyReason::MetadataChanged.to_string(), "metadata changed");
        assert_eq!(CopyReason::ContentUpdated.to_string(), "content updated");
    }
}
