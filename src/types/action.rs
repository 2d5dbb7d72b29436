//! Decision - What the reconciler does with each entry name

use super::EntryKind;
use std::fmt;

/// Per-entry reconciliation decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Exists only in source
    Copy,

    /// Exists only in destination (mirror mode)
    Delete,

    /// Exists only in destination (merge mode), left untouched
    Keep,

    /// Exists in both and differs
    Replace(ReplaceReason),

    /// Exists in both and is considered identical
    Skip(SkipReason),

    /// Both sides are directories
    Recurse,
}

impl Decision {
    /// Upper-case label written to the log
    pub fn label(&self) -> &'static str {
        match self {
            Decision::Copy => "COPY",
            Decision::Delete => "DELETE",
            Decision::Keep => "KEEP",
            Decision::Replace(_) => "REPLACE",
            Decision::Skip(_) => "SKIP",
            Decision::Recurse => "RECURSE",
        }
    }

    /// Comparison reason, present for REPLACE and SKIP only
    pub fn reason(&self) -> Option<String> {
        match self {
            Decision::Replace(reason) => Some(reason.to_string()),
            Decision::Skip(reason) => Some(reason.to_string()),
            _ => None,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why two entries with the same name were judged different
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaceReason {
    SizeDiffers { source: u64, destination: u64 },
    SourceNewer,
    KindMismatch {
        source: EntryKind,
        destination: EntryKind,
    },
    LinkTargetDiffers,
}

impl fmt::Display for ReplaceReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplaceReason::SizeDiffers {
                source,
                destination,
            } => write!(f, "size differs ({} -> {} bytes)", destination, source),
            ReplaceReason::SourceNewer => f.write_str("source is newer"),
            ReplaceReason::KindMismatch {
                source,
                destination,
            } => write!(f, "{} replaced by {}", destination, source),
            ReplaceReason::LinkTargetDiffers => f.write_str("link target differs"),
        }
    }
}

/// Why two entries with the same name were judged identical
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Same size and same modification time
    Identical,
    /// Same size, destination modified more recently
    DestinationNewer,
    SameLinkTarget,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::Identical => "same size and modification time",
            SkipReason::DestinationNewer => "same size, destination is newer",
            SkipReason::SameLinkTarget => "same link target",
        };
        f.write_str(text)
    }
}

/// What happens to entries found only in the destination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// Delete destination-only entries
    #[default]
    Mirror,

    /// Keep destination-only entries
    Merge,
}

impl SyncMode {
    pub fn from_merge_flag(merge: bool) -> Self {
        if merge {
            SyncMode::Merge
        } else {
            SyncMode::Mirror
        }
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncMode::Mirror => f.write_str("mirror"),
            SyncMode::Merge => f.write_str("merge"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(Decision::Copy.label(), "COPY");
        assert_eq!(Decision::Delete.label(), "DELETE");
        assert_eq!(Decision::Keep.label(), "KEEP");
        assert_eq!(Decision::Replace(ReplaceReason::SourceNewer).label(), "REPLACE");
        assert_eq!(Decision::Skip(SkipReason::Identical).label(), "SKIP");
        assert_eq!(Decision::Recurse.label(), "RECURSE");
    }

    #[test]
    fn test_reason_only_for_replace_and_skip() {
        assert!(Decision::Copy.reason().is_none());
        assert!(Decision::Recurse.reason().is_none());
        assert_eq!(
            Decision::Skip(SkipReason::Identical).reason().as_deref(),
            Some("same size and modification time")
        );

        let replace = Decision::Replace(ReplaceReason::SizeDiffers {
            source: 10,
            destination: 20,
        });
        assert_eq!(replace.reason().as_deref(), Some("size differs (20 -> 10 bytes)"));
    }

    #[test]
    fn test_display_uses_label() {
        assert_eq!(Decision::Copy.to_string(), "COPY");
        assert_eq!(Decision::Replace(ReplaceReason::SourceNewer).to_string(), "REPLACE");
        assert_eq!(Decision::Skip(SkipReason::Identical).to_string(), "SKIP");
    }

    #[test]
    fn test_kind_mismatch_reason() {
        let reason = ReplaceReason::KindMismatch {
            source: EntryKind::Dir,
            destination: EntryKind::File,
        };
        assert_eq!(reason.to_string(), "file replaced by directory");
    }

    #[test]
    fn test_sync_mode_from_flag() {
        assert_eq!(SyncMode::from_merge_flag(true), SyncMode::Merge);
        assert_eq!(SyncMode::from_merge_flag(false), SyncMode::Mirror);
        assert_eq!(SyncMode::default(), SyncMode::Mirror);
    }
}
