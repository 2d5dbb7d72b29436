//! Entry comparison logic

use crate::types::{Decision, DirEntry, EntryKind, ReplaceReason, SkipReason};
use std::cmp::Ordering;

/// Decide what to do with a name present on both sides.
///
/// - Both directories → `Recurse`
/// - Kinds differ → `Replace(KindMismatch)`
/// - Both symlinks → compared by link target
/// - Both files → [`compare_files`]
pub fn compare_entries(src: &DirEntry, dest: &DirEntry) -> Decision {
    match (src.kind, dest.kind) {
        (EntryKind::Dir, EntryKind::Dir) => Decision::Recurse,
        (EntryKind::File, EntryKind::File) => compare_files(src, dest),
        (EntryKind::Symlink, EntryKind::Symlink) => {
            if src.symlink_target == dest.symlink_target {
                Decision::Skip(SkipReason::SameLinkTarget)
            } else {
                Decision::Replace(ReplaceReason::LinkTargetDiffers)
            }
        }
        (source, destination) => Decision::Replace(ReplaceReason::KindMismatch {
            source,
            destination,
        }),
    }
}

/// Compare two regular files by metadata only
///
/// 1. **Size mismatch**: sizes differ → Replace, regardless of timestamps
/// 2. **Modification time**:
///    - Source newer → Replace
///    - Destination newer → Skip
///    - Same mtime → Skip (identical)
///
/// No content hashing is done.
pub fn compare_files(src: &DirEntry, dest: &DirEntry) -> Decision {
    if src.size != dest.size {
        return Decision::Replace(ReplaceReason::SizeDiffers {
            source: src.size,
            destination: dest.size,
        });
    }

    match src.mtime.cmp(&dest.mtime) {
        Ordering::Greater => Decision::Replace(ReplaceReason::SourceNewer),
        Ordering::Less => Decision::Skip(SkipReason::DestinationNewer),
        Ordering::Equal => Decision::Skip(SkipReason::Identical),
    }
}
