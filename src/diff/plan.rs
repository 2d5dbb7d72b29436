//! Per-directory plan generation

use crate::diff::compare_entries;
use crate::types::{Decision, DirEntry, SyncMode};
use std::collections::BTreeMap;
use std::ffi::OsString;

/// Entries of one directory, keyed by name.
///
/// A `BTreeMap` keeps iteration in sorted name order so runs are
/// deterministic. Names compare byte-wise (case-sensitive).
pub type Listing = BTreeMap<OsString, DirEntry>;

/// One planned decision for a single name
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedAction {
    pub name: OsString,
    pub decision: Decision,
    /// Entry on the source side, if present
    pub source: Option<DirEntry>,
    /// Entry on the destination side, if present
    pub destination: Option<DirEntry>,
}

/// Decisions for every name in a source/destination directory pair
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LevelPlan {
    pub actions: Vec<PlannedAction>,
    pub stats: PlanStats,
}

impl LevelPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an action to the plan and update statistics
    pub fn add_action(&mut self, action: PlannedAction) {
        match &action.decision {
            Decision::Copy => self.stats.copy_count += 1,
            Decision::Delete => self.stats.delete_count += 1,
            Decision::Keep => self.stats.keep_count += 1,
            Decision::Replace(_) => self.stats.replace_count += 1,
            Decision::Skip(_) => self.stats.skip_count += 1,
            Decision::Recurse => self.stats.recurse_count += 1,
        }
        self.actions.push(action);
    }

    /// True when nothing in this directory needs to change
    pub fn is_noop(&self) -> bool {
        self.stats.copy_count == 0 && self.stats.delete_count == 0 && self.stats.replace_count == 0
    }
}

/// Decision counts for a [`LevelPlan`]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PlanStats {
    pub copy_count: usize,
    pub delete_count: usize,
    pub keep_count: usize,
    pub replace_count: usize,
    pub skip_count: usize,
    pub recurse_count: usize,
}

/// Compare two directory listings and decide what to do with every name.
///
/// Actions come out in three groups, each sorted by name:
/// destination-only names (DELETE or KEEP depending on `mode`), then
/// source-only names (COPY), then names present on both sides.
///
/// # Example
/// ```
/// use dirsync::diff::{plan_level, Listing};
/// use dirsync::types::{Decision, DirEntry, SyncMode};
/// use std::time::UNIX_EPOCH;
///
/// let mut src = Listing::new();
/// src.insert("new.txt".into(), DirEntry::file("new.txt", 4, UNIX_EPOCH));
/// let mut dest = Listing::new();
/// dest.insert("old.txt".into(), DirEntry::file("old.txt", 4, UNIX_EPOCH));
///
/// let plan = plan_level(&src, &dest, SyncMode::Mirror);
/// assert_eq!(plan.actions[0].decision, Decision::Delete);
/// assert_eq!(plan.actions[1].decision, Decision::Copy);
/// ```
pub fn plan_level(source: &Listing, destination: &Listing, mode: SyncMode) -> LevelPlan {
    let mut plan = LevelPlan::new();

    for (name, dest_entry) in destination {
        if source.contains_key(name) {
            continue;
        }
        let decision = match mode {
            SyncMode::Mirror => Decision::Delete,
            SyncMode::Merge => Decision::Keep,
        };
        plan.add_action(PlannedAction {
            name: name.clone(),
            decision,
            source: None,
            destination: Some(dest_entry.clone()),
        });
    }

    for (name, src_entry) in source {
        if destination.contains_key(name) {
            continue;
        }
        plan.add_action(PlannedAction {
            name: name.clone(),
            decision: Decision::Copy,
            source: Some(src_entry.clone()),
            destination: None,
        });
    }

    for (name, src_entry) in source {
        if let Some(dest_entry) = destination.get(name) {
            plan.add_action(PlannedAction {
                name: name.clone(),
                decision: compare_entries(src_entry, dest_entry),
                source: Some(src_entry.clone()),
                destination: Some(dest_entry.clone()),
            });
        }
    }

    plan
}
