//! Diff engine - Comparison logic and per-directory plans

mod compare;
mod plan;

pub use compare::{compare_entries, compare_files};
pub use plan::{plan_level, LevelPlan, Listing, PlanStats, PlannedAction};
