//! Cashback computation: billing cycles, per-expense cashback, cap
//! apportionment and summaries.
//!
//! Everything here is a pure function of the categories, expenses and cycle
//! start day it is given. Nothing is cached between calls.

mod cycle;
mod rule;
mod summary;
mod tracker;

pub(crate) use cycle::{current_cycle, today, BillingCycle, CycleKey};
pub(crate) use summary::{
    all_time_grouped, category_cycle_stats, overall_summary, CategoryCycleStats, CycleGroup,
    GroupFilter, OverallSummary,
};
pub(crate) use tracker::{CapTracker, ExpenseCashback};
