//! Balance and settlement engine
//!
//! Pure functions over an already-fetched snapshot of one group's expenses
//! and members. Nothing here touches storage or keeps state, so every
//! function can be re-run as often as needed with the same result.
//!
//! - `balances`: per-member paid/owed/net totals
//! - `solver`: greedy debtor -> creditor transfer list
//! - `reconcile`: recompute and carry paid status across recalculations

pub mod balances;
pub mod reconcile;
pub mod solver;

pub use balances::{compute_balances, unallocated_remainder};
pub use reconcile::{merge_with_previous, reconcile_settlements, reconcile_with_report, Reconciliation};
pub use solver::{compute_settlements, settle_balances};
