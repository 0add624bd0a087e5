//! Service layer for warikan
//!
//! Services sit on top of the storage layer and handle validation,
//! auditing and the cross-entity effects of a change: any mutation of a
//! group's expenses ends with a settlement recalculation.

pub mod expense;
pub mod group;
pub mod member;
pub mod settlement;

pub use expense::{ExpenseService, ExpenseUpdate, NewExpense};
pub use group::{GroupService, GroupSummary};
pub use member::{MemberService, MemberUpdate};
pub use settlement::{SettlementProgress, SettlementService};
