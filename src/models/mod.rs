//! Core data models for warikan
//!
//! This module contains the data structures that describe the expense
//! splitting domain: groups, members, expenses, settlements and the derived
//! per-member balances.

pub mod balance;
pub mod expense;
pub mod group;
pub mod ids;
pub mod member;
pub mod money;
pub mod settlement;

pub use balance::MemberBalance;
pub use expense::{Expense, MAX_EXPENSE_AMOUNT};
pub use group::Group;
pub use ids::{ExpenseId, GroupId, MemberId, SettlementId};
pub use member::{Member, PaymentMethod};
pub use money::{Money, DEFAULT_CURRENCY_SYMBOL};
pub use settlement::Settlement;
