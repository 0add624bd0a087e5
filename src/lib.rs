//! warikan - Terminal-based group expense splitting
//!
//! This library provides the core functionality for the warikan CLI. A group
//! of people records shared expenses; each expense is split evenly between
//! its participants, and the settlement engine turns the resulting balances
//! into a short list of transfers that squares everyone up.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (groups, members, expenses, settlements)
//! - `settlement`: Balance computation, transfer solver and reconciliation
//! - `storage`: JSON file storage layer
//! - `services`: Business logic layer
//! - `audit`: Audit logging system
//! - `display`: Terminal and plain-text formatting
//! - `export`: CSV, JSON and YAML export
//!
//! # Example
//!
//! ```
//! use warikan::models::{Expense, GroupId, Member, Money};
//! use warikan::settlement::compute_settlements;
//!
//! let group = GroupId::new();
//! let alice = Member::with_sort_order(group, "Alice", 0);
//! let bob = Member::with_sort_order(group, "Bob", 1);
//! let dinner = Expense::new(group, alice.id, "Dinner", Money::new(3000), vec![alice.id, bob.id]);
//!
//! let transfers = compute_settlements(&[dinner], &[alice.clone(), bob.clone()], group);
//! assert_eq!(transfers.len(), 1);
//! assert_eq!(transfers[0].from_member_id, bob.id);
//! assert_eq!(transfers[0].amount, Money::new(1500));
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod services;
pub mod settlement;
pub mod storage;

pub use error::{WarikanError, WarikanResult};
