//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod audit;
pub mod expense;
pub mod export;
pub mod group;
pub mod member;
pub mod settle;

pub use audit::handle_audit_command;
pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, handle_import_command, ExportCommands, ExportFormat};
pub use group::{handle_group_command, GroupCommands};
pub use member::{handle_member_command, MemberCommands};
pub use settle::{handle_settle_command, SettleCommands};
