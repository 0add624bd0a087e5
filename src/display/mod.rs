//! Display formatting for terminal output
//!
//! Plain `String` builders for tables and text views. Nothing here prints;
//! the CLI decides where output goes.

pub mod balance;
pub mod expense;
pub mod group;
pub mod settlement;

pub use balance::format_balance_table;
pub use expense::{format_expense_history, participant_label};
pub use group::{format_group_details, format_group_list};
pub use settlement::{
    format_progress, format_settlement_table, format_settlements_as_text,
    format_settlements_as_text_with_symbol, NO_SETTLEMENT_NEEDED,
};

use crate::models::{Member, MemberId};

/// Name shown for ids that no longer resolve to a member
pub const UNKNOWN_MEMBER: &str = "Unknown";

pub(crate) fn find_member(members: &[Member], id: MemberId) -> Option<&Member> {
    members.iter().find(|m| m.id == id)
}

pub(crate) fn member_name(members: &[Member], id: MemberId) -> &str {
    find_member(members, id)
        .map(|m| m.name.as_str())
        .unwrap_or(UNKNOWN_MEMBER)
}

/// Left-align to a width counted in characters
pub(crate) fn pad(s: &str, width: usize) -> String {
    format!("{:<width$}", s, width = width)
}

/// Truncate to `max` characters, marking the cut with `…`
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", head)
    }
}
