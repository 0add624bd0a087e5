//! CSV export
//!
//! Comma-delimited rows joined by `\n` with no trailing newline. A field is
//! wrapped in quotes when it contains a comma, a quote or a newline, and
//! inner quotes are doubled. Files start with a UTF-8 byte-order mark so
//! spreadsheet tools pick the right encoding.

use std::io::Write;

use crate::display::participant_label;
use crate::error::{WarikanError, WarikanResult};
use crate::models::{Expense, GroupId, Member, MemberBalance, MemberId, Settlement};
use crate::services::SettlementService;
use crate::storage::Storage;

/// UTF-8 byte-order mark written ahead of CSV content
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

pub const SETTLEMENT_HEADERS: [&str; 6] =
    ["From", "To", "Amount", "Payment Method", "Destination", "Status"];
pub const BALANCE_HEADERS: [&str; 4] = ["Member", "Paid", "Owed", "Balance"];
pub const EXPENSE_HEADERS: [&str; 5] = ["Date", "Title", "Payer", "Participants", "Amount"];

/// Escape a single field
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Header line plus one line per row
pub fn to_csv_rows<S: AsRef<str>>(headers: &[&str], rows: &[Vec<S>]) -> String {
    let header_line = headers
        .iter()
        .map(|h| escape_csv(h))
        .collect::<Vec<_>>()
        .join(",");

    std::iter::once(header_line)
        .chain(rows.iter().map(|row| {
            row.iter()
                .map(|field| escape_csv(field.as_ref()))
                .collect::<Vec<_>>()
                .join(",")
        }))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write CSV text, optionally prefixed with the byte-order mark
pub fn write_csv<W: Write>(writer: &mut W, contents: &str, bom: bool) -> WarikanResult<()> {
    if bom {
        writer
            .write_all(&UTF8_BOM)
            .map_err(|e| WarikanError::Export(e.to_string()))?;
    }
    writer
        .write_all(contents.as_bytes())
        .map_err(|e| WarikanError::Export(e.to_string()))
}

fn name_of(members: &[Member], id: MemberId) -> String {
    members
        .iter()
        .find(|m| m.id == id)
        .map(|m| m.name.clone())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Settlement rows; amounts are plain integers
pub fn settlements_csv(settlements: &[Settlement], members: &[Member]) -> String {
    let rows: Vec<Vec<String>> = settlements
        .iter()
        .map(|s| {
            let receiver = members.iter().find(|m| m.id == s.to_member_id);
            vec![
                name_of(members, s.from_member_id),
                name_of(members, s.to_member_id),
                s.amount.units().to_string(),
                receiver
                    .map(|m| m.payment_method.label().to_string())
                    .unwrap_or_default(),
                receiver
                    .and_then(|m| m.payment_info.clone())
                    .unwrap_or_default(),
                if s.is_paid { "Paid" } else { "Unpaid" }.to_string(),
            ]
        })
        .collect();

    to_csv_rows(&SETTLEMENT_HEADERS, &rows)
}

pub fn balances_csv(balances: &[MemberBalance]) -> String {
    let rows: Vec<Vec<String>> = balances
        .iter()
        .map(|b| {
            vec![
                b.member_name.clone(),
                b.total_paid.units().to_string(),
                b.total_owed.units().to_string(),
                b.balance.units().to_string(),
            ]
        })
        .collect();

    to_csv_rows(&BALANCE_HEADERS, &rows)
}

pub fn expenses_csv(expenses: &[Expense], members: &[Member], date_format: &str) -> String {
    let rows: Vec<Vec<String>> = expenses
        .iter()
        .map(|e| {
            vec![
                e.created_at.format(date_format).to_string(),
                e.title.clone(),
                name_of(members, e.payer_id),
                participant_label(e, members),
                e.amount.units().to_string(),
            ]
        })
        .collect();

    to_csv_rows(&EXPENSE_HEADERS, &rows)
}

/// Export a group's settlements
pub fn export_settlements_csv<W: Write>(
    storage: &Storage,
    group_id: GroupId,
    writer: &mut W,
    bom: bool,
) -> WarikanResult<()> {
    let members = storage.members.get_by_group(group_id)?;
    let settlements = storage.settlements.get_by_group(group_id)?;
    write_csv(writer, &settlements_csv(&settlements, &members), bom)
}

/// Export a group's balance summary
pub fn export_balances_csv<W: Write>(
    storage: &Storage,
    group_id: GroupId,
    writer: &mut W,
    bom: bool,
) -> WarikanResult<()> {
    let balances = SettlementService::new(storage).balances(group_id)?;
    write_csv(writer, &balances_csv(&balances), bom)
}

/// Export a group's expense history, newest first
pub fn export_expenses_csv<W: Write>(
    storage: &Storage,
    group_id: GroupId,
    writer: &mut W,
    bom: bool,
    date_format: &str,
) -> WarikanResult<()> {
    let members = storage.members.get_by_group(group_id)?;
    let expenses = storage.expenses.get_by_group(group_id)?;
    write_csv(writer, &expenses_csv(&expenses, &members, date_format), bom)
}
