//! Settlement display formatting
//!
//! The plain-text transfer list meant for pasting into a chat, plus the
//! table and progress views used by `settle show`.

use crate::models::{Member, Money, PaymentMethod, Settlement, DEFAULT_CURRENCY_SYMBOL};
use crate::services::SettlementProgress;

use super::{find_member, member_name, pad};

/// Shown instead of a transfer list when everyone is even
pub const NO_SETTLEMENT_NEEDED: &str = "No settlement needed.";

/// One line per transfer: `Bob → Alice: ¥1,000 (PayPay: alice-pay) [paid]`
///
/// Lines are joined with `\n` without a trailing newline. The destination
/// is shown only for wallet or bank receivers with destination info.
pub fn format_settlements_as_text(settlements: &[Settlement], members: &[Member]) -> String {
    format_settlements_as_text_with_symbol(settlements, members, DEFAULT_CURRENCY_SYMBOL)
}

/// [`format_settlements_as_text`] with a configurable currency symbol
pub fn format_settlements_as_text_with_symbol(
    settlements: &[Settlement],
    members: &[Member],
    symbol: &str,
) -> String {
    if settlements.is_empty() {
        return NO_SETTLEMENT_NEEDED.to_string();
    }

    settlements
        .iter()
        .map(|s| {
            let destination = find_member(members, s.to_member_id)
                .and_then(destination_note)
                .unwrap_or_default();
            let status = if s.is_paid { " [paid]" } else { "" };

            format!(
                "{} → {}: {}{}{}",
                member_name(members, s.from_member_id),
                member_name(members, s.to_member_id),
                s.amount.format_with_symbol(symbol),
                destination,
                status
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// ` (PayPay: handle)` or ` (Transfer to: details)`
fn destination_note(member: &Member) -> Option<String> {
    let info = member.payment_destination()?;
    let label = match member.payment_method {
        PaymentMethod::MobileWallet => "PayPay",
        PaymentMethod::BankTransfer => "Transfer to",
        PaymentMethod::Cash => return None,
    };
    Some(format!(" ({}: {})", label, info))
}

/// Table of transfers with ids and status
pub fn format_settlement_table(
    settlements: &[Settlement],
    members: &[Member],
    symbol: &str,
) -> String {
    if settlements.is_empty() {
        return format!("{}\n", NO_SETTLEMENT_NEEDED);
    }

    let name_width = settlements
        .iter()
        .flat_map(|s| {
            [
                member_name(members, s.from_member_id),
                member_name(members, s.to_member_id),
            ]
        })
        .map(|n| n.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {}  {}  {:>12}  {:<13}  {}\n",
        "ID",
        pad("From", name_width),
        pad("To", name_width),
        "Amount",
        "Method",
        "Status"
    ));
    output.push_str(&format!(
        "{:-<12}  {:-<w$}  {:-<w$}  {:->12}  {:-<13}  {:-<6}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        w = name_width
    ));

    for s in settlements {
        let method = find_member(members, s.to_member_id)
            .map(|m| m.payment_method.label())
            .unwrap_or("");
        let status = if s.is_paid { "✓ paid" } else { "unpaid" };

        output.push_str(&format!(
            "{:<12}  {}  {}  {:>12}  {:<13}  {}\n",
            s.id.to_string(),
            pad(member_name(members, s.from_member_id), name_width),
            pad(member_name(members, s.to_member_id), name_width),
            s.amount.format_with_symbol(symbol),
            method,
            status
        ));
    }

    let total: Money = settlements.iter().map(|s| s.amount).sum();
    output.push_str(&format!(
        "{:<12}  {}  {}  {:>12}\n",
        "TOTAL",
        pad("", name_width),
        pad("", name_width),
        total.format_with_symbol(symbol)
    ));

    output
}

/// `Progress: 1/2 paid (50%)` followed by a ten-cell bar
pub fn format_progress(progress: &SettlementProgress) -> String {
    let filled = (progress.percent() / 10) as usize;
    format!(
        "Progress: {}/{} paid ({}%) [{}{}]",
        progress.paid,
        progress.total,
        progress.percent(),
        "#".repeat(filled),
        ".".repeat(10 - filled)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GroupId, MemberId};
    use chrono::Utc;

    fn members() -> (GroupId, Vec<Member>) {
        let group = GroupId::new();
        let members = ["Alice", "Bob", "Carol"]
            .iter()
            .enumerate()
            .map(|(i, n)| Member::with_sort_order(group, *n, i as i32))
            .collect();
        (group, members)
    }

    #[test]
    fn test_empty_list() {
        let (_, ms) = members();
        assert_eq!(format_settlements_as_text(&[], &ms), "No settlement needed.");
    }

    #[test]
    fn test_text_lines() {
        let (group, mut ms) = members();
        ms[0].set_payment(PaymentMethod::MobileWallet, Some("alice-pay".into()));

        let mut paid = Settlement::new(group, ms[2].id, ms[0].id, Money::new(1000));
        paid.set_paid(true, Utc::now());
        let settlements = vec![
            Settlement::new(group, ms[1].id, ms[0].id, Money::new(1000)),
            paid,
        ];

        assert_eq!(
            format_settlements_as_text(&settlements, &ms),
            "Bob → Alice: ¥1,000 (PayPay: alice-pay)\n\
             Carol → Alice: ¥1,000 (PayPay: alice-pay) [paid]"
        );
    }

    #[test]
    fn test_destination_rules() {
        let (group, mut ms) = members();
        ms[0].set_payment(PaymentMethod::BankTransfer, Some("Bank 123".into()));
        ms[1].set_payment(PaymentMethod::MobileWallet, None);
        ms[2].payment_info = Some("ignored for cash".into());

        let settlements = vec![
            Settlement::new(group, ms[1].id, ms[0].id, Money::new(500)),
            Settlement::new(group, ms[0].id, ms[1].id, Money::new(200)),
            Settlement::new(group, ms[0].id, ms[2].id, Money::new(100)),
        ];

        let text = format_settlements_as_text(&settlements, &ms);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "Bob → Alice: ¥500 (Transfer to: Bank 123)");
        assert_eq!(lines[1], "Alice → Bob: ¥200");
        assert_eq!(lines[2], "Alice → Carol: ¥100");
    }

    #[test]
    fn test_unknown_members_and_symbol() {
        let (group, ms) = members();
        let stray = Settlement::new(
            group,
            MemberId::new(),
            ms[0].id,
            Money::new(1234567),
        );

        assert_eq!(
            format_settlements_as_text_with_symbol(&[stray], &ms, "$"),
            "Unknown → Alice: $1,234,567"
        );
    }

    #[test]
    fn test_table_and_progress() {
        let (group, ms) = members();
        let settlements = vec![Settlement::new(group, ms[1].id, ms[0].id, Money::new(1000))];

        let table = format_settlement_table(&settlements, &ms, "¥");
        assert!(table.contains("Bob"));
        assert!(table.contains("unpaid"));
        assert!(table.contains(&settlements[0].id.to_string()));
        assert!(table.lines().last().unwrap().contains("¥1,000"));

        let progress = SettlementProgress { paid: 1, total: 2 };
        assert_eq!(format_progress(&progress), "Progress: 1/2 paid (50%) [#####.....]");
    }
}
