//! Balance display formatting

use crate::models::{MemberBalance, Money};

use super::pad;

/// Paid / owed / net table, one row per member, in member order
pub fn format_balance_table(balances: &[MemberBalance], symbol: &str) -> String {
    if balances.is_empty() {
        return "No members.\n".to_string();
    }

    let name_width = balances
        .iter()
        .map(|b| b.member_name.chars().count())
        .max()
        .unwrap_or(6)
        .max(6);

    let mut output = String::new();
    output.push_str(&format!(
        "{}  {:>12}  {:>12}  {:>12}\n",
        pad("Member", name_width),
        "Paid",
        "Owed",
        "Balance"
    ));
    output.push_str(&format!(
        "{:-<w$}  {:->12}  {:->12}  {:->12}\n",
        "",
        "",
        "",
        "",
        w = name_width
    ));

    for b in balances {
        output.push_str(&format!(
            "{}  {:>12}  {:>12}  {:>12}\n",
            pad(&b.member_name, name_width),
            b.total_paid.format_with_symbol(symbol),
            b.total_owed.format_with_symbol(symbol),
            signed(b.balance, symbol),
        ));
    }

    output
}

/// Positive balances get an explicit `+`
fn signed(amount: Money, symbol: &str) -> String {
    if amount.is_positive() {
        format!("+{}", amount.format_with_symbol(symbol))
    } else {
        amount.format_with_symbol(symbol)
    }
}
