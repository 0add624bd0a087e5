//! Expense history formatting

use crate::models::{Expense, Member, Money};

use super::{member_name, pad, truncate};

/// Participant label: "Everyone" when the whole group shares the expense
pub fn participant_label(expense: &Expense, members: &[Member]) -> String {
    let everyone = !members.is_empty()
        && members.len() == expense.participant_ids.len()
        && members.iter().all(|m| expense.participant_ids.contains(&m.id));

    if everyone {
        return "Everyone".to_string();
    }

    expense
        .participant_ids
        .iter()
        .map(|id| member_name(members, *id))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Expense history, in the order given, with a total line
pub fn format_expense_history(
    expenses: &[Expense],
    members: &[Member],
    symbol: &str,
    date_format: &str,
) -> String {
    if expenses.is_empty() {
        return "No expenses recorded.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<16}  {}  {}  {:>12}  {}\n",
        "ID",
        "Date",
        pad("Title", 20),
        pad("Payer", 12),
        "Amount",
        "For"
    ));
    output.push_str(&"-".repeat(90));
    output.push('\n');

    for e in expenses {
        output.push_str(&format!(
            "{:<12}  {:<16}  {}  {}  {:>12}  {}\n",
            e.id.to_string(),
            e.created_at.format(date_format).to_string(),
            pad(&truncate(&e.title, 20), 20),
            pad(&truncate(member_name(members, e.payer_id), 12), 12),
            e.amount.format_with_symbol(symbol),
            participant_label(e, members)
        ));
    }

    let total: Money = expenses.iter().map(|e| e.amount).sum();
    output.push_str(&format!(
        "\n{} expense(s), total {}\n",
        expenses.len(),
        total.format_with_symbol(symbol)
    ));

    output
}
