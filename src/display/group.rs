//! Group display formatting

use crate::models::Group;
use crate::services::GroupSummary;

use super::settlement::format_progress;

/// Format the list of groups
pub fn format_group_list(groups: &[Group]) -> String {
    if groups.is_empty() {
        return "No groups found. Create one with `warikan group create`.\n".to_string();
    }

    let mut output = String::new();
    for group in groups {
        output.push_str(&format!(
            "  {}  {}  (created {})\n",
            group.id,
            group.name,
            group.created_at.format("%Y-%m-%d")
        ));
    }
    output
}

/// Format one group's details
pub fn format_group_details(summary: &GroupSummary, symbol: &str) -> String {
    let group = &summary.group;
    let mut output = String::new();

    output.push_str(&format!("Group: {}\n", group.name));
    output.push_str(&format!("  ID:           {}\n", group.id));
    output.push_str(&format!("  Expenses:     {}\n", summary.expense_count));
    output.push_str(&format!(
        "  Total spent:  {}\n",
        summary.total_spent.format_with_symbol(symbol)
    ));
    output.push_str(&format!("  {}\n", format_progress(&summary.progress)));

    output.push_str(&format!("\nMembers ({}):\n", summary.members.len()));
    for member in &summary.members {
        match member.payment_destination() {
            Some(info) => output.push_str(&format!(
                "  {}  {} ({}: {})\n",
                member.id,
                member.name,
                member.payment_method.label(),
                info
            )),
            None => output.push_str(&format!(
                "  {}  {} ({})\n",
                member.id,
                member.name,
                member.payment_method.label()
            )),
        }
    }

    output.push_str(&format!(
        "\n  Created:  {}\n",
        group.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push_str(&format!(
        "  Modified: {}\n",
        group.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}
