//! Expense CLI commands
//!
//! Implements CLI commands for recording and editing expenses.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::format_expense_history;
use crate::error::{WarikanError, WarikanResult};
use crate::models::{GroupId, MemberId, Money};
use crate::services::{ExpenseService, ExpenseUpdate, GroupService, MemberService, NewExpense};
use crate::storage::Storage;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record an expense
    Add {
        /// Group name or ID
        group: String,
        /// Who paid (member name or ID)
        #[arg(short, long)]
        payer: String,
        /// What it was for
        #[arg(short, long)]
        title: String,
        /// Amount in whole yen (e.g. "3000" or "3,000")
        #[arg(short, long)]
        amount: String,
        /// Who shares it (repeat; defaults to everyone)
        #[arg(short = 'f', long = "for")]
        participants: Vec<String>,
    },
    /// List a group's expenses, newest first
    List {
        /// Group name or ID
        group: String,
    },
    /// Edit an expense
    Edit {
        /// Group name or ID
        group: String,
        /// Expense ID
        expense: String,
        /// New payer
        #[arg(short, long)]
        payer: Option<String>,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New amount
        #[arg(short, long)]
        amount: Option<String>,
        /// New participant list (repeat)
        #[arg(short = 'f', long = "for")]
        participants: Vec<String>,
    },
    /// Delete an expense
    Delete {
        /// Group name or ID
        group: String,
        /// Expense ID
        expense: String,
    },
}

fn parse_amount(s: &str) -> WarikanResult<Money> {
    Money::parse(s).map_err(|e| WarikanError::Validation(format!("Invalid amount: {}", e)))
}

fn resolve_participants(
    members: &MemberService,
    group_id: GroupId,
    names: &[String],
) -> WarikanResult<Vec<MemberId>> {
    let found = if names.is_empty() {
        members.list(group_id)?
    } else {
        members.find_all(group_id, names)?
    };
    Ok(found.into_iter().map(|m| m.id).collect())
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> WarikanResult<()> {
    let groups = GroupService::new(storage);
    let members = MemberService::new(storage);
    let service = ExpenseService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        ExpenseCommands::Add {
            group,
            payer,
            title,
            amount,
            participants,
        } => {
            let group = groups.find(&group)?;
            let payer = members.find(group.id, &payer)?;
            let amount = parse_amount(&amount)?;
            let participant_ids = resolve_participants(&members, group.id, &participants)?;
            let shared_by = participant_ids.len();

            let expense = service.add(
                group.id,
                NewExpense {
                    payer_id: payer.id,
                    title,
                    amount,
                    participant_ids,
                },
            )?;

            println!(
                "Recorded: {} {} paid by {} (split {} ways)",
                expense.title,
                expense.amount.format_with_symbol(symbol),
                payer.name,
                shared_by
            );
            println!("  ID: {}", expense.id);
        }

        ExpenseCommands::List { group } => {
            let group = groups.find(&group)?;
            let expenses = service.list(group.id)?;
            let roster = members.list(group.id)?;
            print!(
                "{}",
                format_expense_history(&expenses, &roster, symbol, &settings.date_format)
            );
        }

        ExpenseCommands::Edit {
            group,
            expense,
            payer,
            title,
            amount,
            participants,
        } => {
            let group = groups.find(&group)?;
            let expense = service.find(group.id, &expense)?;

            let changes = ExpenseUpdate {
                payer_id: match payer {
                    Some(p) => Some(members.find(group.id, &p)?.id),
                    None => None,
                },
                title,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                participant_ids: if participants.is_empty() {
                    None
                } else {
                    Some(resolve_participants(&members, group.id, &participants)?)
                },
            };

            let updated = service.update(expense.id, changes)?;
            println!(
                "Updated expense: {} {}",
                updated.title,
                updated.amount.format_with_symbol(symbol)
            );
        }

        ExpenseCommands::Delete { group, expense } => {
            let group = groups.find(&group)?;
            let expense = service.find(group.id, &expense)?;
            service.delete(expense.id)?;
            println!("Deleted expense: {}", expense.title);
        }
    }

    Ok(())
}
