//! Settlement CLI commands
//!
//! Shows who pays whom, the balances behind it, and records payments.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{
    format_balance_table, format_progress, format_settlement_table,
    format_settlements_as_text_with_symbol,
};
use crate::error::WarikanResult;
use crate::services::{GroupService, MemberService, SettlementService};
use crate::storage::Storage;

/// Settlement subcommands
#[derive(Subcommand)]
pub enum SettleCommands {
    /// Show the transfer table with payment status
    Show {
        /// Group name or ID
        group: String,
    },
    /// Print transfers as plain text, ready to paste into a chat
    Text {
        /// Group name or ID
        group: String,
    },
    /// Show each member's paid, owed and net balance
    Balances {
        /// Group name or ID
        group: String,
    },
    /// Mark a transfer as paid
    Pay {
        /// Group name or ID
        group: String,
        /// Settlement ID
        settlement: String,
    },
    /// Mark a transfer as unpaid
    Unpay {
        /// Group name or ID
        group: String,
        /// Settlement ID
        settlement: String,
    },
    /// Recompute transfers from the current expenses
    Recalculate {
        /// Group name or ID
        group: String,
    },
}

/// Handle a settle command
pub fn handle_settle_command(
    storage: &Storage,
    settings: &Settings,
    cmd: SettleCommands,
) -> WarikanResult<()> {
    let groups = GroupService::new(storage);
    let members = MemberService::new(storage);
    let service = SettlementService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        SettleCommands::Show { group } => {
            let group = groups.find(&group)?;
            let settlements = service.list(group.id)?;
            let roster = members.list(group.id)?;

            println!("Settlements for {}", group.name);
            println!();
            print!("{}", format_settlement_table(&settlements, &roster, symbol));
            if !settlements.is_empty() {
                println!();
                println!("{}", format_progress(&service.progress(group.id)?));
            }
        }

        SettleCommands::Text { group } => {
            let group = groups.find(&group)?;
            let settlements = service.list(group.id)?;
            let roster = members.list(group.id)?;
            println!(
                "{}",
                format_settlements_as_text_with_symbol(&settlements, &roster, symbol)
            );
        }

        SettleCommands::Balances { group } => {
            let group = groups.find(&group)?;
            let balances = service.balances(group.id)?;
            print!("{}", format_balance_table(&balances, symbol));
        }

        SettleCommands::Pay { group, settlement } => {
            let group = groups.find(&group)?;
            let settlement = service.set_paid(group.id, &settlement, true)?;
            println!("Marked as paid: {}", settlement.id);
            println!("{}", format_progress(&service.progress(group.id)?));
        }

        SettleCommands::Unpay { group, settlement } => {
            let group = groups.find(&group)?;
            let settlement = service.set_paid(group.id, &settlement, false)?;
            println!("Marked as unpaid: {}", settlement.id);
            println!("{}", format_progress(&service.progress(group.id)?));
        }

        SettleCommands::Recalculate { group } => {
            let group = groups.find(&group)?;
            let report = service.recalculate(group.id)?;
            println!(
                "Recalculated {}: {} transfer(s), {} kept their status",
                group.name,
                report.settlements.len(),
                report.carried_over
            );
            let lost = report.discarded_paid().count();
            if lost > 0 {
                println!("{} paid transfer(s) no longer apply and were dropped", lost);
            }
        }
    }

    Ok(())
}
