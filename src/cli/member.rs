//! Member CLI commands
//!
//! Implements CLI commands for member management.

use clap::Subcommand;

use crate::error::{WarikanError, WarikanResult};
use crate::models::PaymentMethod;
use crate::services::{GroupService, MemberService, MemberUpdate};
use crate::storage::Storage;

/// Member subcommands
#[derive(Subcommand)]
pub enum MemberCommands {
    /// Add a member to a group
    Add {
        /// Group name or ID
        group: String,
        /// Member name
        name: String,
    },
    /// List the members of a group
    List {
        /// Group name or ID
        group: String,
    },
    /// Edit a member's name or payment preferences
    Edit {
        /// Group name or ID
        group: String,
        /// Member name or ID
        member: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// Payment method (cash, paypay, bank)
        #[arg(short, long)]
        method: Option<String>,
        /// PayPay ID or bank details; pass "" to clear
        #[arg(short, long)]
        info: Option<String>,
    },
    /// Remove a member from a group
    Remove {
        /// Group name or ID
        group: String,
        /// Member name or ID
        member: String,
    },
}

/// Handle a member command
pub fn handle_member_command(storage: &Storage, cmd: MemberCommands) -> WarikanResult<()> {
    let groups = GroupService::new(storage);
    let service = MemberService::new(storage);

    match cmd {
        MemberCommands::Add { group, name } => {
            let group = groups.find(&group)?;
            let member = service.add(group.id, &name)?;
            println!("Added {} to {}", member.name, group.name);
        }

        MemberCommands::List { group } => {
            let group = groups.find(&group)?;
            let members = service.list(group.id)?;

            if members.is_empty() {
                println!("No members in {}.", group.name);
                return Ok(());
            }

            println!("{:20} {:14} {:24} ID", "Name", "Method", "Destination");
            println!("{}", "-".repeat(72));
            for member in &members {
                println!(
                    "{:20} {:14} {:24} {}",
                    member.name,
                    member.payment_method.label(),
                    member.payment_destination().unwrap_or("-"),
                    member.id
                );
            }
        }

        MemberCommands::Edit {
            group,
            member,
            name,
            method,
            info,
        } => {
            let group = groups.find(&group)?;
            let member = service.find(group.id, &member)?;

            let payment_method = match method {
                Some(m) => Some(PaymentMethod::parse(&m).ok_or_else(|| {
                    WarikanError::Validation(format!(
                        "Invalid payment method: '{}'. Valid methods: cash, paypay, bank",
                        m
                    ))
                })?),
                None => None,
            };

            if name.is_none() && payment_method.is_none() && info.is_none() {
                println!("Nothing to change. Use --name, --method or --info.");
                return Ok(());
            }

            let updated = service.update(
                member.id,
                MemberUpdate {
                    name,
                    payment_method,
                    payment_info: info,
                },
            )?;

            println!("Updated member: {}", updated.name);
            println!("  Method: {}", updated.payment_method);
            if let Some(dest) = updated.payment_destination() {
                println!("  Destination: {}", dest);
            }
        }

        MemberCommands::Remove { group, member } => {
            let group = groups.find(&group)?;
            let member = service.find(group.id, &member)?;
            service.remove(member.id)?;
            println!("Removed {} from {}", member.name, group.name);
        }
    }

    Ok(())
}
