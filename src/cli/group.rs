//! Group CLI commands
//!
//! Implements CLI commands for group management.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_group_details, format_group_list};
use crate::error::WarikanResult;
use crate::services::GroupService;
use crate::storage::Storage;

/// Group subcommands
#[derive(Subcommand)]
pub enum GroupCommands {
    /// Create a new group
    Create {
        /// Group name
        name: String,
        /// Initial member (repeat for more, in display order)
        #[arg(short, long = "member")]
        members: Vec<String>,
    },
    /// List all groups
    List,
    /// Show group details
    Show {
        /// Group name or ID
        group: String,
    },
    /// Rename a group
    Rename {
        /// Group name or ID
        group: String,
        /// New name
        name: String,
    },
    /// Delete a group with all of its data
    Delete {
        /// Group name or ID
        group: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a group command
pub fn handle_group_command(
    storage: &Storage,
    settings: &Settings,
    cmd: GroupCommands,
) -> WarikanResult<()> {
    let service = GroupService::new(storage);

    match cmd {
        GroupCommands::Create { name, members } => {
            let group = service.create(&name, &members)?;
            println!("Created group: {}", group.name);
            println!("  ID: {}", group.id);
            if !members.is_empty() {
                println!("  Members: {}", members.len());
            }
        }

        GroupCommands::List => {
            let groups = service.list()?;
            print!("{}", format_group_list(&groups));
        }

        GroupCommands::Show { group } => {
            let group = service.find(&group)?;
            let summary = service.summary(group.id)?;
            print!("{}", format_group_details(&summary, &settings.currency_symbol));
        }

        GroupCommands::Rename { group, name } => {
            let group = service.find(&group)?;
            let old_name = group.name.clone();
            let renamed = service.rename(group.id, &name)?;
            println!("Renamed group '{}' to '{}'", old_name, renamed.name);
        }

        GroupCommands::Delete { group, force } => {
            let group = service.find(&group)?;
            if !force {
                println!(
                    "This deletes '{}' with all of its members, expenses and settlements.",
                    group.name
                );
                println!("Run again with --force to confirm.");
                return Ok(());
            }
            service.delete(group.id)?;
            println!("Deleted group: {}", group.name);
        }
    }

    Ok(())
}
