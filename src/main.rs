use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use warikan::cli::{
    handle_audit_command, handle_expense_command, handle_export_command, handle_group_command,
    handle_import_command, handle_member_command, handle_settle_command,
};
use warikan::config::{paths::WarikanPaths, settings::Settings};
use warikan::logging::init_logging;
use warikan::storage::Storage;

#[derive(Parser)]
#[command(
    name = "warikan",
    author = "Kaylee Beyene",
    version,
    about = "Terminal-based group expense splitting",
    long_about = "warikan tracks shared expenses within a group, works out each \
                  member's balance, and suggests the fewest transfers that settle \
                  everyone up."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Group management commands
    #[command(subcommand)]
    Group(warikan::cli::GroupCommands),

    /// Member management commands
    #[command(subcommand)]
    Member(warikan::cli::MemberCommands),

    /// Expense management commands
    #[command(subcommand, alias = "exp")]
    Expense(warikan::cli::ExpenseCommands),

    /// Settlement commands
    #[command(subcommand)]
    Settle(warikan::cli::SettleCommands),

    /// Export data
    #[command(subcommand)]
    Export(warikan::cli::ExportCommands),

    /// Import a group from a JSON or YAML export
    Import {
        /// Path to the export file
        file: PathBuf,
    },

    /// Show recent audit log entries
    Audit {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// Initialize the data directory
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = WarikanPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    init_logging(settings.log_filter.as_deref());
    debug!(data_dir = %paths.data_dir().display(), "starting");

    // Initialize storage
    let storage = Storage::new(&paths)?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Group(cmd)) => handle_group_command(&storage, &settings, cmd)?,
        Some(Commands::Member(cmd)) => handle_member_command(&storage, cmd)?,
        Some(Commands::Expense(cmd)) => handle_expense_command(&storage, &settings, cmd)?,
        Some(Commands::Settle(cmd)) => handle_settle_command(&storage, &settings, cmd)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, &settings, cmd)?,
        Some(Commands::Import { file }) => handle_import_command(&storage, &file)?,
        Some(Commands::Audit { limit }) => handle_audit_command(&storage, limit)?,
        Some(Commands::Init) => {
            println!("Initializing warikan at: {}", paths.data_dir().display());
            let created = warikan::storage::init::initialize_storage(&paths)?;
            settings.save(&paths)?;
            if created {
                println!("Initialization complete!");
            } else {
                println!("Already initialized; nothing to do.");
            }
            println!();
            println!("Create your first group with:");
            println!("  warikan group create \"Trip\" -m Alice -m Bob");
        }
        Some(Commands::Config) => {
            println!("warikan Configuration");
            println!("=====================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Settings file:  {}", paths.settings_file().display());
            println!("Audit log:      {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!("  Date format:     {}", settings.date_format);
            println!("  CSV BOM:         {}", settings.csv_bom);
            println!(
                "  Log filter:      {}",
                settings.log_filter.as_deref().unwrap_or("(default)")
            );
        }
        None => {
            println!("warikan - Terminal-based group expense splitting");
            println!();
            println!("Run 'warikan --help' for usage information.");
        }
    }

    Ok(())
}
