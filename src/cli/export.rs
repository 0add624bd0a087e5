//! CLI commands for data export and import
//!
//! Exports go to stdout unless `--output` names a file; files are written
//! atomically.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Subcommand, ValueEnum};
use tracing::info;

use crate::config::settings::Settings;
use crate::error::{WarikanError, WarikanResult};
use crate::export::{
    export_balances_csv, export_expenses_csv, export_group_json, export_group_yaml,
    export_settlements_csv, import_from_json, import_from_yaml,
};
use crate::services::GroupService;
use crate::storage::{file_io::read_text, write_bytes_atomic, Storage};

/// Group export formats
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// JSON document
    Json,
    /// YAML document (human-readable)
    Yaml,
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export transfers as CSV
    Settlements {
        /// Group name or ID
        group: String,
        /// Output file path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export member balances as CSV
    Balances {
        /// Group name or ID
        group: String,
        /// Output file path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export expense history as CSV
    Expenses {
        /// Group name or ID
        group: String,
        /// Output file path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export a whole group for backup or transfer
    Group {
        /// Group name or ID
        group: String,
        /// Output file path (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Export format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ExportFormat,
        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

/// Handle export commands
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExportCommands,
) -> WarikanResult<()> {
    let groups = GroupService::new(storage);
    let mut buffer = Vec::new();

    let output = match cmd {
        ExportCommands::Settlements { group, output } => {
            let group = groups.find(&group)?;
            export_settlements_csv(storage, group.id, &mut buffer, settings.csv_bom)?;
            output
        }
        ExportCommands::Balances { group, output } => {
            let group = groups.find(&group)?;
            export_balances_csv(storage, group.id, &mut buffer, settings.csv_bom)?;
            output
        }
        ExportCommands::Expenses { group, output } => {
            let group = groups.find(&group)?;
            export_expenses_csv(
                storage,
                group.id,
                &mut buffer,
                settings.csv_bom,
                &settings.date_format,
            )?;
            output
        }
        ExportCommands::Group {
            group,
            output,
            format,
            pretty,
        } => {
            let group = groups.find(&group)?;
            match format {
                ExportFormat::Json => export_group_json(storage, group.id, &mut buffer, pretty)?,
                ExportFormat::Yaml => export_group_yaml(storage, group.id, &mut buffer)?,
            }
            output
        }
    };

    match output {
        Some(path) => {
            write_bytes_atomic(&path, &buffer)
                .map_err(|e| WarikanError::Export(format!("{}: {}", path.display(), e)))?;
            info!(path = %path.display(), bytes = buffer.len(), "export written");
            println!("Exported to: {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&buffer)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Restore a group from a JSON or YAML export
///
/// The format follows the file extension; anything other than
/// `.yaml`/`.yml` is read as JSON.
pub fn handle_import_command(storage: &Storage, input: &Path) -> WarikanResult<()> {
    let contents = read_text(input)?.ok_or_else(|| {
        WarikanError::Import(format!("File not found: {}", input.display()))
    })?;

    let is_yaml = input
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);

    let export = if is_yaml {
        import_from_yaml(&contents)?
    } else {
        import_from_json(&contents)?
    };

    export.restore(storage)?;

    println!("Imported group: {}", export.group.name);
    println!("  Members:     {}", export.metadata.member_count);
    println!("  Expenses:    {}", export.metadata.expense_count);
    println!("  Settlements: {}", export.metadata.settlement_count);

    Ok(())
}
