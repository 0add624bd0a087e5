//! Export module for warikan
//!
//! - CSV: settlements, balances and expense history (spreadsheet-compatible)
//! - JSON: machine-readable group export, importable
//! - YAML: human-readable group export, importable

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{
    escape_csv, export_balances_csv, export_expenses_csv, export_settlements_csv, to_csv_rows,
    write_csv, UTF8_BOM,
};
pub use json::{export_group_json, import_from_json, GroupExport, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_group_yaml, import_from_yaml};
