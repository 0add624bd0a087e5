//! Storage initialization
//!
//! Handles first-run setup: directories, default settings and empty
//! collection files.

use crate::config::paths::WarikanPaths;
use crate::config::settings::Settings;
use crate::error::WarikanError;

use super::file_io::write_json_atomic;
use super::{expenses, groups, members, settlements};

/// Initialize storage for a fresh installation
///
/// Existing files are left untouched. Returns true if settings were
/// created by this call.
pub fn initialize_storage(paths: &WarikanPaths) -> Result<bool, WarikanError> {
    paths.ensure_directories()?;

    for collection in [
        groups::COLLECTION,
        members::COLLECTION,
        expenses::COLLECTION,
        settlements::COLLECTION,
    ] {
        let path = paths.collection_file(collection);
        if !path.exists() {
            write_json_atomic(&path, &serde_json::json!({ collection: [] }))?;
        }
    }

    if needs_initialization(paths) {
        Settings::default().save(paths)?;
        return Ok(true);
    }

    Ok(false)
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &WarikanPaths) -> bool {
    !paths.is_initialized()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_storage() {
        let temp_dir = TempDir::new().unwrap();
        let paths = WarikanPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(needs_initialization(&paths));
        assert!(initialize_storage(&paths).unwrap());

        assert!(!needs_initialization(&paths));
        assert!(paths.settings_file().exists());
        for name in ["groups", "members", "expenses", "settlements"] {
            let content = std::fs::read_to_string(paths.collection_file(name)).unwrap();
            let value: serde_json::Value = serde_json::from_str(&content).unwrap();
            assert_eq!(value[name], serde_json::json!([]));
        }
    }

    #[test]
    fn test_doesnt_overwrite_existing() {
        let temp_dir = TempDir::new().unwrap();
        let paths = WarikanPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();

        let custom = r#"{"groups": [1]}"#;
        std::fs::write(paths.collection_file("groups"), custom).unwrap();

        assert!(!initialize_storage(&paths).unwrap());
        assert_eq!(
            std::fs::read_to_string(paths.collection_file("groups")).unwrap(),
            custom
        );
    }
}
