//! YAML group export
//!
//! Same structure as the JSON export, for reading and hand-editing.

use std::io::Write;

use crate::error::{WarikanError, WarikanResult};
use crate::export::json::GroupExport;
use crate::models::GroupId;
use crate::storage::Storage;

/// Export a group to YAML with a short comment header
pub fn export_group_yaml<W: Write>(
    storage: &Storage,
    group_id: GroupId,
    writer: &mut W,
) -> WarikanResult<()> {
    let export = GroupExport::from_storage(storage, group_id)?;

    let header = format!(
        "# warikan group export: {}\n# Generated: {}\n# App Version: {}\n\n",
        export.group.name, export.exported_at, export.app_version
    );
    writer
        .write_all(header.as_bytes())
        .map_err(|e| WarikanError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| WarikanError::Export(e.to_string()))
}

/// Parse and validate a YAML group export
pub fn import_from_yaml(yaml_str: &str) -> WarikanResult<GroupExport> {
    let export: GroupExport =
        serde_yaml::from_str(yaml_str).map_err(|e| WarikanError::Import(e.to_string()))?;

    export.validate().map_err(WarikanError::Import)?;

    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use crate::services::{ExpenseService, GroupService, NewExpense};

    #[test]
    fn test_yaml_roundtrip() {
        let storage = Storage::in_memory();
        let names: Vec<String> = ["Alice", "Bob"].iter().map(|s| s.to_string()).collect();
        let group = GroupService::new(&storage).create("Flat", &names).unwrap();
        let members = storage.members.get_by_group(group.id).unwrap();
        ExpenseService::new(&storage)
            .add(
                group.id,
                NewExpense {
                    payer_id: members[1].id,
                    title: "Rent: March".into(),
                    amount: Money::new(80000),
                    participant_ids: members.iter().map(|m| m.id).collect(),
                },
            )
            .unwrap();

        let mut out = Vec::new();
        export_group_yaml(&storage, group.id, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("# warikan group export: Flat"));

        let imported = import_from_yaml(&text).unwrap();
        assert_eq!(imported.group.id, group.id);
        assert_eq!(imported.expenses[0].title, "Rent: March");
        assert_eq!(imported.settlements.len(), 1);
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            import_from_yaml("group: [unclosed"),
            Err(WarikanError::Import(_))
        ));
    }
}
