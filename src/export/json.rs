//! JSON group export
//!
//! A self-contained snapshot of one group (members, expenses, stored
//! settlements) with schema versioning, and its import back into storage.

use std::collections::HashSet;
use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::audit::{AuditEntry, EntityType};
use crate::error::{WarikanError, WarikanResult};
use crate::models::{Expense, Group, GroupId, Member, Money, Settlement};
use crate::settlement::reconcile_settlements;
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// One group and everything that belongs to it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub group: Group,

    /// Members in display order
    pub members: Vec<Member>,

    /// Expenses, newest first
    pub expenses: Vec<Expense>,

    /// Stored settlements in solver order, including paid status
    pub settlements: Vec<Settlement>,

    pub metadata: ExportMetadata,
}

/// Summary counts for a reader skimming the file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub member_count: usize,
    pub expense_count: usize,
    pub settlement_count: usize,
    pub total_spent: Money,
    pub earliest_expense: Option<String>,
    pub latest_expense: Option<String>,
}

impl GroupExport {
    /// Snapshot a group from storage
    pub fn from_storage(storage: &Storage, group_id: GroupId) -> WarikanResult<Self> {
        let group = storage
            .groups
            .get(group_id)?
            .ok_or_else(|| WarikanError::group_not_found(group_id.to_string()))?;
        let members = storage.members.get_by_group(group_id)?;
        let expenses = storage.expenses.get_by_group(group_id)?;
        let settlements = storage.settlements.get_by_group(group_id)?;

        let metadata = ExportMetadata {
            member_count: members.len(),
            expense_count: expenses.len(),
            settlement_count: settlements.len(),
            total_spent: expenses.iter().map(|e| e.amount).sum(),
            earliest_expense: expenses.iter().map(|e| e.created_at).min().map(|d| d.to_rfc3339()),
            latest_expense: expenses.iter().map(|e| e.created_at).max().map(|d| d.to_rfc3339()),
        };

        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            group,
            members,
            expenses,
            settlements,
            metadata,
        })
    }

    /// Check the schema version and that every reference stays in the group
    pub fn validate(&self) -> Result<(), String> {
        if self.schema_version != EXPORT_SCHEMA_VERSION {
            return Err(format!(
                "Schema version mismatch: expected {}, got {}",
                EXPORT_SCHEMA_VERSION, self.schema_version
            ));
        }

        let group_id = self.group.id;
        let member_ids: HashSet<_> = self.members.iter().map(|m| m.id).collect();

        if member_ids.len() != self.members.len() {
            return Err("Duplicate member ids".to_string());
        }

        if let Some(m) = self.members.iter().find(|m| m.group_id != group_id) {
            return Err(format!("Member {} belongs to another group", m.id));
        }

        for expense in &self.expenses {
            if expense.group_id != group_id {
                return Err(format!("Expense {} belongs to another group", expense.id));
            }
            expense
                .validate()
                .map_err(|e| format!("Expense {}: {}", expense.id, e))?;
            if !member_ids.contains(&expense.payer_id) {
                return Err(format!(
                    "Expense {} references unknown payer {}",
                    expense.id, expense.payer_id
                ));
            }
            if let Some(p) = expense.participant_ids.iter().find(|p| !member_ids.contains(p)) {
                return Err(format!(
                    "Expense {} references unknown participant {}",
                    expense.id, p
                ));
            }
        }

        for s in &self.settlements {
            if s.group_id != group_id {
                return Err(format!("Settlement {} belongs to another group", s.id));
            }
            if !member_ids.contains(&s.from_member_id) || !member_ids.contains(&s.to_member_id) {
                return Err(format!("Settlement {} references an unknown member", s.id));
            }
        }

        Ok(())
    }

    /// Insert the exported group into storage
    ///
    /// Fails if a group with the same id or name already exists.
    pub fn restore(&self, storage: &Storage) -> WarikanResult<()> {
        self.validate().map_err(WarikanError::Import)?;

        if storage.groups.get(self.group.id)?.is_some() {
            return Err(WarikanError::Duplicate {
                entity_type: "Group",
                identifier: self.group.id.to_string(),
            });
        }
        if storage.groups.find(&self.group.name)?.is_some() {
            return Err(WarikanError::Duplicate {
                entity_type: "Group",
                identifier: self.group.name.clone(),
            });
        }

        storage.groups.upsert(self.group.clone())?;
        for member in &self.members {
            storage.members.upsert(member.clone())?;
        }
        for expense in &self.expenses {
            storage.expenses.upsert(expense.clone())?;
        }
        // Imported transfers only keep their paid status where they still
        // settle the imported expenses
        let members = storage.members.get_by_group(self.group.id)?;
        let settlements =
            reconcile_settlements(self.group.id, &self.expenses, &members, &self.settlements);
        storage.settlements.replace_group(self.group.id, settlements)?;
        storage.save_all()?;

        let mut entries = vec![AuditEntry::create(
            EntityType::Group,
            self.group.id.to_string(),
            Some(self.group.name.clone()),
            &self.group,
        )];
        entries.extend(self.members.iter().map(|m| {
            AuditEntry::create(EntityType::Member, m.id.to_string(), Some(m.name.clone()), m)
        }));
        entries.extend(self.expenses.iter().map(|e| {
            AuditEntry::create(EntityType::Expense, e.id.to_string(), Some(e.title.clone()), e)
        }));
        storage.log_entries(&entries)?;

        info!(
            group = %self.group.id,
            members = self.members.len(),
            expenses = self.expenses.len(),
            "group imported"
        );
        Ok(())
    }
}

/// Export a group to JSON
pub fn export_group_json<W: Write>(
    storage: &Storage,
    group_id: GroupId,
    writer: &mut W,
    pretty: bool,
) -> WarikanResult<()> {
    let export = GroupExport::from_storage(storage, group_id)?;

    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| WarikanError::Export(e.to_string()))
}

/// Parse and validate a JSON group export
pub fn import_from_json(json_str: &str) -> WarikanResult<GroupExport> {
    let export: GroupExport =
        serde_json::from_str(json_str).map_err(|e| WarikanError::Import(e.to_string()))?;

    export.validate().map_err(WarikanError::Import)?;

    Ok(export)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{ExpenseService, GroupService, NewExpense, SettlementService};

    fn seeded() -> (Storage, GroupId) {
        let storage = Storage::in_memory();
        let names: Vec<String> = ["Alice", "Bob"].iter().map(|s| s.to_string()).collect();
        let group = GroupService::new(&storage).create("Trip", &names).unwrap();
        let members = storage.members.get_by_group(group.id).unwrap();

        ExpenseService::new(&storage)
            .add(
                group.id,
                NewExpense {
                    payer_id: members[0].id,
                    title: "Hotel".into(),
                    amount: Money::new(12000),
                    participant_ids: members.iter().map(|m| m.id).collect(),
                },
            )
            .unwrap();
        let settlements = storage.settlements.get_by_group(group.id).unwrap();
        SettlementService::new(&storage)
            .set_paid(group.id, &settlements[0].id.to_string(), true)
            .unwrap();

        (storage, group.id)
    }

    #[test]
    fn test_group_export() {
        let (storage, group) = seeded();
        let export = GroupExport::from_storage(&storage, group).unwrap();

        assert_eq!(export.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(export.metadata.member_count, 2);
        assert_eq!(export.metadata.expense_count, 1);
        assert_eq!(export.metadata.settlement_count, 1);
        assert_eq!(export.metadata.total_spent, Money::new(12000));
        assert!(export.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip_into_fresh_storage() {
        let (storage, group) = seeded();
        let mut out = Vec::new();
        export_group_json(&storage, group, &mut out, true).unwrap();

        let imported = import_from_json(&String::from_utf8(out).unwrap()).unwrap();
        let target = Storage::in_memory();
        imported.restore(&target).unwrap();

        let settlements = target.settlements.get_by_group(group).unwrap();
        assert_eq!(settlements.len(), 1);
        assert!(settlements[0].is_paid);
        assert_eq!(target.members.get_by_group(group).unwrap().len(), 2);

        // Restoring the same export twice is refused
        assert!(matches!(
            imported.restore(&target),
            Err(WarikanError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_dangling_references() {
        let (storage, group) = seeded();
        let mut export = GroupExport::from_storage(&storage, group).unwrap();
        export.members.pop();

        let err = export.validate().unwrap_err();
        assert!(err.contains("unknown"));

        let mut export = GroupExport::from_storage(&storage, group).unwrap();
        export.schema_version = "0.1".into();
        assert!(export.validate().unwrap_err().contains("Schema version"));
    }

    #[test]
    fn test_restore_recomputes_transfers_for_edited_expenses() {
        let (storage, group) = seeded();
        let mut export = GroupExport::from_storage(&storage, group).unwrap();
        export.expenses[0].amount = Money::new(30000);

        let target = Storage::in_memory();
        export.restore(&target).unwrap();

        let balances = SettlementService::new(&target).balances(group).unwrap();
        let settlements = target.settlements.get_by_group(group).unwrap();
        assert_eq!(settlements.len(), 1);
        assert_eq!(settlements[0].amount, Money::new(15000));
        assert_eq!(settlements[0].amount, balances[0].balance);
        // The exported transfer no longer applies, so its paid status is gone
        assert!(!settlements[0].is_paid);
    }

    #[test]
    fn test_validate_rejects_invalid_expenses() {
        let (storage, group) = seeded();
        let mut export = GroupExport::from_storage(&storage, group).unwrap();
        export.expenses[0].amount = Money::new(0);
        assert!(export.validate().unwrap_err().contains("positive"));

        export.expenses[0].amount = Money::new(i64::MAX);
        assert!(matches!(
            export.restore(&Storage::in_memory()),
            Err(WarikanError::Import(_))
        ));
    }

    #[test]
    fn test_import_garbage_is_import_error() {
        assert!(matches!(
            import_from_json("{\"nope\": 1}"),
            Err(WarikanError::Import(_))
        ));
    }
}
