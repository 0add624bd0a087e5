//! Group service
//!
//! Creating, renaming and deleting groups, and the per-group summary shown
//! by `group show`.

use std::collections::HashSet;

use tracing::info;

use crate::audit::{AuditEntry, EntityType};
use crate::error::{WarikanError, WarikanResult};
use crate::models::{Group, GroupId, Member, Money};
use crate::storage::Storage;

use super::member::MemberService;
use super::settlement::{SettlementProgress, SettlementService};

/// Service for group management
pub struct GroupService<'a> {
    storage: &'a Storage,
}

/// A group with its computed totals
#[derive(Debug, Clone)]
pub struct GroupSummary {
    pub group: Group,
    pub members: Vec<Member>,
    pub expense_count: usize,
    pub total_spent: Money,
    pub progress: SettlementProgress,
}

impl<'a> GroupService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a group with its initial members, in the given order
    pub fn create(&self, name: &str, member_names: &[String]) -> WarikanResult<Group> {
        let name = name.trim();
        let group = Group::new(name);
        group
            .validate()
            .map_err(|e| WarikanError::Validation(e.to_string()))?;

        if self.storage.groups.find(name)?.is_some() {
            return Err(WarikanError::Duplicate {
                entity_type: "Group",
                identifier: name.to_string(),
            });
        }

        // Check member names up front so a bad list creates nothing
        let mut seen = HashSet::new();
        for member_name in member_names {
            let normalized = Member::normalize_name(member_name);
            if normalized.is_empty() {
                return Err(WarikanError::Validation("Member name cannot be empty".into()));
            }
            if !seen.insert(normalized) {
                return Err(WarikanError::Duplicate {
                    entity_type: "Member",
                    identifier: member_name.trim().to_string(),
                });
            }
        }

        self.storage.groups.upsert(group.clone())?;
        self.storage.groups.save()?;

        self.storage.log_create(
            EntityType::Group,
            group.id.to_string(),
            Some(group.name.clone()),
            &group,
        )?;

        let members = MemberService::new(self.storage);
        for member_name in member_names {
            members.add(group.id, member_name)?;
        }

        info!(group = %group.id, members = member_names.len(), "group created");
        Ok(group)
    }

    /// All groups, oldest first
    pub fn list(&self) -> WarikanResult<Vec<Group>> {
        self.storage.groups.get_all()
    }

    pub fn get(&self, id: GroupId) -> WarikanResult<Group> {
        self.storage
            .groups
            .get(id)?
            .ok_or_else(|| WarikanError::group_not_found(id.to_string()))
    }

    /// Find a group by name or id
    pub fn find(&self, identifier: &str) -> WarikanResult<Group> {
        self.storage
            .groups
            .find(identifier)?
            .ok_or_else(|| WarikanError::group_not_found(identifier))
    }

    pub fn rename(&self, id: GroupId, name: &str) -> WarikanResult<Group> {
        let before = self.get(id)?;
        let name = name.trim();

        if let Some(other) = self.storage.groups.find(name)? {
            if other.id != id {
                return Err(WarikanError::Duplicate {
                    entity_type: "Group",
                    identifier: name.to_string(),
                });
            }
        }

        let mut group = before.clone();
        group.rename(name);
        group
            .validate()
            .map_err(|e| WarikanError::Validation(e.to_string()))?;

        self.storage.groups.upsert(group.clone())?;
        self.storage.groups.save()?;

        self.storage.log_update(
            EntityType::Group,
            group.id.to_string(),
            Some(group.name.clone()),
            &before,
            &group,
            None,
        )?;

        Ok(group)
    }

    /// Delete a group with all of its members, expenses and settlements
    pub fn delete(&self, id: GroupId) -> WarikanResult<Group> {
        let group = self
            .storage
            .groups
            .delete(id)?
            .ok_or_else(|| WarikanError::group_not_found(id.to_string()))?;

        let members = self.storage.members.delete_group(id)?;
        let expenses = self.storage.expenses.delete_group(id)?;
        let settlements = self.storage.settlements.delete_group(id)?;
        self.storage.save_all()?;

        let mut entries = vec![AuditEntry::delete(
            EntityType::Group,
            group.id.to_string(),
            Some(group.name.clone()),
            &group,
        )];
        entries.extend(members.iter().map(|m| {
            AuditEntry::delete(EntityType::Member, m.id.to_string(), Some(m.name.clone()), m)
        }));
        entries.extend(expenses.iter().map(|e| {
            AuditEntry::delete(EntityType::Expense, e.id.to_string(), Some(e.title.clone()), e)
        }));
        self.storage.log_entries(&entries)?;

        info!(
            group = %group.id,
            members = members.len(),
            expenses = expenses.len(),
            settlements = settlements.len(),
            "group deleted"
        );

        Ok(group)
    }

    pub fn summary(&self, id: GroupId) -> WarikanResult<GroupSummary> {
        let group = self.get(id)?;
        let members = self.storage.members.get_by_group(id)?;
        let expenses = self.storage.expenses.get_by_group(id)?;
        let progress = SettlementService::new(self.storage).progress(id)?;

        Ok(GroupSummary {
            group,
            members,
            expense_count: expenses.len(),
            total_spent: expenses.iter().map(|e| e.amount).sum(),
            progress,
        })
    }
}
