//! Member service
//!
//! Adding, editing and removing group members. Removing a member rewrites
//! the expenses they shared, so it ends with a settlement recalculation.

use tracing::info;

use crate::audit::EntityType;
use crate::error::{WarikanError, WarikanResult};
use crate::models::{GroupId, Member, MemberId, PaymentMethod};
use crate::storage::Storage;

use super::settlement::SettlementService;

/// Service for member management
pub struct MemberService<'a> {
    storage: &'a Storage,
}

/// Fields to change on a member; `None` leaves a field as it is
#[derive(Debug, Clone, Default)]
pub struct MemberUpdate {
    pub name: Option<String>,
    pub payment_method: Option<PaymentMethod>,
    /// `Some("")` clears the stored info
    pub payment_info: Option<String>,
}

impl<'a> MemberService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Add a member at the end of the group's member order
    pub fn add(&self, group_id: GroupId, name: &str) -> WarikanResult<Member> {
        self.storage
            .groups
            .get(group_id)?
            .ok_or_else(|| WarikanError::group_not_found(group_id.to_string()))?;

        let name = name.trim();
        if name.is_empty() {
            return Err(WarikanError::Validation("Member name cannot be empty".into()));
        }

        if self.storage.members.name_exists(group_id, name, None)? {
            return Err(WarikanError::Duplicate {
                entity_type: "Member",
                identifier: name.to_string(),
            });
        }

        let sort_order = self.storage.members.next_sort_order(group_id)?;
        let member = Member::with_sort_order(group_id, name, sort_order);
        member
            .validate()
            .map_err(|e| WarikanError::Validation(e.to_string()))?;

        self.storage.members.upsert(member.clone())?;
        self.storage.members.save()?;

        self.storage.log_create(
            EntityType::Member,
            member.id.to_string(),
            Some(member.name.clone()),
            &member,
        )?;

        Ok(member)
    }

    /// Members of a group in display order
    pub fn list(&self, group_id: GroupId) -> WarikanResult<Vec<Member>> {
        self.storage.members.get_by_group(group_id)
    }

    /// Find a member of a group by name or id
    pub fn find(&self, group_id: GroupId, identifier: &str) -> WarikanResult<Member> {
        self.storage
            .members
            .find_in_group(group_id, identifier)?
            .ok_or_else(|| WarikanError::member_not_found(identifier))
    }

    /// Resolve several names or ids at once
    pub fn find_all(&self, group_id: GroupId, identifiers: &[String]) -> WarikanResult<Vec<Member>> {
        identifiers
            .iter()
            .map(|identifier| self.find(group_id, identifier))
            .collect()
    }

    /// Change a member's name or payment preferences
    ///
    /// Settlements refer to members by id, so nothing is recalculated.
    pub fn update(&self, id: MemberId, changes: MemberUpdate) -> WarikanResult<Member> {
        let before = self
            .storage
            .members
            .get(id)?
            .ok_or_else(|| WarikanError::member_not_found(id.to_string()))?;

        let mut member = before.clone();

        if let Some(name) = changes.name {
            let name = name.trim();
            if self
                .storage
                .members
                .name_exists(member.group_id, name, Some(member.id))?
            {
                return Err(WarikanError::Duplicate {
                    entity_type: "Member",
                    identifier: name.to_string(),
                });
            }
            member.name = name.to_string();
        }

        if changes.payment_method.is_some() || changes.payment_info.is_some() {
            let method = changes.payment_method.unwrap_or(member.payment_method);
            let info = changes.payment_info.or_else(|| member.payment_info.clone());
            member.set_payment(method, info);
        }

        member
            .validate()
            .map_err(|e| WarikanError::Validation(e.to_string()))?;

        self.storage.members.upsert(member.clone())?;
        self.storage.members.save()?;

        self.storage.log_update(
            EntityType::Member,
            member.id.to_string(),
            Some(member.name.clone()),
            &before,
            &member,
            None,
        )?;

        Ok(member)
    }

    /// Remove a member and drop them from every expense they shared
    ///
    /// A member who paid for an expense cannot be removed until that expense
    /// is deleted or reassigned.
    pub fn remove(&self, id: MemberId) -> WarikanResult<Member> {
        let member = self
            .storage
            .members
            .get(id)?
            .ok_or_else(|| WarikanError::member_not_found(id.to_string()))?;

        let expenses = self.storage.expenses.get_by_group(member.group_id)?;

        let paid_for = expenses.iter().filter(|e| e.payer_id == id).count();
        if paid_for > 0 {
            return Err(WarikanError::Validation(format!(
                "{} paid for {} expense(s); delete or reassign them first",
                member.name, paid_for
            )));
        }

        let mut touched = 0;
        for mut expense in expenses {
            if expense.remove_participant(id) {
                self.storage.expenses.upsert(expense)?;
                touched += 1;
            }
        }

        self.storage.members.delete(id)?;
        self.storage.members.save()?;
        if touched > 0 {
            self.storage.expenses.save()?;
        }

        info!(member = %member.id, expenses = touched, "member removed");

        self.storage.log_delete(
            EntityType::Member,
            member.id.to_string(),
            Some(member.name.clone()),
            &member,
        )?;

        SettlementService::new(self.storage).recalculate(member.group_id)?;

        Ok(member)
    }
}
