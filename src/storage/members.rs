//! Member repository
//!
//! Manages loading and saving members to the `members` collection

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::WarikanError;
use crate::models::{GroupId, Member, MemberId};

use super::backend::{load_collection, save_collection, StorageBackend};

pub(crate) const COLLECTION: &str = "members";

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct MemberData {
    members: Vec<Member>,
}

/// Repository for member persistence
pub struct MemberRepository {
    backend: Arc<dyn StorageBackend>,
    data: RwLock<HashMap<MemberId, Member>>,
}

/// Display order within a group: sort_order, then join time
fn member_order(a: &Member, b: &Member) -> std::cmp::Ordering {
    a.sort_order
        .cmp(&b.sort_order)
        .then(a.created_at.cmp(&b.created_at))
        .then(a.id.cmp(&b.id))
}

impl MemberRepository {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load members from the backend
    pub fn load(&self) -> Result<(), WarikanError> {
        let file_data: MemberData = load_collection(self.backend.as_ref(), COLLECTION)?;

        let mut data = self.data.write().map_err(|e| {
            WarikanError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for member in file_data.members {
            data.insert(member.id, member);
        }

        Ok(())
    }

    /// Save members to the backend
    pub fn save(&self) -> Result<(), WarikanError> {
        let data = self.data.read().map_err(|e| {
            WarikanError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut members: Vec<_> = data.values().cloned().collect();
        members.sort_by(|a, b| a.group_id.cmp(&b.group_id).then(member_order(a, b)));

        save_collection(self.backend.as_ref(), COLLECTION, &MemberData { members })
    }

    pub fn get(&self, id: MemberId) -> Result<Option<Member>, WarikanError> {
        let data = self.data.read().map_err(|e| {
            WarikanError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// Members of a group in display order
    pub fn get_by_group(&self, group_id: GroupId) -> Result<Vec<Member>, WarikanError> {
        let data = self.data.read().map_err(|e| {
            WarikanError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut members: Vec<_> = data
            .values()
            .filter(|m| m.group_id == group_id)
            .cloned()
            .collect();
        members.sort_by(member_order);
        Ok(members)
    }

    /// Find a member of a group by name (case-insensitive) or id
    pub fn find_in_group(
        &self,
        group_id: GroupId,
        identifier: &str,
    ) -> Result<Option<Member>, WarikanError> {
        let members = self.get_by_group(group_id)?;

        if let Some(member) = members.iter().find(|m| m.matches_name(identifier)) {
            return Ok(Some(member.clone()));
        }

        Ok(members
            .into_iter()
            .find(|m| m.id.matches_identifier(identifier)))
    }

    /// Check whether another member of the group already uses this name
    pub fn name_exists(
        &self,
        group_id: GroupId,
        name: &str,
        exclude: Option<MemberId>,
    ) -> Result<bool, WarikanError> {
        let data = self.data.read().map_err(|e| {
            WarikanError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.values().any(|m| {
            m.group_id == group_id && Some(m.id) != exclude && m.matches_name(name)
        }))
    }

    /// Next free sort_order slot in a group
    pub fn next_sort_order(&self, group_id: GroupId) -> Result<i32, WarikanError> {
        let members = self.get_by_group(group_id)?;
        Ok(members.last().map(|m| m.sort_order + 1).unwrap_or(0))
    }

    /// Insert or update a member
    pub fn upsert(&self, member: Member) -> Result<(), WarikanError> {
        let mut data = self.data.write().map_err(|e| {
            WarikanError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.insert(member.id, member);
        Ok(())
    }

    pub fn delete(&self, id: MemberId) -> Result<Option<Member>, WarikanError> {
        let mut data = self.data.write().map_err(|e| {
            WarikanError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(data.remove(&id))
    }

    /// Remove every member of a group, returning the removed members
    pub fn delete_group(&self, group_id: GroupId) -> Result<Vec<Member>, WarikanError> {
        let mut data = self.data.write().map_err(|e| {
            WarikanError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let ids: Vec<_> = data
            .values()
            .filter(|m| m.group_id == group_id)
            .map(|m| m.id)
            .collect();

        Ok(ids.iter().filter_map(|id| data.remove(id)).collect())
    }
}
