//! Group repository
//!
//! Manages loading and saving groups to the `groups` collection

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::WarikanError;
use crate::models::{Group, GroupId};

use super::backend::{load_collection, save_collection, StorageBackend};

pub(crate) const COLLECTION: &str = "groups";

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct GroupData {
    groups: Vec<Group>,
}

/// Repository for group persistence
pub struct GroupRepository {
    backend: Arc<dyn StorageBackend>,
    data: RwLock<HashMap<GroupId, Group>>,
}

impl GroupRepository {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load groups from the backend
    pub fn load(&self) -> Result<(), WarikanError> {
        let file_data: GroupData = load_collection(self.backend.as_ref(), COLLECTION)?;

        let mut data = self.data.write().map_err(|e| {
            WarikanError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for group in file_data.groups {
            data.insert(group.id, group);
        }

        Ok(())
    }

    /// Save groups to the backend
    pub fn save(&self) -> Result<(), WarikanError> {
        let groups = self.get_all()?;
        save_collection(self.backend.as_ref(), COLLECTION, &GroupData { groups })
    }

    pub fn get(&self, id: GroupId) -> Result<Option<Group>, WarikanError> {
        let data = self.data.read().map_err(|e| {
            WarikanError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// All groups, oldest first
    pub fn get_all(&self) -> Result<Vec<Group>, WarikanError> {
        let data = self.data.read().map_err(|e| {
            WarikanError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut groups: Vec<_> = data.values().cloned().collect();
        groups.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(groups)
    }

    /// Find a group by name (case-insensitive) or id
    pub fn find(&self, identifier: &str) -> Result<Option<Group>, WarikanError> {
        let groups = self.get_all()?;

        if let Some(group) = groups.iter().find(|g| g.matches_name(identifier)) {
            return Ok(Some(group.clone()));
        }

        Ok(groups
            .into_iter()
            .find(|g| g.id.matches_identifier(identifier)))
    }

    /// Insert or update a group
    pub fn upsert(&self, group: Group) -> Result<(), WarikanError> {
        let mut data = self.data.write().map_err(|e| {
            WarikanError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.insert(group.id, group);
        Ok(())
    }

    /// Delete a group, returning it if it existed
    pub fn delete(&self, id: GroupId) -> Result<Option<Group>, WarikanError> {
        let mut data = self.data.write().map_err(|e| {
            WarikanError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(data.remove(&id))
    }

    pub fn count(&self) -> Result<usize, WarikanError> {
        let data = self.data.read().map_err(|e| {
            WarikanError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.len())
    }
}
