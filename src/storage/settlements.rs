//! Settlement repository
//!
//! Settlements are stored per group as an ordered list; the order is the
//! solver's output order and is preserved across save and load.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::WarikanError;
use crate::models::{GroupId, Settlement, SettlementId};

use super::backend::{load_collection, save_collection, StorageBackend};

pub(crate) const COLLECTION: &str = "settlements";

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct SettlementData {
    settlements: Vec<Settlement>,
}

/// Repository for settlement persistence
pub struct SettlementRepository {
    backend: Arc<dyn StorageBackend>,
    data: RwLock<HashMap<GroupId, Vec<Settlement>>>,
}

impl SettlementRepository {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load settlements from the backend
    pub fn load(&self) -> Result<(), WarikanError> {
        let file_data: SettlementData = load_collection(self.backend.as_ref(), COLLECTION)?;

        let mut data = self.data.write().map_err(|e| {
            WarikanError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for settlement in file_data.settlements {
            data.entry(settlement.group_id).or_default().push(settlement);
        }

        Ok(())
    }

    /// Save settlements to the backend
    pub fn save(&self) -> Result<(), WarikanError> {
        let data = self.data.read().map_err(|e| {
            WarikanError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut group_ids: Vec<_> = data.keys().copied().collect();
        group_ids.sort();

        let settlements = group_ids
            .iter()
            .filter_map(|id| data.get(id))
            .flat_map(|list| list.iter().cloned())
            .collect();

        save_collection(
            self.backend.as_ref(),
            COLLECTION,
            &SettlementData { settlements },
        )
    }

    /// A group's settlements in stored order
    pub fn get_by_group(&self, group_id: GroupId) -> Result<Vec<Settlement>, WarikanError> {
        let data = self.data.read().map_err(|e| {
            WarikanError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&group_id).cloned().unwrap_or_default())
    }

    pub fn get(&self, id: SettlementId) -> Result<Option<Settlement>, WarikanError> {
        let data = self.data.read().map_err(|e| {
            WarikanError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.values().flatten().find(|s| s.id == id).cloned())
    }

    /// Find a settlement of a group by id
    pub fn find_in_group(
        &self,
        group_id: GroupId,
        identifier: &str,
    ) -> Result<Option<Settlement>, WarikanError> {
        Ok(self
            .get_by_group(group_id)?
            .into_iter()
            .find(|s| s.id.matches_identifier(identifier)))
    }

    /// Replace a group's whole settlement set, returning the old one
    pub fn replace_group(
        &self,
        group_id: GroupId,
        settlements: Vec<Settlement>,
    ) -> Result<Vec<Settlement>, WarikanError> {
        let mut data = self.data.write().map_err(|e| {
            WarikanError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let previous = if settlements.is_empty() {
            data.remove(&group_id)
        } else {
            data.insert(group_id, settlements)
        };

        Ok(previous.unwrap_or_default())
    }

    /// Update one settlement in place, keeping its position
    ///
    /// Returns false if no settlement with that id is stored.
    pub fn update(&self, settlement: Settlement) -> Result<bool, WarikanError> {
        let mut data = self.data.write().map_err(|e| {
            WarikanError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let slot = data
            .get_mut(&settlement.group_id)
            .and_then(|list| list.iter_mut().find(|s| s.id == settlement.id));

        match slot {
            Some(slot) => {
                *slot = settlement;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Drop a group's settlements entirely
    pub fn delete_group(&self, group_id: GroupId) -> Result<Vec<Settlement>, WarikanError> {
        self.replace_group(group_id, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MemberId, Money};
    use crate::storage::backend::MemoryBackend;
    use chrono::Utc;

    fn create_test_repo() -> (Arc<MemoryBackend>, SettlementRepository) {
        let backend = Arc::new(MemoryBackend::new());
        let repo = SettlementRepository::new(backend.clone());
        (backend, repo)
    }

    fn transfers(group: GroupId, amounts: &[i64]) -> Vec<Settlement> {
        amounts
            .iter()
            .map(|a| Settlement::new(group, MemberId::new(), MemberId::new(), Money::new(*a)))
            .collect()
    }

    #[test]
    fn test_replace_group_returns_previous() {
        let (_backend, repo) = create_test_repo();
        let group = GroupId::new();

        assert!(repo.replace_group(group, transfers(group, &[500])).unwrap().is_empty());
        let old = repo.replace_group(group, transfers(group, &[300, 200])).unwrap();

        assert_eq!(old.len(), 1);
        assert_eq!(repo.get_by_group(group).unwrap().len(), 2);
    }

    #[test]
    fn test_order_preserved_across_reload() {
        let (backend, repo) = create_test_repo();
        let group = GroupId::new();
        let other = GroupId::new();
        repo.replace_group(group, transfers(group, &[900, 100, 500])).unwrap();
        repo.replace_group(other, transfers(other, &[42])).unwrap();
        repo.save().unwrap();

        let repo2 = SettlementRepository::new(backend);
        repo2.load().unwrap();

        let amounts: Vec<_> = repo2
            .get_by_group(group)
            .unwrap()
            .iter()
            .map(|s| s.amount.units())
            .collect();
        assert_eq!(amounts, vec![900, 100, 500]);
        assert_eq!(repo2.get_by_group(other).unwrap().len(), 1);
    }

    #[test]
    fn test_update_in_place() {
        let (_backend, repo) = create_test_repo();
        let group = GroupId::new();
        let list = transfers(group, &[300, 200]);
        repo.replace_group(group, list.clone()).unwrap();

        let mut second = list[1].clone();
        second.set_paid(true, Utc::now());
        assert!(repo.update(second.clone()).unwrap());

        let stored = repo.get_by_group(group).unwrap();
        assert_eq!(stored[1], second);
        assert!(!stored[0].is_paid);
        assert_eq!(repo.get(second.id).unwrap(), Some(second));

        let stray = transfers(group, &[1]).remove(0);
        assert!(!repo.update(stray).unwrap());
    }

    #[test]
    fn test_find_and_delete_group() {
        let (_backend, repo) = create_test_repo();
        let group = GroupId::new();
        let list = transfers(group, &[300]);
        repo.replace_group(group, list.clone()).unwrap();

        let found = repo.find_in_group(group, &list[0].id.to_string()).unwrap();
        assert_eq!(found.map(|s| s.id), Some(list[0].id));

        assert_eq!(repo.delete_group(group).unwrap().len(), 1);
        assert!(repo.get_by_group(group).unwrap().is_empty());
    }
}
