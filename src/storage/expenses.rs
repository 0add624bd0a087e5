//! Expense repository
//!
//! Manages loading and saving expenses to the `expenses` collection

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::WarikanError;
use crate::models::{Expense, ExpenseId, GroupId};

use super::backend::{load_collection, save_collection, StorageBackend};

pub(crate) const COLLECTION: &str = "expenses";

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ExpenseData {
    expenses: Vec<Expense>,
}

/// Repository for expense persistence
pub struct ExpenseRepository {
    backend: Arc<dyn StorageBackend>,
    data: RwLock<HashMap<ExpenseId, Expense>>,
}

impl ExpenseRepository {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load expenses from the backend
    pub fn load(&self) -> Result<(), WarikanError> {
        let file_data: ExpenseData = load_collection(self.backend.as_ref(), COLLECTION)?;

        let mut data = self.data.write().map_err(|e| {
            WarikanError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for expense in file_data.expenses {
            data.insert(expense.id, expense);
        }

        Ok(())
    }

    /// Save expenses to the backend, oldest first
    pub fn save(&self) -> Result<(), WarikanError> {
        let data = self.data.read().map_err(|e| {
            WarikanError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut expenses: Vec<_> = data.values().cloned().collect();
        expenses.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        save_collection(self.backend.as_ref(), COLLECTION, &ExpenseData { expenses })
    }

    pub fn get(&self, id: ExpenseId) -> Result<Option<Expense>, WarikanError> {
        let data = self.data.read().map_err(|e| {
            WarikanError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// Expenses of a group, newest first
    pub fn get_by_group(&self, group_id: GroupId) -> Result<Vec<Expense>, WarikanError> {
        let data = self.data.read().map_err(|e| {
            WarikanError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut expenses: Vec<_> = data
            .values()
            .filter(|e| e.group_id == group_id)
            .cloned()
            .collect();
        expenses.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(expenses)
    }

    /// Find an expense of a group by id
    pub fn find_in_group(
        &self,
        group_id: GroupId,
        identifier: &str,
    ) -> Result<Option<Expense>, WarikanError> {
        Ok(self
            .get_by_group(group_id)?
            .into_iter()
            .find(|e| e.id.matches_identifier(identifier)))
    }

    /// Insert or update an expense
    pub fn upsert(&self, expense: Expense) -> Result<(), WarikanError> {
        let mut data = self.data.write().map_err(|e| {
            WarikanError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.insert(expense.id, expense);
        Ok(())
    }

    pub fn delete(&self, id: ExpenseId) -> Result<Option<Expense>, WarikanError> {
        let mut data = self.data.write().map_err(|e| {
            WarikanError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(data.remove(&id))
    }

    /// Remove every expense of a group, returning the removed expenses
    pub fn delete_group(&self, group_id: GroupId) -> Result<Vec<Expense>, WarikanError> {
        let mut data = self.data.write().map_err(|e| {
            WarikanError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let ids: Vec<_> = data
            .values()
            .filter(|e| e.group_id == group_id)
            .map(|e| e.id)
            .collect();

        Ok(ids.iter().filter_map(|id| data.remove(id)).collect())
    }
}
