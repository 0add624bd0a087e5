//! Storage layer for warikan
//!
//! Repositories hold each collection in memory behind a lock and persist it
//! through a [`StorageBackend`]. The default backend writes one JSON file
//! per collection with atomic renames.

pub mod backend;
pub mod expenses;
pub mod file_io;
pub mod groups;
pub mod init;
pub mod members;
pub mod settlements;

use std::sync::Arc;

use serde::Serialize;

pub use backend::{JsonFileBackend, MemoryBackend, StorageBackend};
pub use expenses::ExpenseRepository;
pub use file_io::{write_bytes_atomic, write_json_atomic};
pub use groups::GroupRepository;
pub use init::{initialize_storage, needs_initialization};
pub use members::MemberRepository;
pub use settlements::SettlementRepository;

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::WarikanPaths;
use crate::error::WarikanError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    backend: Arc<dyn StorageBackend>,
    audit: Option<AuditLogger>,
    pub groups: GroupRepository,
    pub members: MemberRepository,
    pub expenses: ExpenseRepository,
    pub settlements: SettlementRepository,
}

impl Storage {
    /// File-backed storage under the given paths, with audit logging
    pub fn new(paths: &WarikanPaths) -> Result<Self, WarikanError> {
        paths.ensure_directories()?;

        let backend = Arc::new(JsonFileBackend::new(paths.data_dir()));
        let mut storage = Self::with_backend(backend);
        storage.audit = Some(AuditLogger::new(paths.audit_log()));
        Ok(storage)
    }

    /// Storage over an arbitrary backend, without audit logging
    pub fn with_backend(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            groups: GroupRepository::new(backend.clone()),
            members: MemberRepository::new(backend.clone()),
            expenses: ExpenseRepository::new(backend.clone()),
            settlements: SettlementRepository::new(backend.clone()),
            backend,
            audit: None,
        }
    }

    /// Empty process-local storage
    pub fn in_memory() -> Self {
        Self::with_backend(Arc::new(MemoryBackend::new()))
    }

    pub fn describe_backend(&self) -> String {
        self.backend.describe()
    }

    pub fn audit_logger(&self) -> Option<&AuditLogger> {
        self.audit.as_ref()
    }

    /// Load all collections from the backend
    pub fn load_all(&self) -> Result<(), WarikanError> {
        self.groups.load()?;
        self.members.load()?;
        self.expenses.load()?;
        self.settlements.load()?;
        Ok(())
    }

    /// Save all collections to the backend
    pub fn save_all(&self) -> Result<(), WarikanError> {
        self.groups.save()?;
        self.members.save()?;
        self.expenses.save()?;
        self.settlements.save()?;
        Ok(())
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), WarikanError> {
        self.log_entries(&[AuditEntry::create(entity_type, entity_id, entity_name, entity)])
    }

    /// Log an update; the diff is generated from the two states when not given
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        before: &T,
        after: &T,
        diff_summary: Option<String>,
    ) -> Result<(), WarikanError> {
        let diff_summary = diff_summary.or_else(|| {
            let before = serde_json::to_value(before).ok()?;
            let after = serde_json::to_value(after).ok()?;
            generate_diff(&before, &after)
        });

        self.log_entries(&[AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff_summary,
        )])
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), WarikanError> {
        self.log_entries(&[AuditEntry::delete(entity_type, entity_id, entity_name, entity)])
    }

    /// Append prepared entries; a no-op when auditing is off
    pub fn log_entries(&self, entries: &[AuditEntry]) -> Result<(), WarikanError> {
        match &self.audit {
            Some(logger) => logger.log_batch(entries),
            None => Ok(()),
        }
    }
}
