//! Settlement service
//!
//! Runs the reconciler against a group's current snapshot, stores the
//! result, and handles the paid/unpaid toggle.

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::audit::EntityType;
use crate::error::{WarikanError, WarikanResult};
use crate::models::{GroupId, MemberBalance, Settlement};
use crate::settlement::{compute_balances, reconcile_with_report, Reconciliation};
use crate::storage::Storage;

/// Service for settlement management
pub struct SettlementService<'a> {
    storage: &'a Storage,
}

/// How far a group is through paying off its transfers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlementProgress {
    pub paid: usize,
    pub total: usize,
}

impl SettlementProgress {
    /// Whole-number percentage; an empty set counts as complete
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        ((self.paid * 100) / self.total) as u32
    }

    pub fn is_complete(&self) -> bool {
        self.paid == self.total
    }
}

impl<'a> SettlementService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Recompute a group's settlements and carry paid status forward
    ///
    /// The new set replaces the stored one in memory before it is saved. If
    /// the save fails the error is returned, but the in-memory set already
    /// reflects the recomputation.
    pub fn recalculate(&self, group_id: GroupId) -> WarikanResult<Reconciliation> {
        let members = self.storage.members.get_by_group(group_id)?;
        let expenses = self.storage.expenses.get_by_group(group_id)?;
        let previous = self.storage.settlements.get_by_group(group_id)?;

        let report = reconcile_with_report(group_id, &expenses, &members, &previous);

        for lost in report.discarded_paid() {
            warn!(
                group = %group_id,
                settlement = %lost.id,
                amount = %lost.amount,
                "paid settlement no longer matches any transfer; status discarded"
            );
        }
        debug!(
            group = %group_id,
            transfers = report.settlements.len(),
            carried_over = report.carried_over,
            discarded = report.discarded.len(),
            "settlements reconciled"
        );

        self.storage
            .settlements
            .replace_group(group_id, report.settlements.clone())?;

        if let Err(e) = self.storage.settlements.save() {
            error!(group = %group_id, error = %e, "failed to save recalculated settlements");
            return Err(e);
        }

        Ok(report)
    }

    /// A group's settlements in solver order
    pub fn list(&self, group_id: GroupId) -> WarikanResult<Vec<Settlement>> {
        self.storage.settlements.get_by_group(group_id)
    }

    /// Find a settlement of a group by id
    pub fn find(&self, group_id: GroupId, identifier: &str) -> WarikanResult<Settlement> {
        self.storage
            .settlements
            .find_in_group(group_id, identifier)?
            .ok_or_else(|| WarikanError::settlement_not_found(identifier))
    }

    /// Mark one settlement paid or unpaid
    ///
    /// Only this settlement changes; nothing is recomputed.
    pub fn set_paid(
        &self,
        group_id: GroupId,
        identifier: &str,
        is_paid: bool,
    ) -> WarikanResult<Settlement> {
        let before = self.find(group_id, identifier)?;

        let mut settlement = before.clone();
        settlement.set_paid(is_paid, Utc::now());

        if !self.storage.settlements.update(settlement.clone())? {
            return Err(WarikanError::settlement_not_found(identifier));
        }
        self.storage.settlements.save()?;

        info!(settlement = %settlement.id, is_paid, "settlement status changed");

        self.storage.log_update(
            EntityType::Settlement,
            settlement.id.to_string(),
            Some(self.describe(&settlement)?),
            &before,
            &settlement,
            Some(format!("is_paid: {} -> {}", before.is_paid, settlement.is_paid)),
        )?;

        Ok(settlement)
    }

    pub fn progress(&self, group_id: GroupId) -> WarikanResult<SettlementProgress> {
        let settlements = self.list(group_id)?;
        Ok(SettlementProgress {
            paid: settlements.iter().filter(|s| s.is_paid).count(),
            total: settlements.len(),
        })
    }

    /// Per-member balances in member order
    pub fn balances(&self, group_id: GroupId) -> WarikanResult<Vec<MemberBalance>> {
        let members = self.storage.members.get_by_group(group_id)?;
        let expenses = self.storage.expenses.get_by_group(group_id)?;
        Ok(compute_balances(&expenses, &members))
    }

    /// "Bob → Alice ¥1,000" label for audit entries
    fn describe(&self, settlement: &Settlement) -> WarikanResult<String> {
        let name = |id| -> WarikanResult<String> {
            Ok(self
                .storage
                .members
                .get(id)?
                .map(|m| m.name)
                .unwrap_or_else(|| "Unknown".to_string()))
        };

        Ok(format!(
            "{} → {} {}",
            name(settlement.from_member_id)?,
            name(settlement.to_member_id)?,
            settlement.amount
        ))
    }
}
