//! Settlement reconciliation
//!
//! Recomputes a group's transfers and merges them with the previously
//! stored set so that confirmed payments survive a recalculation.

use crate::models::{Expense, GroupId, Member, Settlement};

use super::solver::compute_settlements;

/// Outcome of merging a fresh transfer list with the stored one
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    /// The new settlement set, in solver order
    pub settlements: Vec<Settlement>,
    /// How many new entries took over a previous entry's status
    pub carried_over: usize,
    /// Previous entries that matched nothing and were dropped
    pub discarded: Vec<Settlement>,
}

impl Reconciliation {
    /// Dropped entries that had been marked paid
    pub fn discarded_paid(&self) -> impl Iterator<Item = &Settlement> {
        self.discarded.iter().filter(|s| s.is_paid)
    }
}

/// Recompute a group's settlements, carrying paid status forward
pub fn reconcile_settlements(
    group_id: GroupId,
    expenses: &[Expense],
    members: &[Member],
    previous: &[Settlement],
) -> Vec<Settlement> {
    reconcile_with_report(group_id, expenses, members, previous).settlements
}

/// Like [`reconcile_settlements`], also reporting what was kept and dropped
pub fn reconcile_with_report(
    group_id: GroupId,
    expenses: &[Expense],
    members: &[Member],
    previous: &[Settlement],
) -> Reconciliation {
    let fresh = compute_settlements(expenses, members, group_id);
    merge_with_previous(fresh, previous)
}

/// Merge freshly computed settlements with the previous set
///
/// A fresh entry matches a previous entry only when (from, to, amount) are
/// identical. The first unclaimed match in `previous` order wins, and each
/// previous entry is claimed at most once. A matched entry keeps the
/// previous id, `is_paid` and `paid_at`; an unmatched entry stays unpaid
/// with its new id. Unclaimed previous entries are discarded along with
/// their paid history.
///
/// Keeping the previous id is intentional: a settlement id quoted to
/// `settle pay` stays valid across recalculations that leave it unchanged.
pub fn merge_with_previous(fresh: Vec<Settlement>, previous: &[Settlement]) -> Reconciliation {
    let mut claimed = vec![false; previous.len()];
    let mut carried_over = 0;

    let settlements = fresh
        .into_iter()
        .map(|mut settlement| {
            let found = previous
                .iter()
                .enumerate()
                .find(|(idx, old)| !claimed[*idx] && old.same_transfer(&settlement));

            if let Some((idx, old)) = found {
                claimed[idx] = true;
                carried_over += 1;
                settlement.id = old.id;
                settlement.is_paid = old.is_paid;
                settlement.paid_at = old.paid_at;
            }

            settlement
        })
        .collect();

    let discarded = previous
        .iter()
        .zip(&claimed)
        .filter(|(_, claimed)| !**claimed)
        .map(|(old, _)| old.clone())
        .collect();

    Reconciliation {
        settlements,
        carried_over,
        discarded,
    }
}
