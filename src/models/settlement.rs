//! Settlement model
//!
//! A settlement is a directed transfer from a debtor to a creditor. The set
//! of settlements for a group is regenerated whenever its expenses change;
//! only the paid status is carried across regenerations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{GroupId, MemberId, SettlementId};
use super::money::Money;

/// A transfer that moves `amount` from `from_member_id` to `to_member_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Unique identifier
    pub id: SettlementId,

    /// Owning group
    pub group_id: GroupId,

    /// Debtor who pays
    pub from_member_id: MemberId,

    /// Creditor who receives
    pub to_member_id: MemberId,

    /// Transfer amount, always positive
    pub amount: Money,

    /// Whether the transfer has been confirmed as paid
    #[serde(default)]
    pub is_paid: bool,

    /// When the transfer was marked paid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime<Utc>>,
}

impl Settlement {
    /// Create a new unpaid settlement
    pub fn new(group_id: GroupId, from: MemberId, to: MemberId, amount: Money) -> Self {
        Self {
            id: SettlementId::new(),
            group_id,
            from_member_id: from,
            to_member_id: to,
            amount,
            is_paid: false,
            paid_at: None,
        }
    }

    /// The (from, to, amount) triple used to match transfers across recalculations
    pub fn transfer_key(&self) -> (MemberId, MemberId, Money) {
        (self.from_member_id, self.to_member_id, self.amount)
    }

    /// Whether both settlements describe the same transfer
    pub fn same_transfer(&self, other: &Settlement) -> bool {
        self.transfer_key() == other.transfer_key()
    }

    /// Mark paid (stamping `now`) or unpaid (clearing the stamp)
    pub fn set_paid(&mut self, is_paid: bool, now: DateTime<Utc>) {
        self.is_paid = is_paid;
        self.paid_at = if is_paid { Some(now) } else { None };
    }
}

impl fmt::Display for Settlement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}: {}",
            self.from_member_id, self.to_member_id, self.amount
        )
    }
}
