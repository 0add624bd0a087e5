//! Member balance summary
//!
//! Derived from a group's expenses on demand and never persisted.

use serde::{Deserialize, Serialize};

use super::ids::MemberId;
use super::money::Money;

/// A member's net position within a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberBalance {
    pub member_id: MemberId,
    pub member_name: String,
    /// Sum of expenses this member paid
    pub total_paid: Money,
    /// Sum of floored shares across expenses this member participates in
    pub total_owed: Money,
    /// `total_paid - total_owed`; positive means the member is owed money
    pub balance: Money,
}

impl MemberBalance {
    pub fn new(
        member_id: MemberId,
        member_name: impl Into<String>,
        total_paid: Money,
        total_owed: Money,
    ) -> Self {
        Self {
            member_id,
            member_name: member_name.into(),
            total_paid,
            total_owed,
            balance: total_paid - total_owed,
        }
    }

    pub fn is_creditor(&self) -> bool {
        self.balance.is_positive()
    }

    pub fn is_debtor(&self) -> bool {
        self.balance.is_negative()
    }

    pub fn is_settled(&self) -> bool {
        self.balance.is_zero()
    }
}
