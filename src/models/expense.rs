//! Expense model
//!
//! An expense records one member paying for something that a set of members
//! shares.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{ExpenseId, GroupId, MemberId};
use super::money::Money;

/// A recorded payment by one member benefiting a set of members
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    /// Unique identifier
    pub id: ExpenseId,

    /// Owning group
    pub group_id: GroupId,

    /// Member who paid
    pub payer_id: MemberId,

    /// What the money was spent on
    pub title: String,

    /// Amount paid, in minor units
    pub amount: Money,

    /// Members who share the cost (may include the payer)
    pub participant_ids: Vec<MemberId>,

    /// When the expense was recorded
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Create a new expense; duplicate participants are collapsed
    pub fn new(
        group_id: GroupId,
        payer_id: MemberId,
        title: impl Into<String>,
        amount: Money,
        participant_ids: Vec<MemberId>,
    ) -> Self {
        Self {
            id: ExpenseId::new(),
            group_id,
            payer_id,
            title: title.into(),
            amount,
            participant_ids: dedup_participants(participant_ids),
            created_at: Utc::now(),
        }
    }

    /// Replace the participant set, collapsing duplicates
    pub fn set_participants(&mut self, participant_ids: Vec<MemberId>) {
        self.participant_ids = dedup_participants(participant_ids);
    }

    /// Each participant's share, floored; `None` without participants
    pub fn share_per_participant(&self) -> Option<Money> {
        self.amount.split_floor(self.participant_ids.len())
    }

    /// Whether the member paid for or shares this expense
    pub fn involves(&self, member_id: MemberId) -> bool {
        self.payer_id == member_id || self.participant_ids.contains(&member_id)
    }

    /// Drop a member from the participants; returns true if they were present
    pub fn remove_participant(&mut self, member_id: MemberId) -> bool {
        let before = self.participant_ids.len();
        self.participant_ids.retain(|id| *id != member_id);
        self.participant_ids.len() != before
    }

    /// Validate the expense
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if self.title.trim().is_empty() {
            return Err(ExpenseValidationError::EmptyTitle);
        }

        if self.title.len() > 200 {
            return Err(ExpenseValidationError::TitleTooLong(self.title.len()));
        }

        if !self.amount.is_positive() {
            return Err(ExpenseValidationError::NonPositiveAmount(self.amount));
        }

        if self.amount > MAX_EXPENSE_AMOUNT {
            return Err(ExpenseValidationError::TooLarge(self.amount));
        }

        if self.participant_ids.is_empty() {
            return Err(ExpenseValidationError::NoParticipants);
        }

        Ok(())
    }
}

fn dedup_participants(ids: Vec<MemberId>) -> Vec<MemberId> {
    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(&id) {
            unique.push(id);
        }
    }
    unique
}

/// Largest amount a single expense may carry
///
/// Keeps any realistic group total well inside `i64`.
pub const MAX_EXPENSE_AMOUNT: Money = Money::new(1_000_000_000_000);

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.amount)
    }
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    EmptyTitle,
    TitleTooLong(usize),
    NonPositiveAmount(Money),
    TooLarge(Money),
    NoParticipants,
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "Expense title cannot be empty"),
            Self::TitleTooLong(len) => {
                write!(f, "Expense title too long ({} chars, max 200)", len)
            }
            Self::NonPositiveAmount(amount) => {
                write!(f, "Expense amount must be positive, got {}", amount)
            }
            Self::TooLarge(amount) => {
                write!(
                    f,
                    "Expense amount {} exceeds the maximum of {}",
                    amount, MAX_EXPENSE_AMOUNT
                )
            }
            Self::NoParticipants => write!(f, "Expense must have at least one participant"),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}
