//! Member model
//!
//! A member belongs to exactly one group and records how they prefer to be
//! paid back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{GroupId, MemberId};

/// How a member prefers to receive settlement payments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentMethod {
    /// Hand over cash
    #[default]
    #[serde(rename = "cash")]
    Cash,
    /// Mobile wallet handle (PayPay)
    #[serde(rename = "paypay")]
    MobileWallet,
    /// Bank transfer to the member's account
    #[serde(rename = "bank")]
    BankTransfer,
}

impl PaymentMethod {
    /// Parse a payment method from user input
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Some(Self::Cash),
            "paypay" | "wallet" | "mobile" | "mobile-wallet" => Some(Self::MobileWallet),
            "bank" | "transfer" | "bank-transfer" => Some(Self::BankTransfer),
            _ => None,
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::MobileWallet => "PayPay",
            Self::BankTransfer => "Bank transfer",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A participant within a group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    /// Unique identifier
    pub id: MemberId,

    /// Owning group
    pub group_id: GroupId,

    /// Display name
    pub name: String,

    /// Preferred way of receiving money
    #[serde(default)]
    pub payment_method: PaymentMethod,

    /// Wallet handle or bank account details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_info: Option<String>,

    /// Position within the group; balances are reported in this order
    #[serde(default)]
    pub sort_order: i32,

    /// When the member was added
    pub created_at: DateTime<Utc>,
}

impl Member {
    /// Create a new member who is paid back in cash
    pub fn new(group_id: GroupId, name: impl Into<String>) -> Self {
        Self {
            id: MemberId::new(),
            group_id,
            name: name.into(),
            payment_method: PaymentMethod::Cash,
            payment_info: None,
            sort_order: 0,
            created_at: Utc::now(),
        }
    }

    /// Create a member at a given position within the group
    pub fn with_sort_order(group_id: GroupId, name: impl Into<String>, sort_order: i32) -> Self {
        let mut member = Self::new(group_id, name);
        member.sort_order = sort_order;
        member
    }

    /// Set the preferred payment method; blank info is stored as `None`
    pub fn set_payment(&mut self, method: PaymentMethod, info: Option<String>) {
        self.payment_method = method;
        self.payment_info = info
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty());
    }

    /// Where to send money, when that is meaningful for the payment method
    ///
    /// Cash has no destination, and a wallet or bank member without info
    /// has nothing to show.
    pub fn payment_destination(&self) -> Option<&str> {
        match self.payment_method {
            PaymentMethod::Cash => None,
            PaymentMethod::MobileWallet | PaymentMethod::BankTransfer => {
                self.payment_info.as_deref().filter(|i| !i.is_empty())
            }
        }
    }

    /// Case-insensitive name match
    pub fn matches_name(&self, name: &str) -> bool {
        Self::normalize_name(&self.name) == Self::normalize_name(name)
    }

    /// Normalize a member name for matching
    pub fn normalize_name(name: &str) -> String {
        name.trim().to_lowercase()
    }

    /// Validate the member
    pub fn validate(&self) -> Result<(), MemberValidationError> {
        if self.name.trim().is_empty() {
            return Err(MemberValidationError::EmptyName);
        }

        if self.name.len() > 50 {
            return Err(MemberValidationError::NameTooLong(self.name.len()));
        }

        Ok(())
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for members
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for MemberValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Member name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Member name too long ({} chars, max 50)", len)
            }
        }
    }
}

impl std::error::Error for MemberValidationError {}
