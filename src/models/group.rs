//! Group model
//!
//! A group is a named set of members who share expenses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::GroupId;

/// A named collection of members sharing expenses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    /// Unique identifier
    pub id: GroupId,

    /// Group name (e.g., "Okinawa trip")
    pub name: String,

    /// When the group was created
    pub created_at: DateTime<Utc>,

    /// When the group was last modified
    pub updated_at: DateTime<Utc>,
}

impl Group {
    /// Create a new group
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: GroupId::new(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rename the group
    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.updated_at = Utc::now();
    }

    /// Case-insensitive name match
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }

    /// Validate the group
    pub fn validate(&self) -> Result<(), GroupValidationError> {
        if self.name.trim().is_empty() {
            return Err(GroupValidationError::EmptyName);
        }

        if self.name.len() > 100 {
            return Err(GroupValidationError::NameTooLong(self.name.len()));
        }

        Ok(())
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for groups
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for GroupValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Group name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Group name too long ({} chars, max 100)", len)
            }
        }
    }
}

impl std::error::Error for GroupValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_group() {
        let group = Group::new("Trip");
        assert_eq!(group.name, "Trip");
        assert_eq!(group.created_at, group.updated_at);
        assert!(group.validate().is_ok());
    }

    #[test]
    fn test_rename_bumps_updated_at() {
        let mut group = Group::new("Trip");
        let created = group.created_at;
        group.rename("Camping");
        assert_eq!(group.name, "Camping");
        assert!(group.updated_at >= created);
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            Group::new("   ").validate(),
            Err(GroupValidationError::EmptyName)
        );
        assert_eq!(
            Group::new("x".repeat(101)).validate(),
            Err(GroupValidationError::NameTooLong(101))
        );
    }

    #[test]
    fn test_matches_name() {
        let group = Group::new("Ski Trip");
        assert!(group.matches_name("ski trip"));
        assert!(!group.matches_name("ski"));
    }
}
