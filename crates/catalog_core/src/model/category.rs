//! Category entity.
//!
//! # Invariants
//! - `id` is a storage-assigned rowid; it exists only on persisted records.
//! - `name` is a short, non-blank text label. Names are not unique.

use serde::{Deserialize, Serialize};

use crate::model::EntityValidationError;

/// Surrogate identifier assigned by storage on first insert.
pub type CategoryId = i64;

/// Category draft prior to first persistence. Has no identifier yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
}

impl NewCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Checks draft invariants before a persistence call.
    pub fn validate(&self) -> Result<(), EntityValidationError> {
        if self.name.trim().is_empty() {
            return Err(EntityValidationError::BlankName { entity: "category" });
        }
        Ok(())
    }
}

/// Persisted category row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}
