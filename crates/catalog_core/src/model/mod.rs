//! Domain model for the product catalog.
//!
//! # Responsibility
//! - Define the canonical entity records persisted by the repository layer.
//! - Validate drafts before they reach a persistence call.
//!
//! # Invariants
//! - A draft (`NewCategory`, `NewProduct`) carries no identifier; identifiers
//!   are assigned by storage on first insert and never change afterwards.
//! - Entities do not hold association collections; relationships are stored
//!   once and viewed through repository lookups.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod category;
pub mod product;

/// Validation failure for an entity draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityValidationError {
    /// Name is empty or whitespace-only.
    BlankName { entity: &'static str },
    /// Price must be zero or positive.
    NegativePrice(i64),
}

impl Display for EntityValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName { entity } => write!(f, "{entity} name must not be blank"),
            Self::NegativePrice(price) => write!(f, "product price must not be negative, got {price}"),
        }
    }
}

impl Error for EntityValidationError {}
