//! Product entity.
//!
//! # Invariants
//! - `id` is a storage-assigned rowid; it exists only on persisted records.
//! - `price` is an integer unit amount and never negative.

use serde::{Deserialize, Serialize};

use crate::model::EntityValidationError;

/// Surrogate identifier assigned by storage on first insert.
pub type ProductId = i64;

/// Product draft prior to first persistence. Has no identifier yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    /// Integer unit price.
    pub price: i64,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: i64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }

    /// Checks draft invariants before a persistence call.
    pub fn validate(&self) -> Result<(), EntityValidationError> {
        if self.name.trim().is_empty() {
            return Err(EntityValidationError::BlankName { entity: "product" });
        }
        if self.price < 0 {
            return Err(EntityValidationError::NegativePrice(self.price));
        }
        Ok(())
    }
}

/// Persisted product row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: i64,
}

#[cfg(test)]
mod tests {
    use super::NewProduct;
    use crate::model::category::NewCategory;
    use crate::model::EntityValidationError;

    #[test]
    fn blank_names_are_rejected() {
        let err = NewCategory::new("   ").validate().unwrap_err();
        assert!(matches!(err, EntityValidationError::BlankName { entity: "category" }));

        let err = NewProduct::new("", 10).validate().unwrap_err();
        assert!(matches!(err, EntityValidationError::BlankName { entity: "product" }));
    }

    #[test]
    fn negative_price_is_rejected() {
        let err = NewProduct::new("Prod x", -1).validate().unwrap_err();
        assert!(matches!(err, EntityValidationError::NegativePrice(-1)));
    }

    #[test]
    fn zero_price_is_allowed() {
        NewProduct::new("freebie", 0).validate().unwrap();
    }
}
