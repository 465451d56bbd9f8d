//! Batch assembly: entity drafts plus association wiring.
//!
//! # Responsibility
//! - Record categories/products to create, in declared save order.
//! - Record many-to-many links and many-to-one ownership before the batch
//!   reaches storage.
//!
//! # Invariants
//! - Handles are only meaningful for the batch that issued them.
//! - Wiring the same pair twice is absorbed silently (set semantics).
//! - Building a batch never fails; conflicts surface when the batch runs.

use std::collections::BTreeSet;

use crate::model::category::NewCategory;
use crate::model::product::NewProduct;

/// Position of a category draft inside one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CategoryHandle(pub(crate) usize);

/// Position of a product draft inside one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ProductHandle(pub(crate) usize);

/// One persist step, in declared order.
#[derive(Debug, Clone, Copy)]
pub(crate) enum BatchStep {
    Category(usize),
    Product(usize),
}

/// A unit-of-work plan: entity drafts plus association wiring, assembled
/// fully in memory before any persistence call is issued.
#[derive(Debug, Default)]
pub struct CatalogBatch {
    categories: Vec<NewCategory>,
    products: Vec<NewProduct>,
    steps: Vec<BatchStep>,
    links: BTreeSet<(usize, usize)>,
    owners: BTreeSet<(usize, usize)>,
}

impl CatalogBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares one category to save. Save order follows declaration order.
    pub fn add_category(&mut self, draft: NewCategory) -> CategoryHandle {
        let index = self.categories.len();
        self.categories.push(draft);
        self.steps.push(BatchStep::Category(index));
        CategoryHandle(index)
    }

    /// Declares one product to save. Save order follows declaration order.
    pub fn add_product(&mut self, draft: NewProduct) -> ProductHandle {
        let index = self.products.len();
        self.products.push(draft);
        self.steps.push(BatchStep::Product(index));
        ProductHandle(index)
    }

    /// Wires a many-to-many pair. Repeats collapse to a single link.
    pub fn link(&mut self, product: ProductHandle, category: CategoryHandle) {
        self.links.insert((product.0, category.0));
    }

    /// Wires many-to-one ownership. The identical pair repeats collapse;
    /// a conflicting second owner is kept and rejected when the batch runs.
    pub fn assign_owner(&mut self, product: ProductHandle, category: CategoryHandle) {
        self.owners.insert((product.0, category.0));
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of persist steps in this batch (entities only, not wiring).
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub(crate) fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub(crate) fn product_count(&self) -> usize {
        self.products.len()
    }

    pub(crate) fn steps(&self) -> &[BatchStep] {
        &self.steps
    }

    pub(crate) fn category_draft(&self, index: usize) -> &NewCategory {
        &self.categories[index]
    }

    pub(crate) fn product_draft(&self, index: usize) -> &NewProduct {
        &self.products[index]
    }

    pub(crate) fn links(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.links.iter().copied()
    }

    pub(crate) fn owners(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.owners.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::CatalogBatch;
    use crate::model::category::NewCategory;
    use crate::model::product::NewProduct;

    #[test]
    fn save_order_follows_declaration_order() {
        let mut batch = CatalogBatch::new();
        batch.add_category(NewCategory::new("Cat a"));
        batch.add_product(NewProduct::new("Prod x", 456));
        batch.add_category(NewCategory::new("Cat b"));

        let steps: Vec<_> = batch
            .steps()
            .iter()
            .map(|step| match step {
                super::BatchStep::Category(i) => format!("category:{i}"),
                super::BatchStep::Product(i) => format!("product:{i}"),
            })
            .collect();
        assert_eq!(steps, ["category:0", "product:0", "category:1"]);
    }

    #[test]
    fn repeated_link_collapses_to_one() {
        let mut batch = CatalogBatch::new();
        let cat = batch.add_category(NewCategory::new("Cat a"));
        let prod = batch.add_product(NewProduct::new("Prod x", 456));

        batch.link(prod, cat);
        batch.link(prod, cat);

        assert_eq!(batch.links().count(), 1);
    }

    #[test]
    fn repeated_identical_owner_collapses_to_one() {
        let mut batch = CatalogBatch::new();
        let cat = batch.add_category(NewCategory::new("Cat a"));
        let prod = batch.add_product(NewProduct::new("Prod x", 456));

        batch.assign_owner(prod, cat);
        batch.assign_owner(prod, cat);

        assert_eq!(batch.owners().count(), 1);
    }
}
