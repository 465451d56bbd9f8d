//! Catalog read-side service.
//!
//! # Responsibility
//! - Expose either-direction association views over committed state.
//! - Assemble per-category summaries for demo output.
//!
//! # Invariants
//! - Views are deterministic: categories and products sort by name, then id.

use serde::Serialize;

use crate::model::category::{Category, CategoryId};
use crate::model::product::{Product, ProductId};
use crate::repo::catalog_repo::{CatalogRepository, RepoResult};

/// One category together with its associated products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub category: Category,
    pub products: Vec<Product>,
}

/// Service facade over a catalog repository implementation.
pub struct CatalogService<R: CatalogRepository> {
    repo: R,
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Many-to-many view: products linked to the category.
    pub fn category_products(&self, id: CategoryId) -> RepoResult<Vec<Product>> {
        self.repo.products_in_category(id)
    }

    /// Many-to-many view: categories linked to the product.
    pub fn product_categories(&self, id: ProductId) -> RepoResult<Vec<Category>> {
        self.repo.categories_of_product(id)
    }

    /// Many-to-one view: the owning category of the product, if any.
    pub fn product_owner(&self, id: ProductId) -> RepoResult<Option<Category>> {
        self.repo.owner_of_product(id)
    }

    /// Many-to-one view: products owned by the category.
    pub fn owned_products(&self, id: CategoryId) -> RepoResult<Vec<Product>> {
        self.repo.products_owned_by(id)
    }

    /// Every category with its linked products (many-to-many view).
    pub fn linked_summaries(&self) -> RepoResult<Vec<CategorySummary>> {
        let mut summaries = Vec::new();
        for category in self.repo.list_categories()? {
            let products = self.repo.products_in_category(category.id)?;
            summaries.push(CategorySummary { category, products });
        }
        Ok(summaries)
    }

    /// Every category with its owned products (many-to-one view).
    pub fn ownership_summaries(&self) -> RepoResult<Vec<CategorySummary>> {
        let mut summaries = Vec::new();
        for category in self.repo.list_categories()? {
            let products = self.repo.products_owned_by(category.id)?;
            summaries.push(CategorySummary { category, products });
        }
        Ok(summaries)
    }
}
