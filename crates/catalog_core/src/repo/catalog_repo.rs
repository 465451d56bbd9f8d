//! Catalog repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist category/product rows and their association records.
//! - Derive either-direction association views by lookup queries keyed on
//!   entity identifiers.
//!
//! # Invariants
//! - Drafts are validated before any SQL mutation.
//! - Each many-to-many pair is stored at most once (`INSERT OR IGNORE` on a
//!   composite primary key).
//! - A product's owning category is set once; reassignment is rejected.
//! - Read paths reject invalid persisted state instead of masking it.

use std::error::Error;
use std::fmt::{Display, Formatter};

use rusqlite::{params, Connection, Row};

use crate::db::DbError;
use crate::model::category::{Category, CategoryId, NewCategory};
use crate::model::product::{NewProduct, Product, ProductId};
use crate::model::EntityValidationError;
use crate::repo::mapping::{verify_mappings, PRODUCT_CATEGORIES, PRODUCT_OWNER};

const CATEGORY_SELECT_SQL: &str = "SELECT id, name FROM categories";
const PRODUCT_SELECT_SQL: &str = "SELECT id, name, price FROM products";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for catalog persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(EntityValidationError),
    Db(DbError),
    CategoryNotFound(CategoryId),
    ProductNotFound(ProductId),
    /// The product already has an owning category; ownership is fixed at
    /// first assignment.
    ProductAlreadyOwned(ProductId),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::CategoryNotFound(id) => write!(f, "category not found: {id}"),
            Self::ProductNotFound(id) => write!(f, "product not found: {id}"),
            Self::ProductAlreadyOwned(id) => {
                write!(f, "product {id} already belongs to a category")
            }
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing from the schema")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing from the schema")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted catalog data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EntityValidationError> for RepoError {
    fn from(value: EntityValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for catalog persistence and association lookups.
pub trait CatalogRepository {
    /// Inserts one category draft and returns its assigned id.
    fn insert_category(&self, draft: &NewCategory) -> RepoResult<CategoryId>;
    /// Inserts one product draft and returns its assigned id.
    fn insert_product(&self, draft: &NewProduct) -> RepoResult<ProductId>;
    /// Records one product<->category pair. Repeats are silently absorbed.
    fn link_product_to_category(
        &self,
        product: ProductId,
        category: CategoryId,
    ) -> RepoResult<()>;
    /// Sets the owning category of a product. Fails once ownership exists,
    /// unless the existing owner is the same category.
    fn set_product_owner(&self, product: ProductId, category: CategoryId) -> RepoResult<()>;
    /// Gets one category by id.
    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>>;
    /// Gets one product by id.
    fn get_product(&self, id: ProductId) -> RepoResult<Option<Product>>;
    /// Many-to-many view: products linked to the category.
    fn products_in_category(&self, id: CategoryId) -> RepoResult<Vec<Product>>;
    /// Many-to-many view: categories linked to the product.
    fn categories_of_product(&self, id: ProductId) -> RepoResult<Vec<Category>>;
    /// Many-to-one view: the owning category of the product, if any.
    fn owner_of_product(&self, id: ProductId) -> RepoResult<Option<Category>>;
    /// Many-to-one view: products owned by the category.
    fn products_owned_by(&self, id: CategoryId) -> RepoResult<Vec<Product>>;
    /// All categories, ordered by name then id.
    fn list_categories(&self) -> RepoResult<Vec<Category>>;
    /// All products, ordered by name then id.
    fn list_products(&self) -> RepoResult<Vec<Product>>;
}

/// SQLite-backed catalog repository.
pub struct SqliteCatalogRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCatalogRepository<'conn> {
    /// Constructs a repository after verifying the connection's schema
    /// satisfies the declared entity mappings.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        verify_mappings(conn)?;
        Ok(Self { conn })
    }
}

impl CatalogRepository for SqliteCatalogRepository<'_> {
    fn insert_category(&self, draft: &NewCategory) -> RepoResult<CategoryId> {
        draft.validate()?;

        self.conn.execute(
            "INSERT INTO categories (name) VALUES (?1);",
            [draft.name.as_str()],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn insert_product(&self, draft: &NewProduct) -> RepoResult<ProductId> {
        draft.validate()?;

        self.conn.execute(
            "INSERT INTO products (name, price) VALUES (?1, ?2);",
            params![draft.name.as_str(), draft.price],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn link_product_to_category(
        &self,
        product: ProductId,
        category: CategoryId,
    ) -> RepoResult<()> {
        if self.get_product(product)?.is_none() {
            return Err(RepoError::ProductNotFound(product));
        }
        if self.get_category(category)?.is_none() {
            return Err(RepoError::CategoryNotFound(category));
        }

        self.conn.execute(
            &format!(
                "INSERT OR IGNORE INTO {} ({}, {}) VALUES (?1, ?2);",
                PRODUCT_CATEGORIES.table, PRODUCT_CATEGORIES.left_key, PRODUCT_CATEGORIES.right_key
            ),
            params![product, category],
        )?;

        Ok(())
    }

    fn set_product_owner(&self, product: ProductId, category: CategoryId) -> RepoResult<()> {
        if self.get_category(category)?.is_none() {
            return Err(RepoError::CategoryNotFound(category));
        }

        let changed = self.conn.execute(
            &format!(
                "UPDATE {table}
                 SET {owner} = ?2
                 WHERE id = ?1
                   AND ({owner} IS NULL OR {owner} = ?2);",
                table = PRODUCT_OWNER.table,
                owner = PRODUCT_OWNER.column,
            ),
            params![product, category],
        )?;

        if changed == 0 {
            if self.get_product(product)?.is_none() {
                return Err(RepoError::ProductNotFound(product));
            }
            return Err(RepoError::ProductAlreadyOwned(product));
        }

        Ok(())
    }

    fn get_category(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_category_row(row)?));
        }
        Ok(None)
    }

    fn get_product(&self, id: ProductId) -> RepoResult<Option<Product>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_product_row(row)?));
        }
        Ok(None)
    }

    fn products_in_category(&self, id: CategoryId) -> RepoResult<Vec<Product>> {
        let sql = format!(
            "SELECT p.id, p.name, p.price
             FROM products p
             INNER JOIN {join} j ON j.{left} = p.id
             WHERE j.{right} = ?1
             ORDER BY p.name ASC, p.id ASC;",
            join = PRODUCT_CATEGORIES.table,
            left = PRODUCT_CATEGORIES.left_key,
            right = PRODUCT_CATEGORIES.right_key,
        );
        collect_products(self.conn, &sql, Some(id))
    }

    fn categories_of_product(&self, id: ProductId) -> RepoResult<Vec<Category>> {
        let sql = format!(
            "SELECT c.id, c.name
             FROM categories c
             INNER JOIN {join} j ON j.{right} = c.id
             WHERE j.{left} = ?1
             ORDER BY c.name ASC, c.id ASC;",
            join = PRODUCT_CATEGORIES.table,
            left = PRODUCT_CATEGORIES.left_key,
            right = PRODUCT_CATEGORIES.right_key,
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([id])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }
        Ok(categories)
    }

    fn owner_of_product(&self, id: ProductId) -> RepoResult<Option<Category>> {
        let sql = format!(
            "SELECT c.id, c.name
             FROM categories c
             INNER JOIN {table} p ON p.{owner} = c.id
             WHERE p.id = ?1;",
            table = PRODUCT_OWNER.table,
            owner = PRODUCT_OWNER.column,
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_category_row(row)?));
        }
        Ok(None)
    }

    fn products_owned_by(&self, id: CategoryId) -> RepoResult<Vec<Product>> {
        let sql = format!(
            "{PRODUCT_SELECT_SQL} WHERE {owner} = ?1 ORDER BY name ASC, id ASC;",
            owner = PRODUCT_OWNER.column,
        );
        collect_products(self.conn, &sql, Some(id))
    }

    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CATEGORY_SELECT_SQL} ORDER BY name ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }
        Ok(categories)
    }

    fn list_products(&self) -> RepoResult<Vec<Product>> {
        collect_products(
            self.conn,
            &format!("{PRODUCT_SELECT_SQL} ORDER BY name ASC, id ASC;"),
            None,
        )
    }
}

fn collect_products(conn: &Connection, sql: &str, bind: Option<i64>) -> RepoResult<Vec<Product>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = match bind {
        Some(value) => stmt.query([value])?,
        None => stmt.query([])?,
    };
    let mut products = Vec::new();
    while let Some(row) = rows.next()? {
        products.push(parse_product_row(row)?);
    }
    Ok(products)
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    let category = Category {
        id: row.get(0)?,
        name: row.get(1)?,
    };
    if category.name.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "blank name in categories row {}",
            category.id
        )));
    }
    Ok(category)
}

fn parse_product_row(row: &Row<'_>) -> RepoResult<Product> {
    let product = Product {
        id: row.get(0)?,
        name: row.get(1)?,
        price: row.get(2)?,
    };
    if product.name.trim().is_empty() {
        return Err(RepoError::InvalidData(format!(
            "blank name in products row {}",
            product.id
        )));
    }
    if product.price < 0 {
        return Err(RepoError::InvalidData(format!(
            "negative price {} in products row {}",
            product.price, product.id
        )));
    }
    Ok(product)
}
