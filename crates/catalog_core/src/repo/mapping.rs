//! Explicit entity-to-table mapping descriptors.
//!
//! # Responsibility
//! - Declare, at compile time, which table and columns each entity maps to
//!   and which join table / foreign key carries each association.
//! - Verify a connection's schema satisfies the declared mapping before a
//!   repository is handed out.
//!
//! # Invariants
//! - Descriptors are the single source of table/column names for
//!   association SQL.

use rusqlite::Connection;

use crate::repo::catalog_repo::{RepoError, RepoResult};

/// One entity field mapped to one column.
#[derive(Debug, Clone, Copy)]
pub struct ColumnMapping {
    pub field: &'static str,
    pub column: &'static str,
    pub sql_type: &'static str,
}

/// One entity mapped to one table with a surrogate integer key.
#[derive(Debug, Clone, Copy)]
pub struct TableMapping {
    pub table: &'static str,
    pub key_column: &'static str,
    pub columns: &'static [ColumnMapping],
}

/// A many-to-many association stored once as join rows.
#[derive(Debug, Clone, Copy)]
pub struct JoinTableMapping {
    pub table: &'static str,
    pub left_key: &'static str,
    pub right_key: &'static str,
}

/// A many-to-one association stored once as a foreign-key column.
#[derive(Debug, Clone, Copy)]
pub struct ForeignKeyMapping {
    pub table: &'static str,
    pub column: &'static str,
    pub references: &'static str,
}

pub const CATEGORIES: TableMapping = TableMapping {
    table: "categories",
    key_column: "id",
    columns: &[ColumnMapping {
        field: "name",
        column: "name",
        sql_type: "TEXT",
    }],
};

pub const PRODUCTS: TableMapping = TableMapping {
    table: "products",
    key_column: "id",
    columns: &[
        ColumnMapping {
            field: "name",
            column: "name",
            sql_type: "TEXT",
        },
        ColumnMapping {
            field: "price",
            column: "price",
            sql_type: "INTEGER",
        },
    ],
};

/// Product <-> category many-to-many association.
pub const PRODUCT_CATEGORIES: JoinTableMapping = JoinTableMapping {
    table: "product_categories",
    left_key: "product_id",
    right_key: "category_id",
};

/// Product -> owning category many-to-one association.
pub const PRODUCT_OWNER: ForeignKeyMapping = ForeignKeyMapping {
    table: "products",
    column: "category_id",
    references: "categories",
};

/// Checks that the connection's schema satisfies every mapping descriptor.
pub fn verify_mappings(conn: &Connection) -> RepoResult<()> {
    for mapping in [CATEGORIES, PRODUCTS] {
        if !table_exists(conn, mapping.table)? {
            return Err(RepoError::MissingRequiredTable(mapping.table));
        }
        if !table_has_column(conn, mapping.table, mapping.key_column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: mapping.table,
                column: mapping.key_column,
            });
        }
        for column in mapping.columns {
            if !table_has_column(conn, mapping.table, column.column)? {
                return Err(RepoError::MissingRequiredColumn {
                    table: mapping.table,
                    column: column.column,
                });
            }
        }
    }

    if !table_exists(conn, PRODUCT_CATEGORIES.table)? {
        return Err(RepoError::MissingRequiredTable(PRODUCT_CATEGORIES.table));
    }
    for column in [PRODUCT_CATEGORIES.left_key, PRODUCT_CATEGORIES.right_key] {
        if !table_has_column(conn, PRODUCT_CATEGORIES.table, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: PRODUCT_CATEGORIES.table,
                column,
            });
        }
    }

    if !table_has_column(conn, PRODUCT_OWNER.table, PRODUCT_OWNER.column)? {
        return Err(RepoError::MissingRequiredColumn {
            table: PRODUCT_OWNER.table,
            column: PRODUCT_OWNER.column,
        });
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
