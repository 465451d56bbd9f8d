//! Many-to-many association demo entry point.
//!
//! Builds a handful of categories and products, wires product<->category
//! links, and persists the whole batch in one transaction. On failure the
//! batch rolls back and a single `ERROR:` line is printed; the process still
//! exits normally.

use std::path::PathBuf;

use catalog_core::db::open_db;
use catalog_core::{
    default_log_level, init_logging, run_batch, CatalogBatch, CatalogService, NewCategory,
    NewProduct, SqliteCatalogRepository,
};

const DB_FILE_NAME: &str = "catalog_many_to_many.sqlite3";

fn main() {
    println!("Rust + rusqlite + SQLite : Many to Many Association");

    if let Err(err) = init_logging(default_log_level(), &log_dir().to_string_lossy()) {
        eprintln!("logging disabled: {err}");
    }

    if let Err(message) = run() {
        println!("ERROR: {message}");
    }
}

fn run() -> Result<(), String> {
    let mut conn = open_db(DB_FILE_NAME).map_err(|err| err.to_string())?;

    let mut batch = CatalogBatch::new();

    let cat_a = batch.add_category(NewCategory::new("Cat a"));
    let cat_b = batch.add_category(NewCategory::new("Cat b"));

    let prod_x = batch.add_product(NewProduct::new("Prod x", 456));
    batch.link(prod_x, cat_b);

    let prod_y = batch.add_product(NewProduct::new("Prod y", 123));
    batch.link(prod_y, cat_a);

    let prod_z = batch.add_product(NewProduct::new("Prod z", 789));
    batch.link(prod_z, cat_a);

    let prod_w = batch.add_product(NewProduct::new("Prod w", 258));
    let cat_c = batch.add_category(NewCategory::new("Cat c"));
    batch.link(prod_w, cat_c);

    run_batch(&mut conn, &batch).map_err(|err| err.to_string())?;

    let repo = SqliteCatalogRepository::try_new(&conn).map_err(|err| err.to_string())?;
    let service = CatalogService::new(repo);
    let summaries = service.linked_summaries().map_err(|err| err.to_string())?;
    let rendered = serde_json::to_string_pretty(&summaries).map_err(|err| err.to_string())?;
    println!("{rendered}");

    Ok(())
}

fn log_dir() -> PathBuf {
    std::env::temp_dir().join("catalog-logs")
}
