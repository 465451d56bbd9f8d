use catalog_core::db::open_db_in_memory;
use catalog_core::{
    run_batch, CatalogBatch, CatalogService, NewCategory, NewProduct, SqliteCatalogRepository,
};
use rusqlite::Connection;

fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn each_product_is_reachable_from_exactly_one_category() {
    let mut conn = open_db_in_memory().unwrap();

    // Products {Prod x/456, Prod y/123, Prod z/789}; Cat a owns {x, y},
    // Cat b owns {z}.
    let mut batch = CatalogBatch::new();
    let prod_x = batch.add_product(NewProduct::new("Prod x", 456));
    let prod_y = batch.add_product(NewProduct::new("Prod y", 123));
    let prod_z = batch.add_product(NewProduct::new("Prod z", 789));
    let cat_a = batch.add_category(NewCategory::new("Cat a"));
    batch.assign_owner(prod_x, cat_a);
    batch.assign_owner(prod_y, cat_a);
    let cat_b = batch.add_category(NewCategory::new("Cat b"));
    batch.assign_owner(prod_z, cat_b);

    let outcome = run_batch(&mut conn, &batch).unwrap();

    // Saving categories with attached products must not duplicate products.
    assert_eq!(count_rows(&conn, "products"), 3);

    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();
    let service = CatalogService::new(repo);

    let cat_a_id = outcome.category_id(cat_a).unwrap();
    let cat_b_id = outcome.category_id(cat_b).unwrap();

    let owner_of_z = service
        .product_owner(outcome.product_id(prod_z).unwrap())
        .unwrap()
        .expect("Prod z must have an owner");
    assert_eq!(owner_of_z.id, cat_b_id);
    assert_eq!(owner_of_z.name, "Cat b");

    let owned_by_a: Vec<_> = service
        .owned_products(cat_a_id)
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(owned_by_a, ["Prod x", "Prod y"]);

    for product in [prod_x, prod_y, prod_z] {
        let owner = service
            .product_owner(outcome.product_id(product).unwrap())
            .unwrap();
        assert!(owner.is_some(), "every product must have exactly one owner");
    }
}

#[test]
fn assigning_the_same_owner_twice_is_idempotent() {
    let mut conn = open_db_in_memory().unwrap();

    let mut batch = CatalogBatch::new();
    let prod = batch.add_product(NewProduct::new("Prod x", 456));
    let cat = batch.add_category(NewCategory::new("Cat a"));
    batch.assign_owner(prod, cat);
    batch.assign_owner(prod, cat);

    let outcome = run_batch(&mut conn, &batch).unwrap();

    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();
    let service = CatalogService::new(repo);
    let owner = service
        .product_owner(outcome.product_id(prod).unwrap())
        .unwrap()
        .expect("owner must be set");
    assert_eq!(owner.id, outcome.category_id(cat).unwrap());
}

#[test]
fn conflicting_owner_assignment_fails_the_whole_batch() {
    let mut conn = open_db_in_memory().unwrap();

    let mut batch = CatalogBatch::new();
    let prod = batch.add_product(NewProduct::new("Prod x", 456));
    let cat_a = batch.add_category(NewCategory::new("Cat a"));
    let cat_b = batch.add_category(NewCategory::new("Cat b"));
    batch.assign_owner(prod, cat_a);
    batch.assign_owner(prod, cat_b);

    let err = run_batch(&mut conn, &batch).unwrap_err();
    assert!(err.to_string().contains("already belongs"));

    // All-or-nothing: the conflicting batch leaves nothing behind.
    assert_eq!(count_rows(&conn, "products"), 0);
    assert_eq!(count_rows(&conn, "categories"), 0);
}

#[test]
fn unowned_products_have_no_owner_view() {
    let mut conn = open_db_in_memory().unwrap();

    let mut batch = CatalogBatch::new();
    let prod = batch.add_product(NewProduct::new("Prod w", 258));
    let outcome = run_batch(&mut conn, &batch).unwrap();

    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();
    let service = CatalogService::new(repo);
    let owner = service
        .product_owner(outcome.product_id(prod).unwrap())
        .unwrap();
    assert!(owner.is_none());
}
