use catalog_core::db::open_db_in_memory;
use catalog_core::{
    run_batch, BatchOutcome, CatalogBatch, CatalogService, CategoryHandle, NewCategory,
    NewProduct, ProductHandle, SqliteCatalogRepository,
};
use rusqlite::Connection;

struct Scenario {
    cat_a: CategoryHandle,
    cat_b: CategoryHandle,
    cat_c: CategoryHandle,
    prod_x: ProductHandle,
    prod_y: ProductHandle,
    prod_z: ProductHandle,
    prod_w: ProductHandle,
    outcome: BatchOutcome,
}

/// Categories {Cat a, Cat b, Cat c}, products {Prod x/456, Prod y/123,
/// Prod z/789, Prod w/258}; x<->b, y<->a, z<->a, w<->c.
fn run_scenario(conn: &mut Connection) -> Scenario {
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

    let outcome = run_batch(conn, &batch).unwrap();
    Scenario {
        cat_a,
        cat_b,
        cat_c,
        prod_x,
        prod_y,
        prod_z,
        prod_w,
        outcome,
    }
}

#[test]
fn category_a_holds_products_y_and_z() {
    let mut conn = open_db_in_memory().unwrap();
    let scenario = run_scenario(&mut conn);

    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();
    let service = CatalogService::new(repo);

    let cat_a_id = scenario.outcome.category_id(scenario.cat_a).unwrap();
    let products = service.category_products(cat_a_id).unwrap();
    let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Prod y", "Prod z"]);

    let prices: Vec<_> = products.iter().map(|p| p.price).collect();
    assert_eq!(prices, [123, 789]);
}

#[test]
fn association_is_visible_from_both_sides() {
    let mut conn = open_db_in_memory().unwrap();
    let scenario = run_scenario(&mut conn);

    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();
    let service = CatalogService::new(repo);

    let cat_b_id = scenario.outcome.category_id(scenario.cat_b).unwrap();
    let prod_x_id = scenario.outcome.product_id(scenario.prod_x).unwrap();

    let from_category: Vec<_> = service
        .category_products(cat_b_id)
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(from_category, [prod_x_id]);

    let from_product: Vec<_> = service
        .product_categories(prod_x_id)
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(from_product, [cat_b_id]);

    // Same relation viewed from either end for every wired pair.
    for (product, category) in [
        (scenario.prod_y, scenario.cat_a),
        (scenario.prod_z, scenario.cat_a),
        (scenario.prod_w, scenario.cat_c),
    ] {
        let product_id = scenario.outcome.product_id(product).unwrap();
        let category_id = scenario.outcome.category_id(category).unwrap();
        assert!(service
            .category_products(category_id)
            .unwrap()
            .iter()
            .any(|p| p.id == product_id));
        assert!(service
            .product_categories(product_id)
            .unwrap()
            .iter()
            .any(|c| c.id == category_id));
    }
}

#[test]
fn wiring_the_same_pair_twice_stores_one_association() {
    let mut conn = open_db_in_memory().unwrap();

    let mut batch = CatalogBatch::new();
    let cat = batch.add_category(NewCategory::new("Cat a"));
    let prod = batch.add_product(NewProduct::new("Prod x", 456));
    batch.link(prod, cat);
    batch.link(prod, cat);

    let outcome = run_batch(&mut conn, &batch).unwrap();

    let join_rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM product_categories;", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(join_rows, 1);

    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();
    let service = CatalogService::new(repo);
    let categories = service
        .product_categories(outcome.product_id(prod).unwrap())
        .unwrap();
    assert_eq!(categories.len(), 1);
}

#[test]
fn linked_summaries_cover_every_category_and_serialize_stably() {
    let mut conn = open_db_in_memory().unwrap();
    run_scenario(&mut conn);

    let repo = SqliteCatalogRepository::try_new(&conn).unwrap();
    let service = CatalogService::new(repo);

    let summaries = service.linked_summaries().unwrap();
    let names: Vec<_> = summaries
        .iter()
        .map(|s| s.category.name.as_str())
        .collect();
    assert_eq!(names, ["Cat a", "Cat b", "Cat c"]);

    // Shape consumed by the demo binaries.
    let rendered = serde_json::to_value(&summaries[0]).unwrap();
    assert_eq!(rendered["category"]["name"], "Cat a");
    assert_eq!(rendered["products"][0]["name"], "Prod y");
    assert_eq!(rendered["products"][0]["price"], 123);
}
