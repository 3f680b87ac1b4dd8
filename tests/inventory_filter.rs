use inventory_api::{
    entity::Products,
    error::AppError,
    filter::{InventoryFilter, ProductOrdering, ProductSearch},
    routes::params::{InventoryQuery, ProductSortBy, SortOrder},
};
use sea_orm::{DbBackend, EntityTrait, QueryTrait};

fn query(
    category: Option<&str>,
    min_price: Option<&str>,
    max_price: Option<&str>,
    low_stock: Option<&str>,
) -> InventoryQuery {
    InventoryQuery {
        category: category.map(str::to_string),
        min_price: min_price.map(str::to_string),
        max_price: max_price.map(str::to_string),
        low_stock: low_stock.map(str::to_string),
        ..Default::default()
    }
}

fn sql(filter: &InventoryFilter) -> String {
    filter
        .apply(Products::find())
        .build(DbBackend::Postgres)
        .to_string()
}

#[test]
fn parses_every_supplied_parameter() {
    let filter =
        InventoryFilter::try_from(&query(Some("Tools"), Some("10.5"), Some("99"), Some("1")))
            .expect("valid filter");

    assert_eq!(filter.category.as_deref(), Some("Tools"));
    assert_eq!(filter.min_price, Some(10.5));
    assert_eq!(filter.max_price, Some(99.0));
    assert!(filter.low_stock);
}

#[test]
fn missing_and_blank_parameters_are_not_supplied() {
    let filter = InventoryFilter::try_from(&query(None, Some(""), Some("  "), Some("")))
        .expect("valid filter");
    assert!(filter.is_empty());
    assert_eq!(filter, InventoryFilter::default());
}

#[test]
fn zero_bounds_are_applied() {
    let filter = InventoryFilter::try_from(&query(None, Some("0"), Some("0"), None))
        .expect("valid filter");
    assert_eq!(filter.min_price, Some(0.0));
    assert_eq!(filter.max_price, Some(0.0));
}

#[test]
fn low_stock_accepts_common_boolean_spellings() {
    for raw in ["1", "true", "TRUE", "yes", "on"] {
        let filter = InventoryFilter::try_from(&query(None, None, None, Some(raw))).unwrap();
        assert!(filter.low_stock, "{raw} should enable low_stock");
    }
    for raw in ["0", "false", "No", "off"] {
        let filter = InventoryFilter::try_from(&query(None, None, None, Some(raw))).unwrap();
        assert!(!filter.low_stock, "{raw} should disable low_stock");
    }
}

#[test]
fn malformed_price_names_the_bad_value() {
    let err = InventoryFilter::try_from(&query(None, Some("abc"), None, None)).unwrap_err();
    match err {
        AppError::Validation(detail) => {
            assert!(detail.contains("min_price"), "detail was {detail}");
            assert!(detail.contains("abc"), "detail was {detail}");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn non_finite_prices_are_rejected() {
    for raw in ["NaN", "inf", "-infinity"] {
        let err = InventoryFilter::try_from(&query(None, None, Some(raw), None)).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "{raw} accepted");
    }
}

#[test]
fn malformed_low_stock_is_rejected() {
    let err = InventoryFilter::try_from(&query(None, None, None, Some("maybe"))).unwrap_err();
    match err {
        AppError::Validation(detail) => assert!(detail.contains("maybe")),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn low_stock_compares_two_columns_of_the_same_row() {
    let filter = InventoryFilter {
        low_stock: true,
        ..Default::default()
    };
    let sql = sql(&filter);
    assert!(
        sql.contains(r#""products"."quantity" <= "products"."reorder_level""#),
        "{sql}"
    );
}

#[test]
fn category_filter_joins_categories_by_name() {
    let filter = InventoryFilter {
        category: Some("Tools".into()),
        ..Default::default()
    };
    let sql = sql(&filter);
    assert!(sql.contains(r#"INNER JOIN "categories""#), "{sql}");
    assert!(sql.contains(r#""categories"."name" = 'Tools'"#), "{sql}");
}

#[test]
fn filters_without_category_skip_the_join() {
    let filter = InventoryFilter {
        min_price: Some(5.0),
        max_price: Some(20.0),
        ..Default::default()
    };
    let sql = sql(&filter);
    assert!(!sql.contains("JOIN"), "{sql}");
    assert!(sql.contains(r#""products"."unit_price" >="#), "{sql}");
    assert!(sql.contains(r#""products"."unit_price" <="#), "{sql}");
    assert!(sql.contains(" AND "), "{sql}");
}

#[test]
fn search_matches_product_or_category_name() {
    let search = ProductSearch::new(Some("Ham")).expect("search term");
    let sql = search
        .apply(Products::find())
        .build(DbBackend::Postgres)
        .to_string();
    assert!(sql.contains(r#"LOWER("products"."name") LIKE '%ham%'"#), "{sql}");
    assert!(sql.contains(r#"LOWER("categories"."name") LIKE '%ham%'"#), "{sql}");
    assert!(sql.contains(" OR "), "{sql}");
}

#[test]
fn search_wildcards_are_escaped() {
    let search = ProductSearch::new(Some("50%_off")).expect("search term");
    let sql = search
        .apply(Products::find())
        .build(DbBackend::Postgres)
        .to_string();
    assert!(sql.contains("ESCAPE"), "{sql}");
    assert!(!sql.contains("50%_off"), "{sql}");
}

#[test]
fn blank_search_is_ignored() {
    assert!(ProductSearch::new(Some("   ")).is_none());
    assert!(ProductSearch::new(None).is_none());
}

#[test]
fn ordering_defaults_to_newest_first() {
    let ordering = ProductOrdering::new(None, None);
    assert_eq!(ordering.sort_by, ProductSortBy::CreatedAt);
    assert_eq!(ordering.sort_order, SortOrder::Desc);

    let sql = ordering
        .apply(Products::find())
        .build(DbBackend::Postgres)
        .to_string();
    assert!(
        sql.contains(r#"ORDER BY "products"."created_at" DESC, "products"."id" ASC"#),
        "{sql}"
    );
}

#[test]
fn ordering_by_price_uses_unit_price() {
    let ordering = ProductOrdering::new(Some(ProductSortBy::Price), Some(SortOrder::Asc));
    let sql = ordering
        .apply(Products::find())
        .build(DbBackend::Postgres)
        .to_string();
    assert!(sql.contains(r#"ORDER BY "products"."unit_price" ASC"#), "{sql}");
}
