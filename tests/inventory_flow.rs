mod common;

use common::{NewProduct, create_category, create_user, insert_product, setup_state};
use inventory_api::{
    error::AppError,
    middleware::auth::Caller,
    models::Product,
    routes::params::{InventoryQuery, ProductQuery, ProductSortBy, SortOrder},
    services::product_service,
    state::AppState,
};
use uuid::Uuid;

struct Catalog {
    tools: Uuid,
    garden: Uuid,
}

/// Six products across two categories, oldest first in `age_hours` terms.
async fn seed_catalog(state: &AppState) -> anyhow::Result<Catalog> {
    let owner = create_user(state, "owner", false).await?;
    let tools = create_category(state, "Tools").await?;
    let garden = create_category(state, "Garden").await?;

    let rows = [
        ("Hammer", tools, 10.0, 2, 5, 6),
        ("Drill", tools, 50.0, 20, 5, 5),
        ("Saw", tools, 25.0, 5, 5, 4),
        ("Rake", garden, 15.0, 1, 3, 3),
        ("Hose", garden, 30.0, 12, 3, 2),
        ("Seeds", garden, 0.0, 0, 10, 1),
    ];
    for (name, category, unit_price, quantity, reorder_level, age_hours) in rows {
        insert_product(
            state,
            NewProduct {
                name,
                category,
                supplier: None,
                unit_price,
                quantity,
                reorder_level,
                owner,
                age_hours,
            },
        )
        .await?;
    }

    Ok(Catalog { tools, garden })
}

fn inventory(
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

async fn run(state: &AppState, query: InventoryQuery) -> Result<Vec<Product>, AppError> {
    let resp = product_service::current_inventory(state, &Caller::anonymous(), query).await?;
    Ok(resp.data.expect("inventory data").items)
}

fn names(items: &[Product]) -> Vec<&str> {
    items.iter().map(|p| p.name.as_str()).collect()
}

#[tokio::test]
async fn tools_low_stock_returns_only_the_hammer() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let owner = create_user(&state, "owner", false).await?;
    let tools = create_category(&state, "Tools").await?;
    for (name, unit_price, quantity, age_hours) in [("A", 10.0, 2, 2), ("B", 50.0, 20, 1)] {
        insert_product(
            &state,
            NewProduct {
                name,
                category: tools,
                supplier: None,
                unit_price,
                quantity,
                reorder_level: 5,
                owner,
                age_hours,
            },
        )
        .await?;
    }

    let items = run(&state, inventory(Some("Tools"), None, None, Some("1"))).await?;
    assert_eq!(names(&items), vec!["A"]);
    Ok(())
}

#[tokio::test]
async fn price_bounds_are_inclusive() -> anyhow::Result<()> {
    let state = setup_state().await?;
    seed_catalog(&state).await?;

    let items = run(&state, inventory(None, Some("10"), Some("30"), None)).await?;
    assert!(!items.is_empty());
    for product in &items {
        assert!(
            (10.0..=30.0).contains(&product.unit_price),
            "{} priced {} escaped the bounds",
            product.name,
            product.unit_price
        );
    }
    let mut got = names(&items);
    got.sort();
    assert_eq!(got, vec!["Hammer", "Hose", "Rake", "Saw"]);
    Ok(())
}

#[tokio::test]
async fn low_stock_is_exactly_quantity_at_or_below_reorder_level() -> anyhow::Result<()> {
    let state = setup_state().await?;
    seed_catalog(&state).await?;

    let all = run(&state, inventory(None, None, None, None)).await?;
    let low = run(&state, inventory(None, None, None, Some("1"))).await?;

    let mut expected: Vec<Uuid> = all
        .iter()
        .filter(|p| p.quantity <= p.reorder_level)
        .map(|p| p.id)
        .collect();
    let mut got: Vec<Uuid> = low.iter().map(|p| p.id).collect();
    expected.sort();
    got.sort();
    assert_eq!(got, expected);
    // Saw sits exactly on its reorder level.
    assert!(low.iter().any(|p| p.name == "Saw"));
    Ok(())
}

#[tokio::test]
async fn combined_filters_are_conjunctive() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let catalog = seed_catalog(&state).await?;

    let both = run(&state, inventory(Some("Tools"), None, None, Some("true"))).await?;
    let by_category = run(&state, inventory(Some("Tools"), None, None, None)).await?;
    let by_stock = run(&state, inventory(None, None, None, Some("true"))).await?;

    for product in &both {
        assert_eq!(product.category, catalog.tools);
        assert!(by_category.iter().any(|p| p.id == product.id));
        assert!(by_stock.iter().any(|p| p.id == product.id));
    }
    assert!(by_stock.iter().any(|p| p.category == catalog.garden));
    let mut got = names(&both);
    got.sort();
    assert_eq!(got, vec!["Hammer", "Saw"]);
    Ok(())
}

#[tokio::test]
async fn zero_max_price_keeps_only_free_products() -> anyhow::Result<()> {
    let state = setup_state().await?;
    seed_catalog(&state).await?;

    let items = run(&state, inventory(None, None, Some("0"), None)).await?;
    assert_eq!(names(&items), vec!["Seeds"]);
    Ok(())
}

#[tokio::test]
async fn no_match_is_reported_distinctly() -> anyhow::Result<()> {
    let state = setup_state().await?;
    seed_catalog(&state).await?;

    let err = run(&state, inventory(Some("Kitchen"), None, None, None))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NoMatchingProducts));
    assert_eq!(err.to_string(), "No products match the given criteria.");
    Ok(())
}

#[tokio::test]
async fn malformed_price_is_a_validation_error() -> anyhow::Result<()> {
    let state = setup_state().await?;
    seed_catalog(&state).await?;

    let err = run(&state, inventory(None, Some("abc"), None, None))
        .await
        .unwrap_err();
    match err {
        AppError::Validation(detail) => assert!(detail.contains("abc")),
        other => panic!("expected validation error, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn inventory_defaults_to_newest_first() -> anyhow::Result<()> {
    let state = setup_state().await?;
    seed_catalog(&state).await?;

    let items = run(&state, inventory(None, None, None, None)).await?;
    assert_eq!(
        names(&items),
        vec!["Seeds", "Hose", "Rake", "Saw", "Drill", "Hammer"]
    );
    Ok(())
}

#[tokio::test]
async fn inventory_honours_explicit_sort() -> anyhow::Result<()> {
    let state = setup_state().await?;
    seed_catalog(&state).await?;

    let query = InventoryQuery {
        sort_by: Some(ProductSortBy::Quantity),
        sort_order: Some(SortOrder::Asc),
        ..inventory(Some("Garden"), None, None, None)
    };
    let items = run(&state, query).await?;
    assert_eq!(names(&items), vec!["Seeds", "Rake", "Hose"]);
    Ok(())
}

#[tokio::test]
async fn product_list_searches_product_and_category_names() -> anyhow::Result<()> {
    let state = setup_state().await?;
    seed_catalog(&state).await?;

    let by_product = product_service::list_products(
        &state,
        &Caller::anonymous(),
        ProductQuery {
            search: Some("ham".into()),
            ..Default::default()
        },
    )
    .await?;
    let items = by_product.data.expect("list data").items;
    assert_eq!(names(&items), vec!["Hammer"]);

    let by_category = product_service::list_products(
        &state,
        &Caller::anonymous(),
        ProductQuery {
            search: Some("GARD".into()),
            sort_by: Some(ProductSortBy::Name),
            sort_order: Some(SortOrder::Asc),
            ..Default::default()
        },
    )
    .await?;
    let meta = by_category.meta.clone().expect("meta");
    let items = by_category.data.expect("list data").items;
    assert_eq!(names(&items), vec!["Hose", "Rake", "Seeds"]);
    assert_eq!(meta.total, Some(3));
    Ok(())
}

#[tokio::test]
async fn search_treats_wildcards_literally() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let catalog = seed_catalog(&state).await?;
    let owner = create_user(&state, "bolts", false).await?;
    insert_product(
        &state,
        NewProduct {
            name: "Bolt_M8",
            category: catalog.tools,
            supplier: None,
            unit_price: 0.2,
            quantity: 500,
            reorder_level: 100,
            owner,
            age_hours: 0,
        },
    )
    .await?;

    let search = |term: &str| ProductQuery {
        search: Some(term.to_string()),
        ..Default::default()
    };

    let percent =
        product_service::list_products(&state, &Caller::anonymous(), search("%")).await?;
    assert!(percent.data.expect("list data").items.is_empty());

    let underscore =
        product_service::list_products(&state, &Caller::anonymous(), search("_")).await?;
    assert_eq!(names(&underscore.data.expect("list data").items), vec!["Bolt_M8"]);
    Ok(())
}

#[tokio::test]
async fn product_list_paginates() -> anyhow::Result<()> {
    let state = setup_state().await?;
    seed_catalog(&state).await?;

    let resp = product_service::list_products(
        &state,
        &Caller::anonymous(),
        ProductQuery {
            page: Some(2),
            per_page: Some(4),
            ..Default::default()
        },
    )
    .await?;
    let meta = resp.meta.clone().expect("meta");
    assert_eq!(meta.page, Some(2));
    assert_eq!(meta.per_page, Some(4));
    assert_eq!(meta.total, Some(6));
    assert_eq!(names(&resp.data.expect("list data").items), vec!["Drill", "Hammer"]);
    Ok(())
}
