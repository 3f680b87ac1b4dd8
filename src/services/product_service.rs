use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    access::{Action, Resource},
    dto::products::{CreateProductRequest, ProductList, UpdateProductRequest},
    entity::{
        Categories, Suppliers, Users,
        products::{ActiveModel, Entity as Products},
    },
    error::{AppError, AppResult},
    filter::{InventoryFilter, ProductOrdering, ProductSearch},
    middleware::auth::{AuthUser, Caller},
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::{InventoryQuery, ProductQuery},
    state::AppState,
};

pub async fn list_products(
    state: &AppState,
    caller: &Caller,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    state.access.check(Resource::Product, Action::Read, caller)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut finder = Products::find();
    if let Some(search) = ProductSearch::new(query.search.as_deref()) {
        finder = search.apply(finder);
    }
    let finder = ProductOrdering::new(query.sort_by, query.sort_order).apply(finder);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit)
        .offset(offset)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    let meta = Meta::new(page, limit as i64, total);
    let data = ProductList { items };
    Ok(ApiResponse::success("Products", data, Some(meta)))
}

/// Products matching every supplied inventory filter.
///
/// An empty match is reported as [`AppError::NoMatchingProducts`], not as an
/// empty list.
pub async fn current_inventory(
    state: &AppState,
    caller: &Caller,
    query: InventoryQuery,
) -> AppResult<ApiResponse<ProductList>> {
    state.access.check(Resource::Product, Action::Read, caller)?;
    let filter = InventoryFilter::try_from(&query)?;
    let ordering = ProductOrdering::new(query.sort_by, query.sort_order);

    let items: Vec<Product> = ordering
        .apply(filter.apply(Products::find()))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Product::from)
        .collect();

    tracing::debug!(?filter, matched = items.len(), "current inventory evaluated");

    if items.is_empty() {
        return Err(AppError::NoMatchingProducts);
    }

    let meta = Meta::unpaginated(items.len());
    Ok(ApiResponse::success(
        "Current inventory",
        ProductList { items },
        Some(meta),
    ))
}

pub async fn get_product(
    state: &AppState,
    caller: &Caller,
    id: Uuid,
) -> AppResult<ApiResponse<Product>> {
    state.access.check(Resource::Product, Action::Read, caller)?;
    let result = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(Product::from);
    let result = match result {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Product", result, None))
}

pub async fn create_product(
    state: &AppState,
    caller: &Caller,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    state.access.check(Resource::Product, Action::Write, caller)?;
    let user = caller.user()?;
    ensure_user(&state.orm, user).await?;
    ensure_category(&state.orm, payload.category).await?;
    if let Some(supplier) = payload.supplier {
        ensure_supplier(&state.orm, supplier).await?;
    }

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        category_id: Set(payload.category),
        supplier_id: Set(payload.supplier),
        unit_price: Set(payload.unit_price),
        quantity: Set(payload.quantity),
        reorder_level: Set(payload.reorder_level),
        created_at: Set(Utc::now().into()),
        created_by_id: Set(user.user_id),
        updated_by_id: Set(user.user_id),
    };
    let product = active.insert(&state.orm).await?;

    tracing::info!(product_id = %product.id, user_id = %user.user_id, "product created");

    Ok(ApiResponse::success(
        "Product created",
        Product::from(product),
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    caller: &Caller,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    state.access.check(Resource::Product, Action::Write, caller)?;
    let user = caller.user()?;
    ensure_user(&state.orm, user).await?;

    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(category) = payload.category {
        ensure_category(&state.orm, category).await?;
        active.category_id = Set(category);
    }
    if let Some(supplier) = payload.supplier {
        if let Some(supplier) = supplier {
            ensure_supplier(&state.orm, supplier).await?;
        }
        active.supplier_id = Set(supplier);
    }
    if let Some(unit_price) = payload.unit_price {
        active.unit_price = Set(unit_price);
    }
    if let Some(quantity) = payload.quantity {
        active.quantity = Set(quantity);
    }
    if let Some(reorder_level) = payload.reorder_level {
        active.reorder_level = Set(reorder_level);
    }
    active.updated_by_id = Set(user.user_id);

    let product = active.update(&state.orm).await?;

    tracing::info!(product_id = %product.id, user_id = %user.user_id, "product updated");

    Ok(ApiResponse::success(
        "Updated",
        Product::from(product),
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(
    state: &AppState,
    caller: &Caller,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.access.check(Resource::Product, Action::Write, caller)?;
    let result = Products::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(product_id = %id, "product deleted");

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

// A token can outlive its user; stamping a missing user would break the
// created_by/updated_by references.
async fn ensure_user<C: ConnectionTrait>(conn: &C, user: &AuthUser) -> AppResult<()> {
    if Users::find_by_id(user.user_id).one(conn).await?.is_none() {
        return Err(AppError::Unauthorized("User not found.".into()));
    }
    Ok(())
}

async fn ensure_category<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<()> {
    if Categories::find_by_id(id).one(conn).await?.is_none() {
        return Err(AppError::Validation(format!(
            "Invalid category \"{id}\" - object does not exist."
        )));
    }
    Ok(())
}

async fn ensure_supplier<C: ConnectionTrait>(conn: &C, id: Uuid) -> AppResult<()> {
    if Suppliers::find_by_id(id).one(conn).await?.is_none() {
        return Err(AppError::Validation(format!(
            "Invalid supplier \"{id}\" - object does not exist."
        )));
    }
    Ok(())
}
