use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    access::{Action, Resource},
    dto::suppliers::{CreateSupplierRequest, SupplierList, UpdateSupplierRequest},
    entity::{
        products::{Column as ProductCol, Entity as Products},
        suppliers::{ActiveModel, Column, Entity as Suppliers},
    },
    error::{AppError, AppResult},
    middleware::auth::Caller,
    models::Supplier,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub async fn list_suppliers(
    state: &AppState,
    caller: &Caller,
    query: Pagination,
) -> AppResult<ApiResponse<SupplierList>> {
    state.access.check(Resource::Supplier, Action::Read, caller)?;
    let (page, limit, offset) = query.normalize();

    let finder = Suppliers::find()
        .order_by_asc(Column::Name)
        .order_by_asc(Column::Id);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit)
        .offset(offset)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Supplier::from)
        .collect();

    let meta = Meta::new(page, limit as i64, total);
    Ok(ApiResponse::success(
        "Suppliers",
        SupplierList { items },
        Some(meta),
    ))
}

pub async fn get_supplier(
    state: &AppState,
    caller: &Caller,
    id: Uuid,
) -> AppResult<ApiResponse<Supplier>> {
    state.access.check(Resource::Supplier, Action::Read, caller)?;
    let supplier = Suppliers::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(Supplier::from)
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Supplier", supplier, None))
}

pub async fn create_supplier(
    state: &AppState,
    caller: &Caller,
    payload: CreateSupplierRequest,
) -> AppResult<ApiResponse<Supplier>> {
    state.access.check(Resource::Supplier, Action::Write, caller)?;

    let supplier = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
        contact_person: Set(payload.contact_person),
        email: Set(payload.email),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(supplier_id = %supplier.id, "supplier created");

    Ok(ApiResponse::success(
        "Supplier created",
        Supplier::from(supplier),
        Some(Meta::empty()),
    ))
}

pub async fn update_supplier(
    state: &AppState,
    caller: &Caller,
    id: Uuid,
    payload: UpdateSupplierRequest,
) -> AppResult<ApiResponse<Supplier>> {
    state.access.check(Resource::Supplier, Action::Write, caller)?;
    let existing = Suppliers::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(contact_person) = payload.contact_person {
        active.contact_person = Set(contact_person);
    }
    if let Some(email) = payload.email {
        active.email = Set(email);
    }
    let supplier = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        Supplier::from(supplier),
        Some(Meta::empty()),
    ))
}

/// Deletes the supplier and detaches it from its products, which are kept.
pub async fn delete_supplier(
    state: &AppState,
    caller: &Caller,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.access.check(Resource::Supplier, Action::Write, caller)?;

    let txn = state.orm.begin().await?;
    let detached = Products::update_many()
        .col_expr(ProductCol::SupplierId, Expr::value(Option::<Uuid>::None))
        .filter(ProductCol::SupplierId.eq(id))
        .exec(&txn)
        .await?
        .rows_affected;

    let result = Suppliers::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    txn.commit().await?;

    tracing::info!(supplier_id = %id, detached_products = detached, "supplier deleted");

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "detached_products": detached }),
        Some(Meta::empty()),
    ))
}
