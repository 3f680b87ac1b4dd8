use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::QueryRejection},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::suppliers::{CreateSupplierRequest, SupplierList, UpdateSupplierRequest},
    error::{AppResult, ErrorBody},
    extract::ValidatedJson,
    middleware::auth::Caller,
    models::Supplier,
    response::ApiResponse,
    routes::params::Pagination,
    services::supplier_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_suppliers).post(create_supplier))
        .route(
            "/{id}",
            get(get_supplier)
                .put(replace_supplier)
                .patch(update_supplier)
                .delete(delete_supplier),
        )
}

#[utoipa::path(
    get,
    path = "/api/suppliers",
    params(Pagination),
    responses(
        (status = 200, description = "List suppliers", body = ApiResponse<SupplierList>),
        (status = 401, description = "Unauthorized", body = ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "Suppliers"
)]
pub async fn list_suppliers(
    State(state): State<AppState>,
    caller: Caller,
    query: Result<Query<Pagination>, QueryRejection>,
) -> AppResult<Json<ApiResponse<SupplierList>>> {
    let Query(query) = query?;
    let resp = supplier_service::list_suppliers(&state, &caller, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/suppliers/{id}",
    params(
        ("id" = Uuid, Path, description = "Supplier ID")
    ),
    responses(
        (status = 200, description = "Get supplier", body = ApiResponse<Supplier>),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Supplier not found", body = ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "Suppliers"
)]
pub async fn get_supplier(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Supplier>>> {
    let resp = supplier_service::get_supplier(&state, &caller, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/suppliers",
    request_body = CreateSupplierRequest,
    responses(
        (status = 201, description = "Create supplier", body = ApiResponse<Supplier>),
        (status = 400, description = "Invalid supplier", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Suppliers"
)]
pub async fn create_supplier(
    State(state): State<AppState>,
    caller: Caller,
    ValidatedJson(payload): ValidatedJson<CreateSupplierRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Supplier>>)> {
    let resp = supplier_service::create_supplier(&state, &caller, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/suppliers/{id}",
    params(
        ("id" = Uuid, Path, description = "Supplier ID")
    ),
    request_body = CreateSupplierRequest,
    responses(
        (status = 200, description = "Replaced supplier", body = ApiResponse<Supplier>),
        (status = 400, description = "Invalid supplier", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Supplier not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Suppliers"
)]
pub async fn replace_supplier(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<CreateSupplierRequest>,
) -> AppResult<Json<ApiResponse<Supplier>>> {
    let resp = supplier_service::update_supplier(&state, &caller, id, payload.into()).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/suppliers/{id}",
    params(
        ("id" = Uuid, Path, description = "Supplier ID")
    ),
    request_body = UpdateSupplierRequest,
    responses(
        (status = 200, description = "Updated supplier", body = ApiResponse<Supplier>),
        (status = 400, description = "Invalid supplier", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Supplier not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Suppliers"
)]
pub async fn update_supplier(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateSupplierRequest>,
) -> AppResult<Json<ApiResponse<Supplier>>> {
    let resp = supplier_service::update_supplier(&state, &caller, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/suppliers/{id}",
    params(
        ("id" = Uuid, Path, description = "Supplier ID")
    ),
    responses(
        (status = 200, description = "Deleted supplier; its products are kept with no supplier"),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Supplier not found", body = ErrorBody)
    ),
    security(("bearer_auth" = [])),
    tag = "Suppliers"
)]
pub async fn delete_supplier(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = supplier_service::delete_supplier(&state, &caller, id).await?;
    Ok(Json(resp))
}
