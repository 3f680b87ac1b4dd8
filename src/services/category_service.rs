use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    access::{Action, Resource},
    dto::categories::{CategoryList, CreateCategoryRequest, UpdateCategoryRequest},
    entity::{
        categories::{ActiveModel, Column, Entity as Categories},
        products::{Column as ProductCol, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::Caller,
    models::Category,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

const DUPLICATE_NAME: &str = "category with this name already exists.";

pub async fn list_categories(
    state: &AppState,
    caller: &Caller,
    query: Pagination,
) -> AppResult<ApiResponse<CategoryList>> {
    state.access.check(Resource::Category, Action::Read, caller)?;
    let (page, limit, offset) = query.normalize();

    let finder = Categories::find().order_by_asc(Column::Name);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit)
        .offset(offset)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Category::from)
        .collect();

    let meta = Meta::new(page, limit as i64, total);
    Ok(ApiResponse::success(
        "Categories",
        CategoryList { items },
        Some(meta),
    ))
}

pub async fn get_category(
    state: &AppState,
    caller: &Caller,
    id: Uuid,
) -> AppResult<ApiResponse<Category>> {
    state.access.check(Resource::Category, Action::Read, caller)?;
    let category = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(Category::from)
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Category", category, None))
}

pub async fn create_category(
    state: &AppState,
    caller: &Caller,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    state.access.check(Resource::Category, Action::Write, caller)?;
    ensure_unique_name(state, &payload.name, None).await?;

    let category = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name),
    }
    .insert(&state.orm)
    .await
    .map_err(|err| AppError::constraint(err, DUPLICATE_NAME))?;

    tracing::info!(category_id = %category.id, "category created");

    Ok(ApiResponse::success(
        "Category created",
        Category::from(category),
        Some(Meta::empty()),
    ))
}

pub async fn update_category(
    state: &AppState,
    caller: &Caller,
    id: Uuid,
    payload: UpdateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    state.access.check(Resource::Category, Action::Write, caller)?;
    let existing = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        ensure_unique_name(state, &name, Some(id)).await?;
        active.name = Set(name);
    }
    let category = active
        .update(&state.orm)
        .await
        .map_err(|err| AppError::constraint(err, DUPLICATE_NAME))?;

    Ok(ApiResponse::success(
        "Updated",
        Category::from(category),
        Some(Meta::empty()),
    ))
}

/// Categories still referenced by products cannot be deleted.
pub async fn delete_category(
    state: &AppState,
    caller: &Caller,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.access.check(Resource::Category, Action::Write, caller)?;

    let in_use = Products::find()
        .filter(ProductCol::CategoryId.eq(id))
        .count(&state.orm)
        .await?;
    if in_use > 0 {
        return Err(AppError::Validation(format!(
            "Cannot delete category: it is referenced by {in_use} product(s)."
        )));
    }

    // Products can be added between the count and the delete; the foreign
    // key has the final word.
    let result = Categories::delete_by_id(id)
        .exec(&state.orm)
        .await
        .map_err(|err| {
            AppError::constraint(err, "Cannot delete category: it is referenced by products.")
        })?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    tracing::info!(category_id = %id, "category deleted");

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn ensure_unique_name(state: &AppState, name: &str, except: Option<Uuid>) -> AppResult<()> {
    let mut finder = Categories::find().filter(Column::Name.eq(name));
    if let Some(id) = except {
        finder = finder.filter(Column::Id.ne(id));
    }
    if finder.count(&state.orm).await? > 0 {
        return Err(AppError::Validation(DUPLICATE_NAME.into()));
    }
    Ok(())
}
