use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    access::{Action, Resource},
    dto::users::{DeletedUser, UserList},
    entity::{
        products::{Column as ProductCol, Entity as Products},
        users::{Column, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::Caller,
    models::User,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub async fn list_users(
    state: &AppState,
    caller: &Caller,
    query: Pagination,
) -> AppResult<ApiResponse<UserList>> {
    state.access.check(Resource::User, Action::Read, caller)?;
    let (page, limit, offset) = query.normalize();

    let finder = Users::find().order_by_asc(Column::Username);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit)
        .offset(offset)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(User::from)
        .collect();

    let meta = Meta::new(page, limit as i64, total);
    Ok(ApiResponse::success("Users", UserList { items }, Some(meta)))
}

pub async fn get_user(
    state: &AppState,
    caller: &Caller,
    id: Uuid,
) -> AppResult<ApiResponse<User>> {
    state.access.check(Resource::User, Action::Read, caller)?;
    let user = Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(User::from)
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("User", user, None))
}

/// Deletes a user together with every product the user created or last
/// updated. The response message spells out that products went too.
pub async fn delete_user(
    state: &AppState,
    caller: &Caller,
    id: Uuid,
) -> AppResult<ApiResponse<DeletedUser>> {
    state.access.check(Resource::User, Action::Write, caller)?;

    let txn = state.orm.begin().await?;
    let deleted_products = Products::delete_many()
        .filter(
            Condition::any()
                .add(ProductCol::CreatedById.eq(id))
                .add(ProductCol::UpdatedById.eq(id)),
        )
        .exec(&txn)
        .await?
        .rows_affected;

    let result = Users::delete_by_id(id).exec(&txn).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    txn.commit().await?;

    if deleted_products > 0 {
        tracing::warn!(user_id = %id, deleted_products, "user deleted with cascading products");
    } else {
        tracing::info!(user_id = %id, "user deleted");
    }

    let message = format!(
        "User deleted. {deleted_products} product(s) created or last updated by this user were deleted as well."
    );
    Ok(ApiResponse::success(
        message,
        DeletedUser {
            id,
            deleted_products,
        },
        Some(Meta::empty()),
    ))
}
