#![allow(dead_code)]

use chrono::{Duration, Utc};
use inventory_api::{
    db::run_migrations,
    entity::{categories, products, suppliers, users},
    middleware::auth::{AuthKeys, AuthUser, Caller},
    state::AppState,
};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, Set};
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret";

/// Fresh in-memory SQLite database with the real migrations applied.
///
/// A single pooled connection keeps the in-memory database alive and shared.
pub async fn setup_state() -> anyhow::Result<AppState> {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let orm = Database::connect(options).await?;
    run_migrations(&orm).await?;

    Ok(AppState::new(orm, AuthKeys::new(JWT_SECRET, 1)))
}

pub async fn create_user(state: &AppState, username: &str, is_staff: bool) -> anyhow::Result<Uuid> {
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(username.to_string()),
        email: Set(format!("{username}@example.com")),
        password_hash: Set("dummy".into()),
        is_staff: Set(is_staff),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}

pub fn caller_for(user_id: Uuid, username: &str, is_staff: bool) -> Caller {
    Caller::authenticated(AuthUser {
        user_id,
        username: username.to_string(),
        is_staff,
    })
}

pub fn bearer(state: &AppState, user_id: Uuid, username: &str, is_staff: bool) -> String {
    let token = state
        .auth
        .issue(user_id, username, is_staff)
        .expect("issue token");
    format!("Bearer {token}")
}

pub async fn create_category(state: &AppState, name: &str) -> anyhow::Result<Uuid> {
    let category = categories::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
    }
    .insert(&state.orm)
    .await?;
    Ok(category.id)
}

pub async fn create_supplier(state: &AppState, name: &str) -> anyhow::Result<Uuid> {
    let supplier = suppliers::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        contact_person: Set("Pat Doe".into()),
        email: Set("pat@example.com".into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(supplier.id)
}

/// Row description for seeding products directly through the store.
pub struct NewProduct<'a> {
    pub name: &'a str,
    pub category: Uuid,
    pub supplier: Option<Uuid>,
    pub unit_price: f64,
    pub quantity: i32,
    pub reorder_level: i32,
    pub owner: Uuid,
    /// Hours before now; larger means older.
    pub age_hours: i64,
}

pub async fn insert_product(state: &AppState, p: NewProduct<'_>) -> anyhow::Result<products::Model> {
    let created_at = Utc::now() - Duration::hours(p.age_hours);
    let product = products::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(p.name.to_string()),
        category_id: Set(p.category),
        supplier_id: Set(p.supplier),
        unit_price: Set(p.unit_price),
        quantity: Set(p.quantity),
        reorder_level: Set(p.reorder_level),
        created_at: Set(created_at.into()),
        created_by_id: Set(p.owner),
        updated_by_id: Set(p.owner),
    }
    .insert(&state.orm)
    .await?;
    Ok(product)
}
