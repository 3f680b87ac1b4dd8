use chrono::Utc;
use inventory_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{
        Categories, Products, Suppliers, Users, categories, products, suppliers, users,
    },
    services::auth_service::hash_password,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let admin_id = ensure_user(&orm, "admin", "admin@example.com", "admin123", true).await?;
    let clerk_id = ensure_user(&orm, "clerk", "clerk@example.com", "clerk1234", false).await?;

    let tools = ensure_category(&orm, "Tools").await?;
    let hardware = ensure_category(&orm, "Hardware").await?;
    let acme = ensure_supplier(&orm, "Acme Supply", "Wile E. Coyote", "orders@acme.example").await?;

    let items = [
        ("Claw Hammer", tools, Some(acme), 18.5, 2, 5),
        ("Tape Measure", tools, Some(acme), 9.99, 40, 10),
        ("Wood Screws (100)", hardware, None, 4.25, 3, 20),
        ("Hinge Set", hardware, Some(acme), 12.0, 25, 5),
    ];
    for (name, category, supplier, unit_price, quantity, reorder_level) in items {
        seed_product(
            &orm,
            name,
            category,
            supplier,
            unit_price,
            quantity,
            reorder_level,
            admin_id,
        )
        .await?;
    }

    println!("Seed completed. Admin ID: {admin_id}, Clerk ID: {clerk_id}");
    Ok(())
}

async fn ensure_user(
    orm: &DatabaseConnection,
    username: &str,
    email: &str,
    password: &str,
    is_staff: bool,
) -> anyhow::Result<Uuid> {
    if let Some(existing) = Users::find()
        .filter(users::Column::Username.eq(username))
        .one(orm)
        .await?
    {
        let mut active: users::ActiveModel = existing.into();
        active.is_staff = Set(is_staff);
        let user = active.update(orm).await?;
        println!("Ensured user {username} (staff={is_staff})");
        return Ok(user.id);
    }

    let password_hash = hash_password(password)?;
    let user = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash),
        is_staff: Set(is_staff),
        created_at: Set(Utc::now().into()),
    }
    .insert(orm)
    .await?;

    println!("Ensured user {username} (staff={is_staff})");
    Ok(user.id)
}

async fn ensure_category(orm: &DatabaseConnection, name: &str) -> anyhow::Result<Uuid> {
    if let Some(existing) = Categories::find()
        .filter(categories::Column::Name.eq(name))
        .one(orm)
        .await?
    {
        return Ok(existing.id);
    }
    let category = categories::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
    }
    .insert(orm)
    .await?;
    Ok(category.id)
}

async fn ensure_supplier(
    orm: &DatabaseConnection,
    name: &str,
    contact_person: &str,
    email: &str,
) -> anyhow::Result<Uuid> {
    if let Some(existing) = Suppliers::find()
        .filter(suppliers::Column::Name.eq(name))
        .one(orm)
        .await?
    {
        return Ok(existing.id);
    }
    let supplier = suppliers::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        contact_person: Set(contact_person.to_string()),
        email: Set(email.to_string()),
    }
    .insert(orm)
    .await?;
    Ok(supplier.id)
}

#[allow(clippy::too_many_arguments)]
async fn seed_product(
    orm: &DatabaseConnection,
    name: &str,
    category: Uuid,
    supplier: Option<Uuid>,
    unit_price: f64,
    quantity: i32,
    reorder_level: i32,
    owner: Uuid,
) -> anyhow::Result<()> {
    let exists = Products::find()
        .filter(products::Column::Name.eq(name))
        .one(orm)
        .await?
        .is_some();
    if exists {
        return Ok(());
    }

    products::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        category_id: Set(category),
        supplier_id: Set(supplier),
        unit_price: Set(unit_price),
        quantity: Set(quantity),
        reorder_level: Set(reorder_level),
        created_at: Set(Utc::now().into()),
        created_by_id: Set(owner),
        updated_by_id: Set(owner),
    }
    .insert(orm)
    .await?;

    println!("Seeded product {name}");
    Ok(())
}
