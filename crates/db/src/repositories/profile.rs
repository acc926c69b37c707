use bookslot_core::models::profile::{CreateGuestCustomerRequest, UpdateCustomerRequest};
use eyre::Result;
use sqlx::{Pool, Postgres};

use crate::models::{DbCustomer, DbUser};

// Users (providers)

pub async fn get_user_by_id(pool: &Pool<Postgres>, id: i64) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, name, email, brand_id, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

// Customers

pub async fn get_customer_by_id(pool: &Pool<Postgres>, id: i64) -> Result<Option<DbCustomer>> {
    let customer = sqlx::query_as::<_, DbCustomer>(
        r#"
        SELECT id, name, email, phone_number, brand_id, is_guest, created_at, updated_at
        FROM customers
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(customer)
}

/// Inserts a guest customer unless one with the same brand, name and phone
/// already exists. The flag is `true` when the existing row was returned.
pub async fn get_or_create_guest_customer(
    pool: &Pool<Postgres>,
    guest: &CreateGuestCustomerRequest,
) -> Result<(DbCustomer, bool)> {
    let created = sqlx::query_as::<_, DbCustomer>(
        r#"
        INSERT INTO customers (name, email, phone_number, brand_id, is_guest, created_at, updated_at)
        VALUES ($1, $2, $3, $4, TRUE, NOW(), NOW())
        ON CONFLICT (brand_id, name, phone_number) WHERE is_guest DO NOTHING
        RETURNING id, name, email, phone_number, brand_id, is_guest, created_at, updated_at
        "#,
    )
    .bind(&guest.name)
    .bind(&guest.email)
    .bind(&guest.phone_number)
    .bind(guest.brand_id)
    .fetch_optional(pool)
    .await?;

    if let Some(customer) = created {
        return Ok((customer, false));
    }

    let existing = sqlx::query_as::<_, DbCustomer>(
        r#"
        SELECT id, name, email, phone_number, brand_id, is_guest, created_at, updated_at
        FROM customers
        WHERE brand_id = $1 AND name = $2 AND phone_number = $3 AND is_guest
        "#,
    )
    .bind(guest.brand_id)
    .bind(&guest.name)
    .bind(&guest.phone_number)
    .fetch_one(pool)
    .await?;

    Ok((existing, true))
}

/// Applies the present fields of `changes`. Returns `None` when no customer
/// with `id` exists in the brand.
pub async fn update_customer(
    pool: &Pool<Postgres>,
    id: i64,
    changes: &UpdateCustomerRequest,
) -> Result<Option<DbCustomer>> {
    let customer = sqlx::query_as::<_, DbCustomer>(
        r#"
        UPDATE customers
        SET name = COALESCE($3, name),
            phone_number = COALESCE($4, phone_number),
            email = COALESCE($5, email),
            updated_at = NOW()
        WHERE id = $1 AND brand_id = $2
        RETURNING id, name, email, phone_number, brand_id, is_guest, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(changes.brand_id)
    .bind(&changes.name)
    .bind(&changes.phone_number)
    .bind(&changes.email)
    .fetch_optional(pool)
    .await?;

    Ok(customer)
}
