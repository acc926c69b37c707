use bookslot_core::models::booking::NewBooking;
use chrono::{DateTime, Utc};
use eyre::Result;
use sqlx::{PgExecutor, Pool, Postgres};

use crate::models::DbBooking;

const BOOKING_COLUMNS: &str = r#"
    id, brand_id, provider_id, customer_id, service_id, start_time, end_time,
    status, provider_name, customer_name, service_name, cost::TEXT AS cost,
    buffer_time, comment, created_at, updated_at
"#;

pub async fn get_booking_by_id(pool: &Pool<Postgres>, id: i64) -> Result<Option<DbBooking>> {
    let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1");
    let booking = sqlx::query_as::<_, DbBooking>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(booking)
}

/// Bookings of a brand whose start falls in `[from, to)`, any status.
pub async fn get_bookings_by_brand(
    pool: &Pool<Postgres>,
    brand_id: i32,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<DbBooking>> {
    let sql = format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM bookings
        WHERE brand_id = $1 AND start_time >= $2 AND start_time < $3
        ORDER BY start_time ASC
        "#
    );
    let bookings = sqlx::query_as::<_, DbBooking>(&sql)
        .bind(brand_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;

    Ok(bookings)
}

/// Time-holding bookings of a provider whose occupied span touches
/// `[from, to)`.
pub async fn get_provider_bookings(
    pool: &Pool<Postgres>,
    provider_id: i64,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<DbBooking>> {
    let sql = format!(
        r#"
        SELECT {BOOKING_COLUMNS}
        FROM bookings
        WHERE provider_id = $1
          AND status <> 'cancelled'
          AND start_time < $3
          AND occupied_until > $2
        ORDER BY start_time ASC
        "#
    );
    let bookings = sqlx::query_as::<_, DbBooking>(&sql)
        .bind(provider_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;

    Ok(bookings)
}

/// Id of the first time-holding booking of `provider_id` whose occupied
/// span overlaps `[start, end)`, skipping `exclude`.
pub async fn find_overlapping<'e, E: PgExecutor<'e>>(
    executor: E,
    provider_id: i64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclude: Option<i64>,
) -> Result<Option<i64>> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT id
        FROM bookings
        WHERE provider_id = $1
          AND status <> 'cancelled'
          AND start_time < $3
          AND occupied_until > $2
          AND ($4::BIGINT IS NULL OR id <> $4)
        ORDER BY start_time ASC
        LIMIT 1
        "#,
    )
    .bind(provider_id)
    .bind(start)
    .bind(end)
    .bind(exclude)
    .fetch_optional(executor)
    .await?;

    Ok(id)
}

/// Takes a row lock on the provider so that concurrent reservations for the
/// same provider run one after another. Returns `false` if the provider
/// does not exist.
pub async fn lock_provider<'e, E: PgExecutor<'e>>(executor: E, provider_id: i64) -> Result<bool> {
    let locked = sqlx::query_scalar::<_, i64>("SELECT id FROM users WHERE id = $1 FOR UPDATE")
        .bind(provider_id)
        .fetch_optional(executor)
        .await?;

    Ok(locked.is_some())
}

pub async fn insert_booking<'e, E: PgExecutor<'e>>(executor: E, booking: &NewBooking) -> Result<DbBooking> {
    let sql = format!(
        r#"
        INSERT INTO bookings (
            brand_id, provider_id, customer_id, service_id, start_time, end_time,
            occupied_until, status, provider_name, customer_name, service_name,
            cost, buffer_time, comment, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, 'confirmed', $8, $9, $10, $11::NUMERIC, $12, $13, NOW(), NOW())
        RETURNING {BOOKING_COLUMNS}
        "#
    );
    let booking = sqlx::query_as::<_, DbBooking>(&sql)
        .bind(booking.brand_id)
        .bind(booking.provider_id)
        .bind(booking.customer_id)
        .bind(booking.service_id)
        .bind(booking.start_time)
        .bind(booking.end_time)
        .bind(booking.occupied().end)
        .bind(&booking.provider_name)
        .bind(&booking.customer_name)
        .bind(&booking.service_name)
        .bind(&booking.cost)
        .bind(booking.buffer_time)
        .bind(&booking.comment)
        .fetch_one(executor)
        .await?;

    Ok(booking)
}

/// Rewrites booking `id` with fresh values. Status and `created_at` are
/// kept. Returns `None` if the row is gone.
pub async fn update_booking<'e, E: PgExecutor<'e>>(
    executor: E,
    id: i64,
    booking: &NewBooking,
) -> Result<Option<DbBooking>> {
    let sql = format!(
        r#"
        UPDATE bookings
        SET brand_id = $2,
            provider_id = $3,
            customer_id = $4,
            service_id = $5,
            start_time = $6,
            end_time = $7,
            occupied_until = $8,
            provider_name = $9,
            customer_name = $10,
            service_name = $11,
            cost = $12::NUMERIC,
            buffer_time = $13,
            comment = $14,
            updated_at = NOW()
        WHERE id = $1
        RETURNING {BOOKING_COLUMNS}
        "#
    );
    let updated = sqlx::query_as::<_, DbBooking>(&sql)
        .bind(id)
        .bind(booking.brand_id)
        .bind(booking.provider_id)
        .bind(booking.customer_id)
        .bind(booking.service_id)
        .bind(booking.start_time)
        .bind(booking.end_time)
        .bind(booking.occupied().end)
        .bind(&booking.provider_name)
        .bind(&booking.customer_name)
        .bind(&booking.service_name)
        .bind(&booking.cost)
        .bind(booking.buffer_time)
        .bind(&booking.comment)
        .fetch_optional(executor)
        .await?;

    Ok(updated)
}
