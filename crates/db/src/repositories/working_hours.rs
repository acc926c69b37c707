use bookslot_core::models::working_hours::WorkingHours;
use eyre::Result;
use sqlx::{Pool, Postgres};

use crate::models::DbWorkingHours;

pub async fn get_working_hours_by_brand(pool: &Pool<Postgres>, brand_id: i32) -> Result<Vec<DbWorkingHours>> {
    let hours = sqlx::query_as::<_, DbWorkingHours>(
        r#"
        SELECT brand_id, day_of_week, open_time, close_time, is_closed
        FROM working_hours
        WHERE brand_id = $1
        ORDER BY day_of_week ASC
        "#,
    )
    .bind(brand_id)
    .fetch_all(pool)
    .await?;

    Ok(hours)
}

pub async fn upsert_working_hours(pool: &Pool<Postgres>, hours: &WorkingHours) -> Result<DbWorkingHours> {
    let saved = sqlx::query_as::<_, DbWorkingHours>(
        r#"
        INSERT INTO working_hours (brand_id, day_of_week, open_time, close_time, is_closed)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (brand_id, day_of_week)
        DO UPDATE SET open_time = $3, close_time = $4, is_closed = $5
        RETURNING brand_id, day_of_week, open_time, close_time, is_closed
        "#,
    )
    .bind(hours.brand_id)
    .bind(hours.day_of_week)
    .bind(hours.open_time)
    .bind(hours.close_time)
    .bind(hours.is_closed)
    .fetch_one(pool)
    .await?;

    Ok(saved)
}
