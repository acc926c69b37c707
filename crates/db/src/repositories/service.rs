use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::models::DbService;

pub async fn get_service_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbService>> {
    let service = sqlx::query_as::<_, DbService>(
        r#"
        SELECT s.id, s.title, s.description, s.duration, s.buffer_time,
               s.cost::TEXT AS cost, s.is_visible, s.brand_id,
               ARRAY(
                   SELECT sp.user_id FROM service_providers sp
                   WHERE sp.service_id = s.id
                   ORDER BY sp.user_id
               ) AS provider_ids,
               s.created_at, s.updated_at
        FROM services s
        WHERE s.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(service)
}
