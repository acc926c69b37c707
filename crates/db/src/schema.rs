use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

/// Name of the exclusion constraint that keeps a provider's occupied
/// intervals disjoint.
pub const NO_DOUBLE_BOOKING: &str = "bookings_no_provider_overlap";

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Lets the exclusion constraint mix `=` on ids with `&&` on ranges.
    sqlx::query("CREATE EXTENSION IF NOT EXISTS btree_gist")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS brands (
            id SERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Staff members; providers are users attached to a brand.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL UNIQUE,
            brand_id INTEGER NULL REFERENCES brands(id),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS customers (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NULL,
            phone_number VARCHAR(50) NULL,
            brand_id INTEGER NOT NULL REFERENCES brands(id),
            is_guest BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_customers_guest_identity
        ON customers(brand_id, name, phone_number)
        WHERE is_guest
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS services (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            title VARCHAR(255) NOT NULL,
            description TEXT NULL,
            duration INTEGER NOT NULL,
            buffer_time INTEGER NULL,
            cost NUMERIC(10, 2) NOT NULL DEFAULT 0,
            is_visible BOOLEAN NOT NULL DEFAULT TRUE,
            brand_id INTEGER NOT NULL REFERENCES brands(id),
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT positive_duration CHECK (duration > 0),
            CONSTRAINT non_negative_buffer CHECK (buffer_time IS NULL OR buffer_time >= 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS service_providers (
            service_id UUID NOT NULL REFERENCES services(id) ON DELETE CASCADE,
            user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            PRIMARY KEY (service_id, user_id)
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS working_hours (
            id SERIAL PRIMARY KEY,
            brand_id INTEGER NOT NULL REFERENCES brands(id),
            day_of_week INTEGER NOT NULL,
            open_time TIME NULL,
            close_time TIME NULL,
            is_closed BOOLEAN NOT NULL DEFAULT FALSE,
            CONSTRAINT valid_day_of_week CHECK (day_of_week BETWEEN 0 AND 6),
            CONSTRAINT one_entry_per_day UNIQUE (brand_id, day_of_week)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // `occupied_until` is end_time plus the buffer snapshot. It is stored
    // because index expressions must be immutable and timestamptz + interval
    // is not.
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS bookings (
            id BIGSERIAL PRIMARY KEY,
            brand_id INTEGER NOT NULL REFERENCES brands(id),
            provider_id BIGINT NOT NULL REFERENCES users(id),
            customer_id BIGINT NOT NULL REFERENCES customers(id),
            service_id UUID NOT NULL REFERENCES services(id),
            start_time TIMESTAMP WITH TIME ZONE NOT NULL,
            end_time TIMESTAMP WITH TIME ZONE NOT NULL,
            occupied_until TIMESTAMP WITH TIME ZONE NOT NULL,
            status VARCHAR(20) NOT NULL DEFAULT 'confirmed',
            provider_name VARCHAR(255) NOT NULL,
            customer_name VARCHAR(255) NOT NULL,
            service_name VARCHAR(255) NOT NULL,
            cost NUMERIC(10, 2) NOT NULL,
            buffer_time INTEGER NOT NULL DEFAULT 0,
            comment TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_time_range CHECK (end_time > start_time),
            CONSTRAINT valid_occupancy CHECK (occupied_until >= end_time),
            CONSTRAINT valid_status CHECK (
                status IN ('requested', 'confirmed', 'completed', 'cancelled', 'no_show')
            ),
            CONSTRAINT {NO_DOUBLE_BOOKING} EXCLUDE USING gist (
                provider_id WITH =,
                tstzrange(start_time, occupied_until, '[)') WITH &&
            ) WHERE (status <> 'cancelled')
        );
        "#
    ))
    .execute(pool)
    .await?;

    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_bookings_brand_start ON bookings(brand_id, start_time)",
        "CREATE INDEX IF NOT EXISTS idx_bookings_provider_start ON bookings(provider_id, start_time)",
        "CREATE INDEX IF NOT EXISTS idx_users_brand_id ON users(brand_id)",
        "CREATE INDEX IF NOT EXISTS idx_services_brand_id ON services(brand_id)",
        "CREATE INDEX IF NOT EXISTS idx_service_providers_user_id ON service_providers(user_id)",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
