use bookslot_core::models::{
    booking::{Booking, BookingStatus},
    profile::{Customer, Provider},
    service::Service,
    working_hours::WorkingHours,
};
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: i64,
    pub brand_id: i32,
    pub provider_id: i64,
    pub customer_id: i64,
    pub service_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub provider_name: String,
    pub customer_name: String,
    pub service_name: String,
    /// NUMERIC cast to text so no precision is lost on the way out.
    pub cost: String,
    pub buffer_time: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbBooking> for Booking {
    type Error = eyre::Report;

    fn try_from(row: DbBooking) -> Result<Self, Self::Error> {
        Ok(Booking {
            id: row.id,
            brand_id: row.brand_id,
            provider_id: row.provider_id,
            customer_id: row.customer_id,
            service_id: row.service_id,
            start_time: row.start_time,
            end_time: row.end_time,
            status: row.status.parse::<BookingStatus>()?,
            provider_name: row.provider_name,
            customer_name: row.customer_name,
            service_name: row.service_name,
            cost: row.cost,
            buffer_time: row.buffer_time,
            comment: row.comment,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbService {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub duration: i32,
    pub buffer_time: Option<i32>,
    pub cost: String,
    pub is_visible: bool,
    pub brand_id: i32,
    pub provider_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbService> for Service {
    fn from(row: DbService) -> Self {
        Service {
            id: row.id,
            title: row.title,
            description: row.description,
            duration: row.duration,
            buffer_time: row.buffer_time,
            cost: row.cost,
            is_visible: row.is_visible,
            brand_id: row.brand_id,
            provider_ids: row.provider_ids,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub brand_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbUser> for Provider {
    fn from(row: DbUser) -> Self {
        Provider {
            id: row.id,
            name: row.name,
            email: row.email,
            brand_id: row.brand_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCustomer {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub brand_id: i32,
    pub is_guest: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbCustomer> for Customer {
    fn from(row: DbCustomer) -> Self {
        Customer {
            id: row.id,
            name: row.name,
            email: row.email,
            phone_number: row.phone_number,
            brand_id: row.brand_id,
            is_guest: row.is_guest,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbWorkingHours {
    pub brand_id: i32,
    pub day_of_week: i32,
    pub open_time: Option<NaiveTime>,
    pub close_time: Option<NaiveTime>,
    pub is_closed: bool,
}

impl From<DbWorkingHours> for WorkingHours {
    fn from(row: DbWorkingHours) -> Self {
        WorkingHours {
            brand_id: row.brand_id,
            day_of_week: row.day_of_week,
            open_time: row.open_time,
            close_time: row.close_time,
            is_closed: row.is_closed,
        }
    }
}
