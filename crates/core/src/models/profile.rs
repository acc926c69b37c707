use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A staff member who performs services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub brand_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Provider {
    pub fn belongs_to(&self, brand_id: i32) -> bool {
        self.brand_id == Some(brand_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub brand_id: i32,
    pub is_guest: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGuestCustomerRequest {
    pub brand_id: i32,
    pub name: String,
    pub phone_number: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuestCustomerResponse {
    pub customer: Customer,
    /// `true` when a guest with the same name and phone already existed.
    pub existed: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCustomerRequest {
    pub brand_id: i32,
    pub name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}
