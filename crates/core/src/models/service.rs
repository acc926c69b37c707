use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::interval;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Minutes.
    pub duration: i32,
    /// Minutes, absent means zero.
    pub buffer_time: Option<i32>,
    pub cost: String,
    pub is_visible: bool,
    pub brand_id: i32,
    pub provider_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Service {
    pub fn duration(&self) -> Duration {
        interval::minutes(self.duration)
    }

    pub fn buffer(&self) -> Duration {
        interval::buffer_minutes(self.buffer_time)
    }

    /// Length of time a slot of this service occupies, buffer included.
    pub fn slot_duration(&self) -> Duration {
        interval::slot_duration(self.duration, self.buffer_time)
    }

    pub fn is_performed_by(&self, provider_id: i64) -> bool {
        self.provider_ids.contains(&provider_id)
    }
}
