use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::interval::{self, Interval};

/// Booking lifecycle. The engine only ever writes `Confirmed`; the terminal
/// states are set by administrative flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Requested,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Requested => "requested",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::NoShow => "no_show",
        }
    }

    /// Whether a booking in this state still holds its interval.
    pub fn occupies_time(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "requested" => Ok(BookingStatus::Requested),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "no_show" => Ok(BookingStatus::NoShow),
            other => Err(eyre::eyre!("unknown booking status: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub brand_id: i32,
    pub provider_id: i64,
    pub customer_id: i64,
    pub service_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
    pub provider_name: String,
    pub customer_name: String,
    pub service_name: String,
    pub cost: String,
    /// Buffer snapshot in minutes, taken from the service at write time.
    pub buffer_time: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// `[start, end + buffer)`, the span during which the provider is busy.
    pub fn occupied(&self) -> Interval {
        Interval::new(self.start_time, self.end_time).extended(interval::minutes(self.buffer_time))
    }
}

/// Inbound shape for creating or updating a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    pub provider_id: i64,
    pub customer_id: i64,
    pub service_id: Uuid,
    pub brand_id: i32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Who is placing the booking. Self-service bookings must start in the future.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingOrigin {
    Admin,
    SelfService,
}

/// A validated, denormalized booking row ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub brand_id: i32,
    pub provider_id: i64,
    pub customer_id: i64,
    pub service_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub provider_name: String,
    pub customer_name: String,
    pub service_name: String,
    pub cost: String,
    pub buffer_time: i32,
    pub comment: Option<String>,
}

impl NewBooking {
    pub fn occupied(&self) -> Interval {
        Interval::new(self.start_time, self.end_time).extended(interval::minutes(self.buffer_time))
    }
}

/// Outcome of an atomic check-and-write.
#[derive(Debug, Clone, PartialEq)]
pub enum Reservation {
    Reserved(Booking),
    /// Another booking holds the interval; the id is known unless the
    /// conflict surfaced as a constraint violation.
    Conflict { booking_id: Option<i64> },
    /// The booking being replaced no longer exists.
    Missing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeslotQuery {
    pub brand_id: i32,
    pub date: NaiveDate,
    pub service_id: Uuid,
    pub provider_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeslotsResponse {
    pub timeslots: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRangeQuery {
    pub brand_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}
