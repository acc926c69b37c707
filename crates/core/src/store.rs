//! Persistence boundary of the booking engine.
//!
//! Lookups return `Ok(None)` for missing records so callers can tell "not
//! found" apart from a failing store.

use async_trait::async_trait;
use eyre::Result;
use uuid::Uuid;

use crate::interval::Interval;
use crate::models::{
    booking::{Booking, NewBooking, Reservation},
    profile::{CreateGuestCustomerRequest, Customer, Provider, UpdateCustomerRequest},
    service::Service,
    working_hours::WorkingHours,
};

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn get_booking(&self, id: i64) -> Result<Option<Booking>>;

    /// Bookings of a brand starting inside `range`, ordered by start.
    async fn list_bookings_by_range(&self, brand_id: i32, range: Interval) -> Result<Vec<Booking>>;

    /// Time-holding bookings of a provider whose occupied interval
    /// intersects `range`.
    async fn list_provider_bookings(&self, provider_id: i64, range: Interval) -> Result<Vec<Booking>>;

    /// Id of a time-holding booking of `provider_id` whose occupied interval
    /// intersects `candidate`, skipping `exclude`.
    async fn find_overlapping_booking(
        &self,
        provider_id: i64,
        candidate: Interval,
        exclude: Option<i64>,
    ) -> Result<Option<i64>>;

    /// Re-runs the conflict scan and writes `booking` as one atomic step,
    /// serialized per provider. With `replacing` set, the existing row is
    /// updated in place and excluded from the scan.
    async fn try_reserve(&self, booking: &NewBooking, replacing: Option<i64>) -> Result<Reservation>;

    async fn get_working_hours(&self, brand_id: i32) -> Result<Vec<WorkingHours>>;

    async fn upsert_working_hours(&self, hours: &WorkingHours) -> Result<WorkingHours>;

    async fn get_service(&self, id: Uuid) -> Result<Option<Service>>;

    async fn get_user_by_id(&self, id: i64) -> Result<Option<Provider>>;

    async fn get_customer_by_id(&self, id: i64) -> Result<Option<Customer>>;

    /// Returns the brand's guest with the same name and phone, creating it
    /// when absent. The flag is `true` when the guest already existed.
    async fn get_or_create_guest_customer(&self, guest: &CreateGuestCustomerRequest) -> Result<(Customer, bool)>;

    async fn update_customer(&self, id: i64, changes: &UpdateCustomerRequest) -> Result<Option<Customer>>;
}
