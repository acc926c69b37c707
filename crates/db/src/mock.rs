use async_trait::async_trait;
use bookslot_core::interval::Interval;
use bookslot_core::models::{
    booking::{Booking, NewBooking, Reservation},
    profile::{CreateGuestCustomerRequest, Customer, Provider, UpdateCustomerRequest},
    service::Service,
    working_hours::WorkingHours,
};
use bookslot_core::store::BookingStore;
use mockall::mock;
use uuid::Uuid;

// Mock store for handler and coordinator tests
mock! {
    pub Store {}

    #[async_trait]
    impl BookingStore for Store {
        async fn get_booking(&self, id: i64) -> eyre::Result<Option<Booking>>;

        async fn list_bookings_by_range(
            &self,
            brand_id: i32,
            range: Interval,
        ) -> eyre::Result<Vec<Booking>>;

        async fn list_provider_bookings(
            &self,
            provider_id: i64,
            range: Interval,
        ) -> eyre::Result<Vec<Booking>>;

        async fn find_overlapping_booking(
            &self,
            provider_id: i64,
            candidate: Interval,
            exclude: Option<i64>,
        ) -> eyre::Result<Option<i64>>;

        async fn try_reserve(
            &self,
            booking: &NewBooking,
            replacing: Option<i64>,
        ) -> eyre::Result<Reservation>;

        async fn get_working_hours(&self, brand_id: i32) -> eyre::Result<Vec<WorkingHours>>;

        async fn upsert_working_hours(&self, hours: &WorkingHours) -> eyre::Result<WorkingHours>;

        async fn get_service(&self, id: Uuid) -> eyre::Result<Option<Service>>;

        async fn get_user_by_id(&self, id: i64) -> eyre::Result<Option<Provider>>;

        async fn get_customer_by_id(&self, id: i64) -> eyre::Result<Option<Customer>>;

        async fn get_or_create_guest_customer(
            &self,
            guest: &CreateGuestCustomerRequest,
        ) -> eyre::Result<(Customer, bool)>;

        async fn update_customer(
            &self,
            id: i64,
            changes: &UpdateCustomerRequest,
        ) -> eyre::Result<Option<Customer>>;
    }
}

