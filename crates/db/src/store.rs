//! Postgres implementation of [`BookingStore`].
//!
//! `try_reserve` serializes writers per provider with a row lock on the
//! provider's `users` row, re-runs the overlap scan inside the same
//! transaction and only then writes. The `bookings` exclusion constraint
//! backs this up; a violation of it is reported as a conflict rather than
//! an error.

use async_trait::async_trait;
use bookslot_core::interval::Interval;
use bookslot_core::models::{
    booking::{Booking, NewBooking, Reservation},
    profile::{CreateGuestCustomerRequest, Customer, Provider, UpdateCustomerRequest},
    service::Service,
    working_hours::WorkingHours,
};
use bookslot_core::store::BookingStore;
use eyre::{Result, WrapErr};
use tracing::debug;
use uuid::Uuid;

use crate::repositories::{booking, profile, service, working_hours};
use crate::DbPool;

/// SQLSTATE for `exclusion_violation`.
const EXCLUSION_VIOLATION: &str = "23P01";

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Whether `report` wraps a Postgres exclusion constraint violation.
pub fn is_exclusion_violation(report: &eyre::Report) -> bool {
    match report.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db_error)) => db_error.code().as_deref() == Some(EXCLUSION_VIOLATION),
        _ => false,
    }
}

#[async_trait]
impl BookingStore for PgStore {
    async fn get_booking(&self, id: i64) -> Result<Option<Booking>> {
        booking::get_booking_by_id(&self.pool, id)
            .await?
            .map(Booking::try_from)
            .transpose()
    }

    async fn list_bookings_by_range(&self, brand_id: i32, range: Interval) -> Result<Vec<Booking>> {
        booking::get_bookings_by_brand(&self.pool, brand_id, range.start, range.end)
            .await?
            .into_iter()
            .map(Booking::try_from)
            .collect()
    }

    async fn list_provider_bookings(&self, provider_id: i64, range: Interval) -> Result<Vec<Booking>> {
        booking::get_provider_bookings(&self.pool, provider_id, range.start, range.end)
            .await?
            .into_iter()
            .map(Booking::try_from)
            .collect()
    }

    async fn find_overlapping_booking(
        &self,
        provider_id: i64,
        candidate: Interval,
        exclude: Option<i64>,
    ) -> Result<Option<i64>> {
        booking::find_overlapping(&self.pool, provider_id, candidate.start, candidate.end, exclude).await
    }

    async fn try_reserve(&self, row: &NewBooking, replacing: Option<i64>) -> Result<Reservation> {
        let occupied = row.occupied();
        let mut tx = self.pool.begin().await.wrap_err("starting reservation")?;

        if !booking::lock_provider(&mut *tx, row.provider_id).await? {
            // No provider row means the foreign key would reject the write.
            eyre::bail!("provider {} does not exist", row.provider_id);
        }

        let conflict =
            booking::find_overlapping(&mut *tx, row.provider_id, occupied.start, occupied.end, replacing).await?;
        if let Some(booking_id) = conflict {
            tx.rollback().await?;
            debug!(provider_id = row.provider_id, booking_id, "reservation lost to existing booking");
            return Ok(Reservation::Conflict {
                booking_id: Some(booking_id),
            });
        }

        let written = match replacing {
            None => booking::insert_booking(&mut *tx, row).await.map(Some),
            Some(id) => booking::update_booking(&mut *tx, id, row).await,
        };

        let written = match written {
            Ok(written) => written,
            Err(e) if is_exclusion_violation(&e) => {
                debug!(provider_id = row.provider_id, "reservation rejected by exclusion constraint");
                return Ok(Reservation::Conflict { booking_id: None });
            }
            Err(e) => return Err(e),
        };

        let Some(written) = written else {
            tx.rollback().await?;
            return Ok(Reservation::Missing);
        };

        tx.commit().await.wrap_err("committing reservation")?;
        Ok(Reservation::Reserved(Booking::try_from(written)?))
    }

    async fn get_working_hours(&self, brand_id: i32) -> Result<Vec<WorkingHours>> {
        let hours = working_hours::get_working_hours_by_brand(&self.pool, brand_id).await?;
        Ok(hours.into_iter().map(WorkingHours::from).collect())
    }

    async fn upsert_working_hours(&self, hours: &WorkingHours) -> Result<WorkingHours> {
        let saved = working_hours::upsert_working_hours(&self.pool, hours).await?;
        Ok(saved.into())
    }

    async fn get_service(&self, id: Uuid) -> Result<Option<Service>> {
        let found = service::get_service_by_id(&self.pool, id).await?;
        Ok(found.map(Service::from))
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<Provider>> {
        let found = profile::get_user_by_id(&self.pool, id).await?;
        Ok(found.map(Provider::from))
    }

    async fn get_customer_by_id(&self, id: i64) -> Result<Option<Customer>> {
        let found = profile::get_customer_by_id(&self.pool, id).await?;
        Ok(found.map(Customer::from))
    }

    async fn get_or_create_guest_customer(&self, guest: &CreateGuestCustomerRequest) -> Result<(Customer, bool)> {
        let (customer, existed) = profile::get_or_create_guest_customer(&self.pool, guest).await?;
        Ok((customer.into(), existed))
    }

    async fn update_customer(&self, id: i64, changes: &UpdateCustomerRequest) -> Result<Option<Customer>> {
        let updated = profile::update_customer(&self.pool, id, changes).await?;
        Ok(updated.map(Customer::from))
    }
}
