//! # Booking Coordinator
//!
//! Top-level scheduling operations. Every booking write goes through the
//! same sequence:
//!
//! 1. Validate the request (ids, `end > start`, future start for
//!    self-service)
//! 2. Resolve provider, customer and service concurrently
//! 3. Pre-check availability with the resolved service's buffer
//! 4. Hand the denormalized row to the store's atomic `try_reserve`, which
//!    repeats the conflict scan and writes under a per-provider lock
//!
//! This is also the single place where failures are classified into
//! [`BookingError`] variants.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use eyre::WrapErr;
use tracing::{info, warn};

use crate::availability::AvailabilityChecker;
use crate::cache::{self, Cache};
use crate::errors::{BookingError, BookingResult, EntityKind};
use crate::interval::{self, Interval};
use crate::models::{
    booking::{
        Booking, BookingOrigin, BookingRangeQuery, BookingRequest, NewBooking, Reservation,
        TimeslotQuery,
    },
    profile::{CreateGuestCustomerRequest, Customer, GuestCustomerResponse, UpdateCustomerRequest},
    working_hours::{self, WorkingHours, WorkingHoursEntry},
};
use crate::resolver::{EntityResolver, ResolvedEntities};
use crate::slots;
use crate::store::BookingStore;

pub const MAX_COMMENT_LENGTH: usize = 1000;

#[derive(Debug, Clone, Copy)]
pub struct CoordinatorSettings {
    /// Zone in which working hours are published and slots are rendered.
    pub zone: Tz,
    /// Upper bound for each entity lookup during resolution.
    pub lookup_timeout: Duration,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            zone: chrono_tz::Europe::Sofia,
            lookup_timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Clone)]
pub struct BookingCoordinator {
    store: Arc<dyn BookingStore>,
    cache: Option<Arc<dyn Cache>>,
    resolver: EntityResolver,
    availability: AvailabilityChecker,
    zone: Tz,
}

impl BookingCoordinator {
    pub fn new(store: Arc<dyn BookingStore>, cache: Option<Arc<dyn Cache>>, settings: CoordinatorSettings) -> Self {
        Self {
            resolver: EntityResolver::new(store.clone(), cache.clone(), settings.lookup_timeout),
            availability: AvailabilityChecker::new(store.clone()),
            store,
            cache,
            zone: settings.zone,
        }
    }

    pub fn availability(&self) -> &AvailabilityChecker {
        &self.availability
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    pub async fn create_booking(&self, request: BookingRequest, origin: BookingOrigin) -> BookingResult<Booking> {
        let slot = validate_booking_request(&request, origin, Utc::now())?;
        let entities = self
            .resolver
            .resolve(request.brand_id, request.provider_id, request.customer_id, request.service_id)
            .await?;

        let booking = self.reserve(&request, slot, &entities, None).await?;
        info!(
            booking_id = booking.id,
            provider_id = booking.provider_id,
            start = %booking.start_time,
            "booking created"
        );
        Ok(booking)
    }

    /// Moves or edits an existing booking. Its own row is ignored by the
    /// conflict scan. Cancelled bookings cannot be changed.
    pub async fn update_booking(
        &self,
        booking_id: i64,
        request: BookingRequest,
        origin: BookingOrigin,
    ) -> BookingResult<Booking> {
        let slot = validate_booking_request(&request, origin, Utc::now())?;
        let existing = self.get_booking(request.brand_id, booking_id).await?;
        if !existing.status.occupies_time() {
            return Err(BookingError::validation(format!(
                "Booking {booking_id} is {} and cannot be changed",
                existing.status
            )));
        }

        let entities = self
            .resolver
            .resolve(request.brand_id, request.provider_id, request.customer_id, request.service_id)
            .await?;

        let booking = self.reserve(&request, slot, &entities, Some(booking_id)).await?;
        info!(booking_id, provider_id = booking.provider_id, "booking updated");
        Ok(booking)
    }

    async fn reserve(
        &self,
        request: &BookingRequest,
        slot: Interval,
        entities: &ResolvedEntities,
        replacing: Option<i64>,
    ) -> BookingResult<Booking> {
        let free = self
            .availability
            .is_free(request.provider_id, &entities.service, slot, replacing)
            .await?;
        if !free {
            return Err(BookingError::TimeslotConflict);
        }

        let row = denormalize(request, entities);
        let reservation = self
            .store
            .try_reserve(&row, replacing)
            .await
            .wrap_err("reserving timeslot")?;

        match reservation {
            Reservation::Reserved(booking) => Ok(booking),
            Reservation::Conflict { booking_id } => {
                warn!(
                    provider_id = request.provider_id,
                    conflicting = ?booking_id,
                    "timeslot taken between availability check and write"
                );
                Err(BookingError::TimeslotConflict)
            }
            Reservation::Missing => Err(BookingError::NotFound(EntityKind::Booking)),
        }
    }

    pub async fn get_booking(&self, brand_id: i32, booking_id: i64) -> BookingResult<Booking> {
        self.store
            .get_booking(booking_id)
            .await
            .wrap_err("error getting booking")?
            .filter(|booking| booking.brand_id == brand_id)
            .ok_or(BookingError::NotFound(EntityKind::Booking))
    }

    /// Bookings of a brand starting between local midnight of `start_date`
    /// and the end of `end_date`.
    pub async fn list_bookings(&self, query: &BookingRangeQuery) -> BookingResult<Vec<Booking>> {
        require_positive("brand_id", i64::from(query.brand_id))?;
        if query.end_date < query.start_date {
            return Err(BookingError::validation("end_date must not be before start_date"));
        }

        let first = interval::local_day(query.start_date, self.zone);
        let last = interval::local_day(query.end_date, self.zone);
        let (Some(first), Some(last)) = (first, last) else {
            return Err(BookingError::validation("Date range cannot be represented"));
        };

        let bookings = self
            .store
            .list_bookings_by_range(query.brand_id, Interval::new(first.start, last.end))
            .await
            .wrap_err("listing bookings")?;
        Ok(bookings)
    }

    /// Bookable `HH:MM` start times for one provider, service and day.
    pub async fn available_slots(&self, query: &TimeslotQuery) -> BookingResult<Vec<String>> {
        let now = Utc::now();
        require_positive("brand_id", i64::from(query.brand_id))?;
        require_positive("provider_id", query.provider_id)?;
        if query.date < interval::today_in(self.zone, now) {
            return Err(BookingError::validation("Date must not be in the past"));
        }

        let service = self
            .store
            .get_service(query.service_id)
            .await
            .wrap_err("error getting service")?
            .filter(|service| service.brand_id == query.brand_id)
            .ok_or(BookingError::NotFound(EntityKind::Service))?;
        if !service.is_performed_by(query.provider_id) {
            return Err(BookingError::validation(format!(
                "Provider {} does not perform service {}",
                query.provider_id, service.id
            )));
        }

        let all_hours = self
            .store
            .get_working_hours(query.brand_id)
            .await
            .wrap_err("error getting working hours")?;
        let day = working_hours::day_of_week(query.date);
        let day_hours = all_hours.iter().find(|hours| hours.day_of_week == day);

        let Some(whole_day) = interval::local_day(query.date, self.zone) else {
            return Ok(Vec::new());
        };
        let bookings = self
            .store
            .list_provider_bookings(query.provider_id, whole_day)
            .await
            .wrap_err("error getting provider bookings")?;

        let starts = slots::generate_slots(day_hours, &service, &bookings, query.date, self.zone, now);
        Ok(slots::format_slots(&starts, self.zone))
    }

    pub async fn create_guest_customer(
        &self,
        request: &CreateGuestCustomerRequest,
    ) -> BookingResult<GuestCustomerResponse> {
        require_positive("brand_id", i64::from(request.brand_id))?;
        if request.name.trim().is_empty() {
            return Err(BookingError::validation("name is required"));
        }
        if request.phone_number.trim().is_empty() {
            return Err(BookingError::validation("phone_number is required"));
        }

        let (customer, existed) = self
            .store
            .get_or_create_guest_customer(request)
            .await
            .wrap_err("creating guest customer")?;
        Ok(GuestCustomerResponse { customer, existed })
    }

    /// Updates a customer's profile and overwrites its cache entry so the
    /// next resolution reads the new values, even if a concurrent lookup is
    /// about to fill the cache with the old row.
    pub async fn update_customer_profile(
        &self,
        customer_id: i64,
        changes: &UpdateCustomerRequest,
    ) -> BookingResult<Customer> {
        if changes.name.as_deref().is_some_and(|name| name.trim().is_empty()) {
            return Err(BookingError::validation("name must not be empty"));
        }

        let current = self
            .store
            .get_customer_by_id(customer_id)
            .await
            .wrap_err("error getting customer")?;
        if !current.is_some_and(|customer| customer.brand_id == changes.brand_id) {
            return Err(BookingError::NotFound(EntityKind::Customer));
        }

        let updated = self
            .store
            .update_customer(customer_id, changes)
            .await
            .wrap_err("updating customer")?
            .ok_or(BookingError::NotFound(EntityKind::Customer))?;

        if let Some(cache) = &self.cache {
            let key = cache::customer_key(customer_id);
            if !cache::set_json(cache.as_ref(), &key, &updated).await {
                cache.delete(&key).await;
            }
        }
        Ok(updated)
    }

    pub async fn set_working_hours(
        &self,
        brand_id: i32,
        entries: &[WorkingHoursEntry],
    ) -> BookingResult<Vec<WorkingHours>> {
        require_positive("brand_id", i64::from(brand_id))?;
        validate_working_hours(entries)?;

        let mut saved = Vec::with_capacity(entries.len());
        for entry in entries {
            let hours = WorkingHours {
                brand_id,
                day_of_week: entry.day_of_week,
                open_time: entry.open_time,
                close_time: entry.close_time,
                is_closed: entry.is_closed,
            };
            let stored = self
                .store
                .upsert_working_hours(&hours)
                .await
                .wrap_err_with(|| format!("saving working hours for day {}", entry.day_of_week))?;
            saved.push(stored);
        }
        info!(brand_id, days = saved.len(), "working hours updated");
        Ok(saved)
    }
}

/// Checks the structural rules of a booking request and returns its
/// interval.
pub fn validate_booking_request(
    request: &BookingRequest,
    origin: BookingOrigin,
    now: DateTime<Utc>,
) -> BookingResult<Interval> {
    require_positive("brand_id", i64::from(request.brand_id))?;
    require_positive("provider_id", request.provider_id)?;
    require_positive("customer_id", request.customer_id)?;
    if request.service_id.is_nil() {
        return Err(BookingError::validation("service_id is required"));
    }
    if request
        .comment
        .as_deref()
        .is_some_and(|comment| comment.chars().count() > MAX_COMMENT_LENGTH)
    {
        return Err(BookingError::validation(format!(
            "comment must be at most {MAX_COMMENT_LENGTH} characters"
        )));
    }

    let slot = Interval::try_new(request.start, request.end)
        .ok_or_else(|| BookingError::validation("End time must be after start time"))?;
    if origin == BookingOrigin::SelfService && slot.start <= now {
        return Err(BookingError::validation("Start time must be in the future"));
    }
    Ok(slot)
}

pub fn validate_working_hours(entries: &[WorkingHoursEntry]) -> BookingResult<()> {
    let mut seen = HashSet::new();
    for entry in entries {
        if !(0..=6).contains(&entry.day_of_week) {
            return Err(BookingError::validation(format!(
                "day_of_week must be between 0 and 6, got {}",
                entry.day_of_week
            )));
        }
        if !seen.insert(entry.day_of_week) {
            return Err(BookingError::validation(format!(
                "day_of_week {} listed more than once",
                entry.day_of_week
            )));
        }
        if entry.is_closed {
            continue;
        }
        match (entry.open_time, entry.close_time) {
            (Some(open), Some(close)) if open < close => {}
            (Some(_), Some(_)) => {
                return Err(BookingError::validation(format!(
                    "open_time must be before close_time on day {}",
                    entry.day_of_week
                )));
            }
            _ => {
                return Err(BookingError::validation(format!(
                    "open_time and close_time are required on open day {}",
                    entry.day_of_week
                )));
            }
        }
    }
    Ok(())
}

fn require_positive(field: &str, value: i64) -> BookingResult<()> {
    if value <= 0 {
        return Err(BookingError::validation(format!("{field} must be a positive id")));
    }
    Ok(())
}

fn denormalize(request: &BookingRequest, entities: &ResolvedEntities) -> NewBooking {
    NewBooking {
        brand_id: request.brand_id,
        provider_id: request.provider_id,
        customer_id: request.customer_id,
        service_id: request.service_id,
        start_time: request.start,
        end_time: request.end,
        provider_name: entities.provider.name.clone(),
        customer_name: entities.customer.name.clone(),
        service_name: entities.service.title.clone(),
        cost: entities.service.cost.clone(),
        buffer_time: entities.service.buffer_time.unwrap_or(0).max(0),
        comment: request.comment.clone().filter(|comment| !comment.is_empty()),
    }
}
