use std::sync::Arc;

use chrono::{DateTime, Utc};
use eyre::WrapErr;
use tracing::debug;
use uuid::Uuid;

use crate::errors::{BookingError, BookingResult, EntityKind};
use crate::interval::Interval;
use crate::models::service::Service;
use crate::store::BookingStore;

/// Answers whether one exact interval is free on a provider's calendar.
///
/// The candidate is widened by the candidate service's buffer; stored
/// bookings carry their own buffer snapshot.
#[derive(Clone)]
pub struct AvailabilityChecker {
    store: Arc<dyn BookingStore>,
}

impl AvailabilityChecker {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self { store }
    }

    pub async fn is_available(
        &self,
        provider_id: i64,
        service_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BookingResult<bool> {
        let slot = Interval::try_new(start, end)
            .ok_or_else(|| BookingError::validation("End time must be after start time"))?;
        let service = self
            .store
            .get_service(service_id)
            .await
            .wrap_err("error getting service")?
            .ok_or(BookingError::NotFound(EntityKind::Service))?;

        self.is_free(provider_id, &service, slot, None).await
    }

    /// Like [`is_available`](Self::is_available) with the service already
    /// loaded, optionally ignoring one booking (the one being moved).
    pub async fn is_free(
        &self,
        provider_id: i64,
        service: &Service,
        slot: Interval,
        exclude: Option<i64>,
    ) -> BookingResult<bool> {
        let candidate = slot.extended(service.buffer());
        let conflict = self
            .store
            .find_overlapping_booking(provider_id, candidate, exclude)
            .await
            .wrap_err("checking timeslot availability")?;

        if let Some(booking_id) = conflict {
            debug!(provider_id, booking_id, "candidate interval overlaps existing booking");
        }
        Ok(conflict.is_none())
    }
}
