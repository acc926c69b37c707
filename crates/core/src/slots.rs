//! # Slot Generation
//!
//! Enumerates the bookable start times of one provider on one day.
//!
//! 1. Derive the day's opening window from the brand's working hours
//! 2. Block each existing booking's occupied interval (buffer included)
//! 3. Walk quarter-hour candidates from opening time, keeping those whose
//!    full slot (service duration plus buffer) ends by closing time, does
//!    not start in the past, and misses every blocked period
//!
//! The step is fixed and independent of the service length, so offered
//! starts always land on quarter hours relative to opening time.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::interval::{self, Interval};
use crate::models::{booking::Booking, service::Service, working_hours::WorkingHours};

pub const SLOT_STEP_MINUTES: i64 = 15;

pub fn slot_step() -> Duration {
    Duration::minutes(SLOT_STEP_MINUTES)
}

/// Occupied intervals of the bookings that still hold their time.
pub fn blocked_periods(bookings: &[Booking]) -> Vec<Interval> {
    let mut blocked: Vec<Interval> = bookings
        .iter()
        .filter(|booking| booking.status.occupies_time())
        .map(Booking::occupied)
        .collect();
    blocked.sort_by_key(|period| period.start);
    blocked
}

/// Start times (UTC) of every bookable slot for `service` on `day`.
///
/// Returns an empty list for closed days, days without hours, and services
/// longer than the opening window.
pub fn generate_slots(
    working_hours: Option<&WorkingHours>,
    service: &Service,
    existing_bookings: &[Booking],
    day: NaiveDate,
    zone: Tz,
    now: DateTime<Utc>,
) -> Vec<DateTime<Utc>> {
    let Some((open, close)) = working_hours.and_then(WorkingHours::window) else {
        return Vec::new();
    };
    let Some(window) = interval::business_window(day, open, close, zone) else {
        return Vec::new();
    };

    let slot_length = service.slot_duration();
    if slot_length <= Duration::zero() {
        return Vec::new();
    }

    let blocked = blocked_periods(existing_bookings);
    let mut slots = Vec::new();
    let mut candidate_start = window.start;

    while candidate_start < window.end {
        let candidate = Interval::starting_at(candidate_start, slot_length);
        if candidate.end > window.end {
            break;
        }

        let in_past = candidate.start < now;
        if !in_past && !blocked.iter().any(|period| period.overlaps(&candidate)) {
            slots.push(candidate.start);
        }

        candidate_start += slot_step();
    }

    slots
}

/// Renders slot starts as `HH:MM` in the brand's zone.
pub fn format_slots(slots: &[DateTime<Utc>], zone: Tz) -> Vec<String> {
    slots.iter().map(|slot| interval::format_clock(*slot, zone)).collect()
}
