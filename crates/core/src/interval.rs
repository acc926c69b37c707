//! Half-open time intervals and the clock arithmetic around them.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// A `[start, end)` span in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Returns `None` unless `end > start`.
    pub fn try_new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (end > start).then_some(Self { start, end })
    }

    pub fn starting_at(start: DateTime<Utc>, length: Duration) -> Self {
        Self { start, end: start + length }
    }

    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Pushes the end out by `by`, as a buffer does.
    pub fn extended(&self, by: Duration) -> Self {
        Self {
            start: self.start,
            end: self.end + by,
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// The part of `self` inside `window`, if any.
    pub fn clip(&self, window: &Interval) -> Option<Interval> {
        Interval::try_new(self.start.max(window.start), self.end.min(window.end))
    }
}

pub fn minutes(value: i32) -> Duration {
    Duration::minutes(i64::from(value.max(0)))
}

pub fn buffer_minutes(buffer: Option<i32>) -> Duration {
    buffer.map(minutes).unwrap_or_else(Duration::zero)
}

pub fn slot_duration(duration: i32, buffer: Option<i32>) -> Duration {
    minutes(duration) + buffer_minutes(buffer)
}

/// Resolves a local wall-clock time to UTC. Ambiguous times (DST fall-back)
/// take the earlier instant; times skipped by a DST jump have no instant.
pub fn local_to_utc(day: NaiveDate, time: NaiveTime, zone: Tz) -> Option<DateTime<Utc>> {
    match zone.from_local_datetime(&day.and_time(time)) {
        LocalResult::Single(at) => Some(at.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Some(earliest.with_timezone(&Utc)),
        LocalResult::None => None,
    }
}

/// Opening hours of `day` in `zone`, or `None` when they do not form a
/// forward interval.
pub fn business_window(day: NaiveDate, open: NaiveTime, close: NaiveTime, zone: Tz) -> Option<Interval> {
    let open = local_to_utc(day, open, zone)?;
    let close = local_to_utc(day, close, zone)?;
    Interval::try_new(open, close)
}

/// First instant of `day` in `zone`. Where clocks jump forward at midnight
/// the day starts at the first wall-clock minute that exists.
pub fn start_of_day(day: NaiveDate, zone: Tz) -> Option<DateTime<Utc>> {
    let mut time = NaiveTime::MIN;
    loop {
        if let Some(at) = local_to_utc(day, time, zone) {
            return Some(at);
        }
        let (next, wrapped) = time.overflowing_add_signed(Duration::minutes(1));
        if wrapped != 0 {
            return None;
        }
        time = next;
    }
}

/// The whole calendar `day` in `zone`, from its first instant to the first
/// instant of the next day.
pub fn local_day(day: NaiveDate, zone: Tz) -> Option<Interval> {
    let start = start_of_day(day, zone)?;
    let end = start_of_day(day.succ_opt()?, zone)?;
    Interval::try_new(start, end)
}

/// Renders an instant as `HH:MM` on the wall clock of `zone`.
pub fn format_clock(at: DateTime<Utc>, zone: Tz) -> String {
    at.with_timezone(&zone).format("%H:%M").to_string()
}

/// Today's calendar date on the wall clock of `zone`.
pub fn today_in(zone: Tz, now: DateTime<Utc>) -> NaiveDate {
    now.with_timezone(&zone).date_naive()
}
