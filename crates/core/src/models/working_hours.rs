use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Opening hours of a brand for one day of the week.
///
/// `day_of_week` counts from Sunday (0) to Saturday (6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkingHours {
    pub brand_id: i32,
    pub day_of_week: i32,
    #[serde(with = "clock_time")]
    pub open_time: Option<NaiveTime>,
    #[serde(with = "clock_time")]
    pub close_time: Option<NaiveTime>,
    pub is_closed: bool,
}

impl WorkingHours {
    /// The open/close pair, or `None` when the day cannot be booked.
    pub fn window(&self) -> Option<(NaiveTime, NaiveTime)> {
        if self.is_closed {
            return None;
        }
        match (self.open_time, self.close_time) {
            (Some(open), Some(close)) => Some((open, close)),
            _ => None,
        }
    }
}

pub fn day_of_week(date: NaiveDate) -> i32 {
    date.weekday().num_days_from_sunday() as i32
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingHoursEntry {
    pub day_of_week: i32,
    #[serde(default, with = "clock_time")]
    pub open_time: Option<NaiveTime>,
    #[serde(default, with = "clock_time")]
    pub close_time: Option<NaiveTime>,
    #[serde(default)]
    pub is_closed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateWorkingHoursRequest {
    pub working_hours: Vec<WorkingHoursEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingHoursResponse {
    pub brand_id: i32,
    pub working_hours: Vec<WorkingHours>,
}

/// `HH:MM` wall-clock times, with empty strings and nulls read as absent.
mod clock_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(time) => serializer.serialize_str(&time.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => NaiveTime::parse_from_str(text, FORMAT)
                .map(Some)
                .map_err(|e| serde::de::Error::custom(format!("invalid time {text:?}: {e}"))),
        }
    }
}
