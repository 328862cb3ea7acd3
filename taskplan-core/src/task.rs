//! Provider-neutral task types.
//!
//! A `Task` is never stored anywhere: it is re-derived from the provider's
//! current event state on every read.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A to-do item backed by a calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Event id assigned by the calendar provider.
    pub id: String,
    pub title: String,
    pub date: NaiveDate,
    /// `None` for all-day tasks.
    #[serde(default, with = "opt_hms")]
    pub time: Option<NaiveTime>,
    /// Free text with the completion marker stripped.
    pub description: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
}

impl Task {
    pub fn is_all_day(&self) -> bool {
        self.time.is_none()
    }
}

/// Payload for creating or replacing a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub date: NaiveDate,
    #[serde(default, with = "opt_hms")]
    pub time: Option<NaiveTime>,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        NewTask {
            title: title.into(),
            date,
            time: None,
            description: None,
        }
    }

    pub fn at(mut self, time: NaiveTime) -> Self {
        self.time = Some(time);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// A blank title would be stored but never listed again.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidTitle);
        }
        Ok(())
    }
}

/// A listing of tasks, as returned by the range and day queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    pub tasks: Vec<Task>,
    pub count: usize,
}

impl From<Vec<Task>> for TaskList {
    fn from(tasks: Vec<Task>) -> Self {
        let count = tasks.len();
        TaskList { tasks, count }
    }
}

/// Parse YYYY-MM-DD.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| Error::InvalidDate(s.to_string()))
}

/// Parse HH:MM or HH:MM:SS (fractional seconds are dropped).
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map(truncate_subsec)
        .map_err(|_| Error::InvalidTime(s.to_string()))
}

pub(crate) fn truncate_subsec(t: NaiveTime) -> NaiveTime {
    use chrono::Timelike;
    t.with_nanosecond(0).unwrap_or(t)
}

/// Serde adapter for `Option<NaiveTime>` as `HH:MM:SS`, accepting `HH:MM` on input.
mod opt_hms {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => s.serialize_str(&t.format("%H:%M:%S").to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => super::parse_time(s)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
