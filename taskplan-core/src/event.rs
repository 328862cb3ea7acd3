//! Provider event records.
//!
//! This is the wire shape of a calendar provider's event resource, kept
//! close to the provider's JSON so that a fetched event can be modified and
//! written back without losing fields this crate does not model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A calendar event as returned by the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderEvent {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// "confirmed", "tentative" or "cancelled"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<EventTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<EventTime>,
    /// Everything else the provider sent (etag, attendees, reminders...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProviderEvent {
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    pub fn is_cancelled(&self) -> bool {
        self.status.as_deref() == Some("cancelled")
    }

    /// Start date used for ordering: the date-time string when present,
    /// otherwise the all-day date. ISO strings of the same shape sort
    /// lexically.
    pub fn start_key(&self) -> &str {
        self.start
            .as_ref()
            .and_then(|s| s.date_time.as_deref().or(s.date.as_deref()))
            .unwrap_or("")
    }
}

/// Start or end of an event: exactly one of `date_time` / `date` is expected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl EventTime {
    pub fn date_time(value: impl Into<String>) -> Self {
        EventTime {
            date_time: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn date(value: impl Into<String>) -> Self {
        EventTime {
            date: Some(value.into()),
            ..Default::default()
        }
    }

    pub fn in_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }
}
