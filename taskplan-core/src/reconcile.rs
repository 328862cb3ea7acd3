//! Mapping between provider event records and tasks.
//!
//! Completion has no native field on the provider side, so it is encoded as
//! a reserved marker at the start of the event description. Decoding always
//! strips the marker; encoding only ever adds it once.
//!
//! Timed events carry an offset (`...T09:00:00+01:00`). By default the
//! offset is discarded rather than applied, so a task shows the wall-clock
//! time the provider wrote. Converting here would shift times twice when
//! the provider and the caller already agree on a local zone.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::{COMPLETED_MARKER, DEFAULT_TASK_DURATION_HOURS};
use crate::error::{Error, Result};
use crate::event::{EventTime, ProviderEvent};
use crate::task::{NewTask, Task, truncate_subsec};

/// How `start.dateTime` values are read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampParsing {
    /// Cut the value at the first `+`, `-` or `Z` after the `T` and read
    /// what is left. Malformed offsets are ignored.
    #[default]
    Permissive,
    /// Require a well-formed RFC 3339 value (or an offset-less local
    /// date-time). The wall-clock components are kept as written.
    Strict,
}

/// Stateless converter between `ProviderEvent`s and `Task`s.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskReconciler {
    parsing: TimestampParsing,
}

impl TaskReconciler {
    pub fn new(parsing: TimestampParsing) -> Self {
        TaskReconciler { parsing }
    }

    pub fn parsing(&self) -> TimestampParsing {
        self.parsing
    }

    /// Decode a single provider event into a task.
    pub fn decode(&self, event: &ProviderEvent) -> Result<Task> {
        let title = match event.summary.as_deref() {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => return Err(Error::MissingTitle(event.id.clone())),
        };

        let start = event
            .start
            .as_ref()
            .ok_or_else(|| Error::MissingStart(event.id.clone()))?;
        let (date, time) = self.parse_start(&event.id, start)?;

        let raw_description = event.description_or_empty();

        Ok(Task {
            id: event.id.clone(),
            title,
            date,
            time,
            description: strip_marker(raw_description),
            is_completed: is_marked_completed(raw_description),
        })
    }

    /// Decode a listing. Partial records (no title, no start) are skipped
    /// silently; a record with an unreadable timestamp is dropped on its own
    /// and the rest of the batch is still returned.
    pub fn decode_all<'a, I>(&self, events: I) -> Vec<Task>
    where
        I: IntoIterator<Item = &'a ProviderEvent>,
    {
        events
            .into_iter()
            .filter_map(|event| match self.decode(event) {
                Ok(task) => Some(task),
                Err(e) if e.is_partial_record() => {
                    debug!(event_id = %event.id, "skipping event: {e}");
                    None
                }
                Err(e) => {
                    warn!(event_id = %event.id, "dropping event: {e}");
                    None
                }
            })
            .collect()
    }

    /// Date and optional time-of-day of an event start.
    pub fn parse_start(
        &self,
        id: &str,
        start: &EventTime,
    ) -> Result<(NaiveDate, Option<NaiveTime>)> {
        if let Some(value) = start.date_time.as_deref() {
            let parsed = match self.parsing {
                TimestampParsing::Permissive => parse_wall_clock(value),
                TimestampParsing::Strict => parse_strict(value),
            };
            return parsed.ok_or_else(|| Error::InvalidTimestamp {
                id: id.to_string(),
                value: value.to_string(),
            });
        }

        if let Some(value) = start.date.as_deref() {
            let date = parse_iso_date(value).ok_or_else(|| Error::InvalidTimestamp {
                id: id.to_string(),
                value: value.to_string(),
            })?;
            return Ok((date, None));
        }

        Err(Error::MissingStart(id.to_string()))
    }
}

/// Whether a raw description carries the completion marker.
pub fn is_marked_completed(description: &str) -> bool {
    description.contains(COMPLETED_MARKER)
}

/// Description with the marker removed and whitespace trimmed; empty is `None`.
pub fn strip_marker(description: &str) -> Option<String> {
    let clean = description.replace(COMPLETED_MARKER, "");
    let clean = clean.trim();
    if clean.is_empty() {
        None
    } else {
        Some(clean.to_string())
    }
}

/// Mark an event as done by prepending the marker to its description.
/// Applying this to an already-marked event returns it unchanged.
pub fn encode_completion(mut event: ProviderEvent) -> ProviderEvent {
    let description = event.description_or_empty();
    if !is_marked_completed(description) {
        event.description = Some(format!("{COMPLETED_MARKER} {description}"));
    }
    event
}

/// Build the provider record for a new (or fully replaced) task.
///
/// Timed tasks occupy a one hour slot in `time_zone`. All-day tasks end on
/// the following day since provider end dates are exclusive.
pub fn encode_new(task: &NewTask, time_zone: &str) -> ProviderEvent {
    let (start, end) = match task.time {
        Some(time) => {
            let start = NaiveDateTime::new(task.date, truncate_subsec(time));
            let end = start + Duration::hours(DEFAULT_TASK_DURATION_HOURS);
            (
                EventTime::date_time(format_local(start)).in_zone(time_zone),
                EventTime::date_time(format_local(end)).in_zone(time_zone),
            )
        }
        None => {
            let end = task.date.succ_opt().unwrap_or(task.date);
            (
                EventTime::date(task.date.to_string()),
                EventTime::date(end.to_string()),
            )
        }
    };

    ProviderEvent {
        summary: Some(task.title.clone()),
        description: Some(task.description.clone().unwrap_or_default()),
        start: Some(start),
        end: Some(end),
        ..Default::default()
    }
}

fn format_local(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn parse_hms(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M:%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .ok()
        .map(truncate_subsec)
}

/// Read the literal date and time written before any offset suffix.
fn parse_wall_clock(value: &str) -> Option<(NaiveDate, Option<NaiveTime>)> {
    let Some((date_part, rest)) = value.split_once('T') else {
        return parse_iso_date(value).map(|d| (d, None));
    };

    let time_end = rest.find(['+', '-', 'Z']).unwrap_or(rest.len());
    let date = parse_iso_date(date_part)?;
    let time = parse_hms(&rest[..time_end])?;
    Some((date, Some(time)))
}

fn parse_strict(value: &str) -> Option<(NaiveDate, Option<NaiveTime>)> {
    if !value.contains('T') {
        return parse_iso_date(value).map(|d| (d, None));
    }

    let local = DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.naive_local())
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()?;
    Some((local.date(), Some(truncate_subsec(local.time()))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    fn timed(id: &str, summary: &str, description: &str, date_time: &str) -> ProviderEvent {
        ProviderEvent {
            id: id.into(),
            summary: Some(summary.into()),
            description: Some(description.into()),
            start: Some(EventTime::date_time(date_time)),
            ..Default::default()
        }
    }

    #[test]
    fn test_decode_standup_discards_offset() {
        let event = timed("e1", "Standup", "", "2024-03-01T09:00:00+01:00");

        let task = TaskReconciler::default().decode(&event).unwrap();

        assert_eq!(
            task,
            Task {
                id: "e1".into(),
                title: "Standup".into(),
                date: ymd(2024, 3, 1),
                time: Some(hms(9, 0, 0)),
                description: None,
                is_completed: false,
            }
        );
    }

    #[test]
    fn test_decode_keeps_wall_clock_for_every_offset_form() {
        let reconciler = TaskReconciler::default();
        for value in [
            "2024-03-01T23:30:00Z",
            "2024-03-01T23:30:00-08:00",
            "2024-03-01T23:30:00+05:30",
            "2024-03-01T23:30:00.000Z",
            "2024-03-01T23:30:00",
        ] {
            let task = reconciler.decode(&timed("x", "t", "", value)).unwrap();
            assert_eq!(task.date, ymd(2024, 3, 1), "date for {value}");
            assert_eq!(task.time, Some(hms(23, 30, 0)), "time for {value}");
        }
    }

    #[test]
    fn test_strict_agrees_with_permissive_on_valid_input() {
        let strict = TaskReconciler::new(TimestampParsing::Strict);
        let task = strict
            .decode(&timed("e1", "Standup", "", "2024-03-01T09:00:00+01:00"))
            .unwrap();
        assert_eq!(task.date, ymd(2024, 3, 1));
        assert_eq!(task.time, Some(hms(9, 0, 0)));

        let task = strict
            .decode(&timed("e2", "Late", "", "2024-03-01T23:59:59Z"))
            .unwrap();
        assert_eq!(task.time, Some(hms(23, 59, 59)));
    }

    #[test]
    fn test_strict_rejects_broken_offset_permissive_ignores_it() {
        let event = timed("bad", "Broken", "", "2024-03-01T09:00:00+bogus");

        let err = TaskReconciler::new(TimestampParsing::Strict)
            .decode(&event)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidTimestamp { ref id, .. } if id == "bad"));

        let task = TaskReconciler::default().decode(&event).unwrap();
        assert_eq!(task.time, Some(hms(9, 0, 0)));
    }

    #[test]
    fn test_decode_all_day_has_no_time() {
        let event = ProviderEvent {
            id: "d1".into(),
            summary: Some("Holiday".into()),
            start: Some(EventTime::date("2024-03-05")),
            ..Default::default()
        };

        let task = TaskReconciler::default().decode(&event).unwrap();
        assert_eq!(task.date, ymd(2024, 3, 5));
        assert_eq!(task.time, None);
        assert!(task.is_all_day());
    }

    #[test]
    fn test_date_time_without_separator_is_all_day() {
        let task = TaskReconciler::default()
            .decode(&timed("x", "t", "", "2024-03-05"))
            .unwrap();
        assert_eq!(task.time, None);
    }

    #[test]
    fn test_decode_missing_description_is_none() {
        let mut event = timed("x", "t", "", "2024-03-01T10:00:00Z");
        event.description = None;

        let task = TaskReconciler::default().decode(&event).unwrap();
        assert_eq!(task.description, None);
        assert!(!task.is_completed);
    }

    #[test]
    fn test_decode_strips_marker_anywhere() {
        let event = timed("x", "t", "  bring slides [COMPLETED] ", "2024-03-01T10:00:00Z");

        let task = TaskReconciler::default().decode(&event).unwrap();
        assert!(task.is_completed);
        assert_eq!(task.description.as_deref(), Some("bring slides"));
    }

    #[test]
    fn test_decode_rejects_partial_records() {
        let reconciler = TaskReconciler::default();

        let mut no_title = timed("a", "", "", "2024-03-01T10:00:00Z");
        assert!(reconciler.decode(&no_title).unwrap_err().is_partial_record());
        no_title.summary = None;
        assert!(reconciler.decode(&no_title).unwrap_err().is_partial_record());

        let mut no_start = timed("b", "t", "", "2024-03-01T10:00:00Z");
        no_start.start = Some(EventTime::default());
        assert!(matches!(
            reconciler.decode(&no_start),
            Err(Error::MissingStart(_))
        ));
    }

    #[test]
    fn test_decode_all_skips_partial_and_broken_records() {
        let events = vec![
            timed("ok1", "First", "", "2024-03-01T08:00:00Z"),
            timed("untitled", "", "", "2024-03-01T09:00:00Z"),
            ProviderEvent {
                id: "nostart".into(),
                summary: Some("No start".into()),
                ..Default::default()
            },
            timed("garbled", "Garbled", "", "2024-03-01Tnoon"),
            timed("ok2", "Second", "", "2024-03-02T08:00:00Z"),
        ];

        let tasks = TaskReconciler::default().decode_all(&events);
        let ids: Vec<_> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["ok1", "ok2"]);
    }

    #[test]
    fn test_encode_completion_on_empty_description() {
        let event = timed("e1", "Standup", "", "2024-03-01T09:00:00+01:00");

        let done = encode_completion(event);
        assert_eq!(done.description.as_deref(), Some("[COMPLETED] "));

        let task = TaskReconciler::default().decode(&done).unwrap();
        assert!(task.is_completed);
        assert_eq!(task.description, None);
    }

    #[test]
    fn test_encode_completion_on_missing_description() {
        let mut event = timed("e1", "Standup", "", "2024-03-01T09:00:00Z");
        event.description = None;

        let done = encode_completion(event);
        assert_eq!(done.description.as_deref(), Some("[COMPLETED] "));
    }

    #[test]
    fn test_encode_completion_is_idempotent() {
        for description in ["", "notes", "[COMPLETED] notes", "notes [COMPLETED]"] {
            let event = timed("e", "t", description, "2024-03-01T09:00:00Z");
            let once = encode_completion(event);
            let twice = encode_completion(once.clone());
            assert_eq!(once, twice, "description {description:?}");
        }
    }

    #[test]
    fn test_encode_completion_keeps_description_text() {
        let done = encode_completion(timed("e", "t", "call back", "2024-03-01T09:00:00Z"));
        assert_eq!(done.description.as_deref(), Some("[COMPLETED] call back"));

        let task = TaskReconciler::default().decode(&done).unwrap();
        assert!(task.is_completed);
        assert_eq!(task.description.as_deref(), Some("call back"));
    }

    #[test]
    fn test_encode_completion_preserves_other_fields() {
        let mut event = timed("e", "t", "", "2024-03-01T09:00:00Z");
        event.extra.insert("etag".into(), serde_json::json!("\"42\""));

        let done = encode_completion(event.clone());
        assert_eq!(done.extra, event.extra);
        assert_eq!(done.start, event.start);
        assert_eq!(done.summary, event.summary);
    }

    #[test]
    fn test_encode_new_timed_task() {
        let new = NewTask::new("Meeting", ymd(2024, 12, 25))
            .at(hms(23, 30, 0))
            .with_description("Team meeting");

        let event = encode_new(&new, "UTC");
        let start = event.start.unwrap();
        let end = event.end.unwrap();

        assert_eq!(start.date_time.as_deref(), Some("2024-12-25T23:30:00"));
        assert_eq!(start.time_zone.as_deref(), Some("UTC"));
        assert_eq!(end.date_time.as_deref(), Some("2024-12-26T00:30:00"));
        assert_eq!(event.summary.as_deref(), Some("Meeting"));
        assert_eq!(event.description.as_deref(), Some("Team meeting"));
        assert!(event.id.is_empty());
    }

    #[test]
    fn test_encode_new_all_day_task_decodes_back() {
        let new = NewTask::new("Holiday", ymd(2024, 3, 5));

        let mut event = encode_new(&new, "Europe/Paris");
        assert_eq!(event.start, Some(EventTime::date("2024-03-05")));
        assert_eq!(event.end, Some(EventTime::date("2024-03-06")));
        assert_eq!(event.description.as_deref(), Some(""));

        event.id = "new".into();
        let task = TaskReconciler::default().decode(&event).unwrap();
        assert_eq!(task.date, ymd(2024, 3, 5));
        assert_eq!(task.time, None);
        assert!(!task.is_completed);
    }
}
