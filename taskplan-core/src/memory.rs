//! An in-process calendar provider, used by tests and offline runs.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::event::ProviderEvent;
use crate::provider::CalendarProvider;
use crate::reconcile::TaskReconciler;
use crate::window::RangeWindow;

#[derive(Debug, Default)]
pub struct InMemoryCalendar {
    events: Mutex<HashMap<String, ProviderEvent>>,
}

impl InMemoryCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a calendar with events as the provider would return them.
    pub fn with_events(events: impl IntoIterator<Item = ProviderEvent>) -> Self {
        let calendar = Self::new();
        {
            let mut map = calendar.lock();
            for event in events {
                map.insert(event.id.clone(), event);
            }
        }
        calendar
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, ProviderEvent>> {
        // A poisoned map is still a valid map
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl CalendarProvider for InMemoryCalendar {
    async fn list_events(&self, window: &RangeWindow) -> Result<Vec<ProviderEvent>> {
        let reconciler = TaskReconciler::default();

        let mut events: Vec<ProviderEvent> = self
            .lock()
            .values()
            .filter(|e| !e.is_cancelled())
            .filter(|e| {
                e.start
                    .as_ref()
                    .and_then(|s| reconciler.parse_start(&e.id, s).ok())
                    .is_some_and(|(date, _)| window.contains(date))
            })
            .cloned()
            .collect();

        events.sort_by(|a, b| a.start_key().cmp(b.start_key()).then(a.id.cmp(&b.id)));
        Ok(events)
    }

    async fn get_event(&self, event_id: &str) -> Result<ProviderEvent> {
        self.lock()
            .get(event_id)
            .cloned()
            .ok_or_else(|| Error::EventNotFound(event_id.to_string()))
    }

    async fn insert_event(&self, event: &ProviderEvent) -> Result<ProviderEvent> {
        let mut created = event.clone();
        created.id = uuid::Uuid::new_v4().simple().to_string();
        self.lock().insert(created.id.clone(), created.clone());
        Ok(created)
    }

    async fn update_event(&self, event_id: &str, event: &ProviderEvent) -> Result<ProviderEvent> {
        let mut map = self.lock();
        if !map.contains_key(event_id) {
            return Err(Error::EventNotFound(event_id.to_string()));
        }

        let mut updated = event.clone();
        updated.id = event_id.to_string();
        map.insert(event_id.to_string(), updated.clone());
        Ok(updated)
    }

    async fn delete_event(&self, event_id: &str) -> Result<()> {
        self.lock()
            .remove(event_id)
            .map(|_| ())
            .ok_or_else(|| Error::EventNotFound(event_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventTime;
    use chrono::NaiveDate;

    fn event(id: &str, start: EventTime) -> ProviderEvent {
        ProviderEvent {
            id: id.into(),
            summary: Some(id.into()),
            start: Some(start),
            ..Default::default()
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_list_filters_by_window_and_orders_by_start() {
        let calendar = InMemoryCalendar::with_events([
            event("late", EventTime::date_time("2024-03-02T18:00:00Z")),
            event("early", EventTime::date_time("2024-03-02T08:00:00Z")),
            event("allday", EventTime::date("2024-03-01")),
            event("outside", EventTime::date("2024-04-01")),
        ]);

        let window = RangeWindow::new(ymd(2024, 3, 1), ymd(2024, 3, 2));
        let ids: Vec<_> = calendar
            .list_events(&window)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();

        assert_eq!(ids, ["allday", "early", "late"]);
    }

    #[tokio::test]
    async fn test_list_skips_cancelled() {
        let mut cancelled = event("c", EventTime::date("2024-03-01"));
        cancelled.status = Some("cancelled".into());
        let calendar = InMemoryCalendar::with_events([cancelled]);

        let listed = calendar
            .list_events(&RangeWindow::for_day(ymd(2024, 3, 1)))
            .await
            .unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_insert_assigns_id() {
        let calendar = InMemoryCalendar::new();
        let created = calendar
            .insert_event(&event("", EventTime::date("2024-03-01")))
            .await
            .unwrap();

        assert!(!created.id.is_empty());
        assert_eq!(calendar.get_event(&created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_unknown_ids_are_not_found() {
        let calendar = InMemoryCalendar::new();
        let probe = event("nope", EventTime::date("2024-03-01"));

        assert!(matches!(
            calendar.get_event("nope").await,
            Err(Error::EventNotFound(_))
        ));
        assert!(matches!(
            calendar.update_event("nope", &probe).await,
            Err(Error::EventNotFound(_))
        ));
        assert!(matches!(
            calendar.delete_event("nope").await,
            Err(Error::EventNotFound(_))
        ));
    }
}
