//! The calendar provider seam.
//!
//! Providers own all network and credential handling. Failures come back as
//! `Error::Provider` (or `Error::EventNotFound`) and are passed up as-is;
//! nothing at this layer retries.

use async_trait::async_trait;

use crate::error::Result;
use crate::event::ProviderEvent;
use crate::window::RangeWindow;

#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Single (expanded) events starting inside `window`, ordered by start.
    async fn list_events(&self, window: &RangeWindow) -> Result<Vec<ProviderEvent>>;

    async fn get_event(&self, event_id: &str) -> Result<ProviderEvent>;

    /// Create an event; the returned record carries the provider-assigned id.
    async fn insert_event(&self, event: &ProviderEvent) -> Result<ProviderEvent>;

    /// Replace an event's body.
    async fn update_event(&self, event_id: &str, event: &ProviderEvent) -> Result<ProviderEvent>;

    async fn delete_event(&self, event_id: &str) -> Result<()>;
}

#[async_trait]
impl<P: CalendarProvider + ?Sized> CalendarProvider for Box<P> {
    async fn list_events(&self, window: &RangeWindow) -> Result<Vec<ProviderEvent>> {
        (**self).list_events(window).await
    }

    async fn get_event(&self, event_id: &str) -> Result<ProviderEvent> {
        (**self).get_event(event_id).await
    }

    async fn insert_event(&self, event: &ProviderEvent) -> Result<ProviderEvent> {
        (**self).insert_event(event).await
    }

    async fn update_event(&self, event_id: &str, event: &ProviderEvent) -> Result<ProviderEvent> {
        (**self).update_event(event_id, event).await
    }

    async fn delete_event(&self, event_id: &str) -> Result<()> {
        (**self).delete_event(event_id).await
    }
}
