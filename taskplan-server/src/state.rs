use std::sync::Arc;

use anyhow::Result;
use taskplan_core::{CalendarProvider, Config, TaskService};
use taskplan_provider_google::GoogleCalendar;

pub type DynService = TaskService<Box<dyn CalendarProvider>>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    service: Arc<DynService>,
}

impl AppState {
    pub fn new(service: DynService) -> Self {
        AppState {
            service: Arc::new(service),
        }
    }

    /// State backed by the configured Google calendar.
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider: Box<dyn CalendarProvider> = Box::new(GoogleCalendar::from_config(config)?);
        let service = TaskService::new(provider)
            .with_parsing(config.timestamp_parsing)
            .with_time_zone(config.time_zone.clone());
        Ok(Self::new(service))
    }

    pub fn tasks(&self) -> &DynService {
        &self.service
    }
}
