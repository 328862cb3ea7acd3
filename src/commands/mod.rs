pub mod add;
pub mod config;
pub mod delete;
pub mod done;
pub mod list;

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use taskplan_core::{Config, NewTask, TaskService};
use taskplan_provider_google::GoogleCalendar;

pub type Service = TaskService<GoogleCalendar>;

/// Task service over the configured Google calendar.
pub fn service(config: &Config) -> Result<Service> {
    let calendar = GoogleCalendar::from_config(config)?;
    Ok(TaskService::new(calendar)
        .with_parsing(config.timestamp_parsing)
        .with_time_zone(config.time_zone.clone()))
}

pub fn new_task(
    title: String,
    date: NaiveDate,
    time: Option<NaiveTime>,
    description: Option<String>,
) -> NewTask {
    NewTask {
        title,
        date,
        time,
        description,
    }
}
