//! Core types for taskplan.
//!
//! Tasks live as events in an external calendar. This crate provides:
//! - `reconcile`: mapping between provider events and `Task`s, including
//!   the in-band completion marker
//! - `window`: date windows for listing events
//! - `provider`: the `CalendarProvider` trait and `memory` implementation
//! - `service`: task operations over any provider
//! - `config` and `logging`: the ambient setup shared by the binaries

pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod logging;
pub mod memory;
pub mod provider;
pub mod reconcile;
pub mod service;
pub mod task;
pub mod window;

pub use config::Config;
pub use error::{Error, Result};
pub use event::{EventTime, ProviderEvent};
pub use memory::InMemoryCalendar;
pub use provider::CalendarProvider;
pub use reconcile::{TaskReconciler, TimestampParsing, encode_completion, encode_new};
pub use service::TaskService;
pub use task::{NewTask, Task, TaskList};
pub use window::RangeWindow;
