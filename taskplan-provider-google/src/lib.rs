//! Google Calendar provider for taskplan.
//!
//! Implements `CalendarProvider` over the Calendar v3 REST API. Credentials
//! come from an authorized-user token file, refreshed in place when the
//! access token expires.

mod api;
mod session;

pub use api::GoogleCalendar;
pub use session::{Session, SessionData};
