//! Shared constants.

/// Reserved tag marking a task as done inside the event description.
pub const COMPLETED_MARKER: &str = "[COMPLETED]";

/// Days after the start date covered by a listing when no end is given.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Length of a timed task's calendar slot.
pub const DEFAULT_TASK_DURATION_HOURS: i64 = 1;

/// Google's alias for the user's main calendar.
pub const DEFAULT_CALENDAR_ID: &str = "primary";

/// Zone attached to timed tasks when none is configured.
pub const DEFAULT_TIME_ZONE: &str = "UTC";
