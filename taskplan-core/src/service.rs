//! Task operations over a calendar provider.

use chrono::NaiveDate;
use tracing::info;

use crate::constants::DEFAULT_TIME_ZONE;
use crate::error::Result;
use crate::provider::CalendarProvider;
use crate::reconcile::{TaskReconciler, TimestampParsing, encode_completion, encode_new};
use crate::task::{NewTask, Task, TaskList};
use crate::window::RangeWindow;

pub struct TaskService<P> {
    provider: P,
    reconciler: TaskReconciler,
    time_zone: String,
}

impl<P: CalendarProvider> TaskService<P> {
    pub fn new(provider: P) -> Self {
        TaskService {
            provider,
            reconciler: TaskReconciler::default(),
            time_zone: DEFAULT_TIME_ZONE.to_string(),
        }
    }

    pub fn with_parsing(mut self, parsing: TimestampParsing) -> Self {
        self.reconciler = TaskReconciler::new(parsing);
        self
    }

    /// Zone attached to the start/end of timed tasks this service writes.
    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = time_zone.into();
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub async fn tasks_for_day(&self, day: NaiveDate) -> Result<TaskList> {
        self.tasks_in(&RangeWindow::for_day(day)).await
    }

    /// Tasks between two dates; missing bounds fall back to the default window.
    pub async fn tasks_for_range(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<TaskList> {
        self.tasks_in(&RangeWindow::from_optional(start, end)).await
    }

    pub async fn tasks_in(&self, window: &RangeWindow) -> Result<TaskList> {
        let events = self.provider.list_events(window).await?;
        Ok(self.reconciler.decode_all(&events).into())
    }

    pub async fn get_task(&self, task_id: &str) -> Result<Task> {
        let event = self.provider.get_event(task_id).await?;
        self.reconciler.decode(&event)
    }

    pub async fn create_task(&self, task: &NewTask) -> Result<Task> {
        task.validate()?;
        let event = encode_new(task, &self.time_zone);
        let created = self.provider.insert_event(&event).await?;
        info!(task_id = %created.id, title = %task.title, "created task");

        self.reconciler.decode(&created)
    }

    /// Replace a task. The description is overwritten, so a completed task
    /// becomes open again.
    pub async fn update_task(&self, task_id: &str, task: &NewTask) -> Result<Task> {
        task.validate()?;
        let event = encode_new(task, &self.time_zone);
        let updated = self.provider.update_event(task_id, &event).await?;
        info!(task_id = %updated.id, "updated task");

        self.reconciler.decode(&updated)
    }

    pub async fn delete_task(&self, task_id: &str) -> Result<()> {
        self.provider.delete_event(task_id).await?;
        info!(task_id, "deleted task");
        Ok(())
    }

    /// Read-modify-write of the completion marker. There is no conflict
    /// detection: a concurrent writer to the same event may be overwritten.
    pub async fn mark_task_done(&self, task_id: &str) -> Result<Task> {
        let event = self.provider.get_event(task_id).await?;
        let event = encode_completion(event);
        let updated = self.provider.update_event(task_id, &event).await?;
        info!(task_id, "marked task done");

        self.reconciler.decode(&updated)
    }
}
