//! Terminal rendering for tasks.

use chrono::NaiveDate;
use owo_colors::OwoColorize;
use taskplan_core::{Task, TaskList};

/// Tasks grouped under a heading per day, in the order given.
pub fn render_task_list(list: &TaskList, today: NaiveDate) -> String {
    if list.tasks.is_empty() {
        return "No tasks found".dimmed().to_string();
    }

    let mut lines = Vec::new();
    let mut current_date: Option<NaiveDate> = None;

    for task in &list.tasks {
        if current_date != Some(task.date) {
            if current_date.is_some() {
                lines.push(String::new());
            }
            lines.push(format_date_label(task.date, today).bold().to_string());
            current_date = Some(task.date);
        }
        lines.push(format!("  {}", render_line(task)));
    }

    lines.join("\n")
}

/// One task with its date, for confirmations.
pub fn render_task(task: &Task) -> String {
    format!("{} {}", render_line(task), task.date.to_string().dimmed())
}

fn render_line(task: &Task) -> String {
    let time = format_time(task);
    let check = if task.is_completed { "[x]" } else { "[ ]" };
    let title = if task.is_completed {
        task.title.strikethrough().dimmed().to_string()
    } else {
        task.title.clone()
    };
    let id = format!("({})", task.id);

    match &task.description {
        Some(description) => format!(
            "{} {} {} {} {}",
            time,
            check,
            title,
            description.italic(),
            id.dimmed()
        ),
        None => format!("{} {} {} {}", time, check, title, id.dimmed()),
    }
}

/// Format a date as a human-readable label (e.g. "Today", "Tomorrow", "Wed Feb 25")
fn format_date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}

/// "15:00" or "all-day", right-aligned
fn format_time(task: &Task) -> String {
    match task.time {
        Some(t) => format!("{:>7}", t.format("%H:%M")),
        None => "all-day".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(id: &str, date: NaiveDate, time: Option<NaiveTime>) -> Task {
        Task {
            id: id.into(),
            title: format!("Task {id}"),
            date,
            time,
            description: None,
            is_completed: false,
        }
    }

    #[test]
    fn test_date_labels() {
        let today = ymd(2025, 2, 24);
        assert_eq!(format_date_label(today, today), "Today");
        assert_eq!(format_date_label(ymd(2025, 2, 25), today), "Tomorrow");
        assert_eq!(format_date_label(ymd(2025, 2, 26), today), "Wed Feb 26");
    }

    #[test]
    fn test_time_column_width() {
        let timed = task("a", ymd(2025, 2, 24), NaiveTime::from_hms_opt(9, 5, 0));
        let all_day = task("b", ymd(2025, 2, 24), None);
        assert_eq!(format_time(&timed), "  09:05");
        assert_eq!(format_time(&all_day), "all-day");
        assert_eq!(format_time(&timed).len(), format_time(&all_day).len());
    }

    #[test]
    fn test_groups_by_day() {
        let today = ymd(2025, 2, 24);
        let list = TaskList::from(vec![
            task("a", today, None),
            task("b", today, NaiveTime::from_hms_opt(10, 0, 0)),
            task("c", ymd(2025, 2, 25), None),
        ]);

        let rendered = render_task_list(&list, today);
        assert_eq!(rendered.matches("Today").count(), 1);
        assert_eq!(rendered.matches("Tomorrow").count(), 1);
        assert!(rendered.contains("Task b"));
    }

    #[test]
    fn test_empty_list() {
        let rendered = render_task_list(&TaskList::default(), ymd(2025, 2, 24));
        assert!(rendered.contains("No tasks found"));
    }
}
