use anyhow::Result;
use chrono::{Local, NaiveDate};

use crate::commands::Service;
use crate::render::render_task_list;
use crate::utils::spinner::create_spinner;

pub async fn today(service: &Service) -> Result<()> {
    let today = Local::now().date_naive();

    let spinner = create_spinner("Fetching today's tasks".to_string());
    let tasks = service.tasks_for_day(today).await;
    spinner.finish_and_clear();

    println!("{}", render_task_list(&tasks?, today));
    Ok(())
}

pub async fn range(service: &Service, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<()> {
    let spinner = create_spinner("Fetching tasks".to_string());
    let tasks = service.tasks_for_range(from, to).await;
    spinner.finish_and_clear();

    println!("{}", render_task_list(&tasks?, Local::now().date_naive()));
    Ok(())
}
