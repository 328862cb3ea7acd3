use anyhow::Result;
use owo_colors::OwoColorize;
use taskplan_core::NewTask;

use crate::commands::Service;
use crate::render::render_task;

pub async fn run(service: &Service, task: NewTask) -> Result<()> {
    let created = service.create_task(&task).await?;
    println!("{} {}", "Created".green(), render_task(&created));
    Ok(())
}

pub async fn update(service: &Service, id: &str, task: NewTask) -> Result<()> {
    let updated = service.update_task(id, &task).await?;
    println!("{} {}", "Updated".yellow(), render_task(&updated));
    Ok(())
}
