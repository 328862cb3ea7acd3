use anyhow::Result;
use owo_colors::OwoColorize;

use crate::commands::Service;
use crate::render::render_task;

pub async fn run(service: &Service, id: &str) -> Result<()> {
    let task = service.mark_task_done(id).await?;
    println!("{} {}", "Done".green(), render_task(&task));
    Ok(())
}
