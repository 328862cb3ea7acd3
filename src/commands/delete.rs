use anyhow::Result;
use owo_colors::OwoColorize;

use crate::commands::Service;

pub async fn run(service: &Service, id: &str) -> Result<()> {
    service.delete_task(id).await?;
    println!("{} {}", "Deleted".red(), id.dimmed());
    Ok(())
}
