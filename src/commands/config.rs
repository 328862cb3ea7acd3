use anyhow::Result;
use owo_colors::OwoColorize;
use taskplan_core::Config;

pub fn run() -> Result<()> {
    let config_path = Config::config_path()?;

    if !config_path.exists() {
        Config::create_default_config(&config_path)?;
        println!("{}", "Created default config".dimmed());
    }

    let config = Config::load_from(&config_path)?;

    println!("{}", "Paths".bold());
    println!("  Config:  {}", config_path.display());
    println!("  Token:   {}", config.token_path().display());
    if let Some(log) = config.log_path() {
        println!("  Log:     {}", log.display());
    }

    println!("{}", "Calendar".bold());
    println!("  Id:        {}", config.calendar_id);
    println!("  Time zone: {}", config.time_zone);

    Ok(())
}
