mod commands;
mod render;
mod utils;

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use clap::{Parser, Subcommand};
use taskplan_core::Config;
use taskplan_core::task::{parse_date, parse_time};

#[derive(Parser)]
#[command(name = "taskplan")]
#[command(about = "Plan tasks stored as events in your Google Calendar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's tasks
    Today,
    /// Show tasks in a date range (default: today through the next 30 days)
    List {
        /// First day (YYYY-MM-DD), defaults to today
        #[arg(long, value_parser = parse_date)]
        from: Option<NaiveDate>,

        /// Last day (YYYY-MM-DD), defaults to 30 days after --from
        #[arg(long, value_parser = parse_date)]
        to: Option<NaiveDate>,
    },
    /// Add a task
    Add {
        title: String,

        /// Day of the task (YYYY-MM-DD)
        #[arg(short, long, value_parser = parse_date)]
        date: NaiveDate,

        /// Time of day (HH:MM or HH:MM:SS); omit for an all-day task
        #[arg(short, long, value_parser = parse_time)]
        time: Option<NaiveTime>,

        #[arg(long)]
        description: Option<String>,
    },
    /// Replace a task's title, date, time and description
    Update {
        id: String,

        title: String,

        #[arg(short, long, value_parser = parse_date)]
        date: NaiveDate,

        #[arg(short, long, value_parser = parse_time)]
        time: Option<NaiveTime>,

        #[arg(long)]
        description: Option<String>,
    },
    /// Mark a task as done
    Done { id: String },
    /// Delete a task
    Delete { id: String },
    /// Show the config file location
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::Config = cli.command {
        return commands::config::run();
    }

    let config = Config::load()?;
    taskplan_core::logging::init(&config)?;
    let service = commands::service(&config)?;

    match cli.command {
        Commands::Today => commands::list::today(&service).await,
        Commands::List { from, to } => commands::list::range(&service, from, to).await,
        Commands::Add {
            title,
            date,
            time,
            description,
        } => commands::add::run(&service, commands::new_task(title, date, time, description)).await,
        Commands::Update {
            id,
            title,
            date,
            time,
            description,
        } => {
            commands::add::update(&service, &id, commands::new_task(title, date, time, description))
                .await
        }
        Commands::Done { id } => commands::done::run(&service, &id).await,
        Commands::Delete { id } => commands::delete::run(&service, &id).await,
        Commands::Config => unreachable!("handled before loading config"),
    }
}
