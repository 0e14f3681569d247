use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use birthday_core::board::Board;
use birthday_core::clock::{FixedClock, SystemClock};
use birthday_core::config::humantime_str;
use birthday_core::scheduler::{Schedule, Scheduler};
use birthday_core::source::HttpSheet;
use chrono::NaiveDate;
use owo_colors::OwoColorize;

use super::load_config;
use crate::render::Screen;

pub async fn run(
    url: Option<String>,
    interval: Option<String>,
    reference: Option<NaiveDate>,
) -> Result<()> {
    let mut config = load_config(url)?;
    if let Some(interval) = interval {
        config.refresh_interval = humantime_str::parse(&interval).map_err(|e| anyhow!(e))?;
        config.validate()?;
    }

    let board = Board::new(HttpSheet::new(config.sheet_url()?, config.request_timeout)?);
    let schedule = Schedule::from(&config);
    let screen = Arc::new(Mutex::new(Screen::live()));

    tracing::info!(
        interval = %humantime::format_duration(schedule.refresh_interval),
        retry = %humantime::format_duration(schedule.retry_delay),
        "watching sheet"
    );

    let handle = match reference {
        Some(date) => Scheduler::new(board, FixedClock(date), screen.clone(), screen.clone(), schedule)
            .with_drizzle(screen.clone())
            .spawn(),
        None => Scheduler::new(board, SystemClock, screen.clone(), screen.clone(), schedule)
            .with_drizzle(screen.clone())
            .spawn(),
    };

    tokio::signal::ctrl_c().await?;
    handle.shutdown().await;

    println!("\n{}", "Stopped.".dimmed());
    Ok(())
}
