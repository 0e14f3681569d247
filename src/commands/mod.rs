pub mod config;
pub mod show;
pub mod watch;

use anyhow::{Context, Result};
use birthday_core::config::BoardConfig;
use chrono::NaiveDate;

/// Parse `--date`. `None` means the real date.
pub fn parse_reference(date: Option<&str>) -> Result<Option<NaiveDate>> {
    date.map(|s| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid date format '{}'. Expected YYYY-MM-DD", s))
    })
    .transpose()
}

/// Load the config file and apply a `--url` override.
pub fn load_config(url: Option<String>) -> Result<BoardConfig> {
    Ok(BoardConfig::load_with_url(url)?)
}
