use anyhow::Result;
use birthday_core::config::BoardConfig;
use owo_colors::OwoColorize;

use super::load_config;

pub fn run() -> Result<()> {
    let config_path = BoardConfig::config_path()?;
    let config = load_config(None)?;

    println!("{}", "Paths".bold());
    println!("  Config:  {}", config_path.display());
    println!();

    println!("{}", "Settings".bold());
    for line in config.to_toml()?.lines() {
        println!("  {}", line);
    }
    if config.sheet_url.is_none() {
        println!("  {}", "sheet_url is not set".yellow());
    }

    Ok(())
}
