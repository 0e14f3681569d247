use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use birthday_core::board::Board;
use birthday_core::clock::{Clock, SystemClock};
use birthday_core::source::{FileSheet, HttpSheet, SheetSource};
use birthday_core::surface::present;
use chrono::NaiveDate;

use super::load_config;
use crate::render::Screen;
use crate::utils::tui::create_spinner;

pub async fn run(
    url: Option<String>,
    file: Option<PathBuf>,
    reference: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let reference = reference.unwrap_or_else(|| SystemClock.today());

    match file {
        Some(path) => show(Board::new(FileSheet::new(path)), reference, json).await,
        None => {
            let config = load_config(url)?;
            let source = HttpSheet::new(config.sheet_url()?, config.request_timeout)?;
            show(Board::new(source), reference, json).await
        }
    }
}

async fn show<S: SheetSource>(board: Board<S>, reference: NaiveDate, json: bool) -> Result<()> {
    let spinner = (!json).then(|| create_spinner("Loading birthdays..."));
    let cycle = board.run_cycle(reference).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    let plan = cycle.plan();
    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        let screen = Arc::new(Mutex::new(Screen::inline()));
        present(&plan, &mut screen.clone(), &mut screen.clone());
    }

    cycle.result?;
    Ok(())
}
