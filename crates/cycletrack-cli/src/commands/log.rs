//! `cycletrack log`

use chrono::{Local, NaiveDate};
use cycletrack_core::dates::parse_date;
use cycletrack_core::storage::history::log_date;
use cycletrack_core::{Config, SqliteStore};

pub fn run(date: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let date: NaiveDate = match date {
        Some(text) => parse_date(text)?,
        None => Local::now().date_naive(),
    };

    let config = Config::load()?;
    let store = SqliteStore::open()?;
    let history = log_date(&store, date)?;

    println!(
        "Logged {} ({} entries)",
        date.format(&config.display.date_format),
        history.len()
    );
    Ok(())
}
