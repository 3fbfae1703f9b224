//! History & data management commands.

use clap::Subcommand;
use cycletrack_core::dates::{export_sheet, import_sheet};
use cycletrack_core::storage::history::{delete_last, load_history, log_dates, wipe};
use cycletrack_core::{Config, SqliteStore};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum HistoryAction {
    /// List logged dates, newest first
    List {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete the most recent entry
    Undo,
    /// Permanently delete ALL history
    Wipe {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Print the history in sheet format (dd/mm/yyyy, one per line)
    Export,
    /// Add dates from a sheet export
    Import {
        /// File to read
        file: PathBuf,
    },
}

pub fn run(action: HistoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = SqliteStore::open()?;

    match action {
        HistoryAction::List { json } => {
            let config = Config::load()?;
            let history = load_history(&store)?;
            if json || config.display.json {
                let newest_first: Vec<_> = history.iter_desc().collect();
                println!("{}", serde_json::to_string_pretty(&newest_first)?);
            } else if history.is_empty() {
                println!("No data found. Log your first date with `cycletrack log`.");
            } else {
                for date in history.iter_desc() {
                    println!("{}", date.format(&config.display.date_format));
                }
            }
        }
        HistoryAction::Undo => match delete_last(&store)? {
            Some(date) => println!("Last entry removed: {date}"),
            None => println!("Nothing to remove."),
        },
        HistoryAction::Wipe { yes } => {
            if !yes {
                return Err("refusing to delete all history without --yes".into());
            }
            let removed = wipe(&store)?;
            println!("All data wiped ({removed} entries).");
        }
        HistoryAction::Export => {
            let history = load_history(&store)?;
            print!("{}", export_sheet(&history));
        }
        HistoryAction::Import { file } => {
            let text = std::fs::read_to_string(&file)?;
            let imported = import_sheet(&text);
            for row in &imported.skipped {
                tracing::warn!(row = %row, "skipping unparseable row");
            }
            let count = imported.dates.len();
            let history = log_dates(&store, imported.dates)?;
            println!(
                "Imported {count} dates ({} skipped), {} entries total",
                imported.skipped.len(),
                history.len()
            );
        }
    }
    Ok(())
}
