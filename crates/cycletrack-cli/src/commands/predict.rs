//! `cycletrack predict`

use cycletrack_core::dates::format_short;
use cycletrack_core::storage::history::load_history;
use cycletrack_core::{Config, InsufficientData, Prediction, SqliteStore};
use serde_json::json;

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store = SqliteStore::open()?;
    let history = load_history(&store)?;
    let json = json || config.display.json;

    match history.predict(&config.estimator()) {
        Ok(prediction) => {
            if json {
                let out = json!({ "status": "ok", "prediction": prediction });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                print!("{}", render(&prediction, &config.display.date_format));
            }
        }
        Err(reason) => {
            if json {
                let out = json!({
                    "status": "insufficient_data",
                    "logged": history.len(),
                    "reason": reason.to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{}", guidance(&reason));
            }
        }
    }
    Ok(())
}

/// Text block shown for a prediction.
pub fn render(p: &Prediction, date_format: &str) -> String {
    format!(
        "Next Predicted Cycle\n\
         Status: {} Reliability\n\
         Window: {} – {}\n\
         Avg Cycle: {:.1} days\n\
         Last Logged: {}\n\
         Variation: ±{:.1} days\n",
        p.reliability,
        format_short(p.window_start),
        p.window_end.format(date_format),
        p.average_cycle,
        format_short(p.last_date),
        p.variation,
    )
}

/// What to tell the user when no prediction is available.
pub fn guidance(reason: &InsufficientData) -> String {
    match reason {
        InsufficientData::TooFewDates { logged: 0 } => {
            "No data found. Log your first date with `cycletrack log`.".to_string()
        }
        InsufficientData::TooFewDates { logged } => {
            format!("Log at least 2 dates to see predictions! Currently logged: {logged}")
        }
        InsufficientData::NoReliableGaps { total_gaps } => format!(
            "None of the {total_gaps} logged gaps look like a plausible cycle. Log more dates to see predictions."
        ),
        InsufficientData::WindowOutOfRange => {
            "The predicted window falls outside the supported calendar range.".to_string()
        }
    }
}
