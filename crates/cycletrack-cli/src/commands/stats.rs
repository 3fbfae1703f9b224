use cycletrack_core::estimator::stats::mean;
use cycletrack_core::storage::history::load_history;
use cycletrack_core::{Config, SqliteStore};
use serde::Serialize;

#[derive(Serialize)]
struct GapStats {
    logged: usize,
    gaps: Vec<i64>,
    kept: Vec<i64>,
    fallback_used: bool,
    mean: Option<f64>,
    weighted_mean: Option<f64>,
    dispersion: Option<f64>,
}

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let store = SqliteStore::open()?;
    let history = load_history(&store)?;
    let estimator = config.estimator();

    let gaps = estimator.compute_gaps(history.as_slice());
    let filtered = estimator.filter_outliers(&gaps);
    let kept_f64: Vec<f64> = filtered.gaps.iter().map(|&g| g as f64).collect();
    let stats = GapStats {
        logged: history.len(),
        mean: mean(&kept_f64),
        weighted_mean: estimator.weighted_average(&filtered.gaps),
        dispersion: estimator.dispersion(&filtered.gaps),
        gaps,
        kept: filtered.gaps,
        fallback_used: filtered.fallback_used,
    };

    if json || config.display.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let fmt = |v: Option<f64>| v.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"));
    println!("Logged dates:   {}", stats.logged);
    println!("Gaps:           {:?}", stats.gaps);
    println!(
        "Kept gaps:      {:?}{}",
        stats.kept,
        if stats.fallback_used { " (fixed bounds)" } else { "" }
    );
    println!("Mean:           {}", fmt(stats.mean));
    println!("Weighted mean:  {}", fmt(stats.weighted_mean));
    println!("Dispersion:     {}", fmt(stats.dispersion));
    Ok(())
}
