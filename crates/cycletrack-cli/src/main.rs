use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "cycletrack", version, about = "Cycletrack CLI")]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a start date (defaults to today)
    Log {
        /// Date as dd/mm/yyyy or yyyy-mm-dd
        date: Option<String>,
    },
    /// Predict the next window
    Predict {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Gap statistics behind the prediction
    Stats {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// History and data management
    History {
        #[command(subcommand)]
        action: commands::history::HistoryAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("CYCLETRACK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Log { date } => commands::log::run(date.as_deref()),
        Commands::Predict { json } => commands::predict::run(json),
        Commands::Stats { json } => commands::stats::run(json),
        Commands::History { action } => commands::history::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
