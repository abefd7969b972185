use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod classify;
mod dataset;
mod models;
mod report;
mod stats;
mod timezone;
mod window;

use timezone::ReferenceZone;
use window::Period;

#[derive(Parser)]
#[command(name = "ed-slo")]
#[command(about = "Analyze Ed Discussion JSON data for SLO metrics", long_about = None)]
#[command(after_help = "Examples:
    ed-slo data.json --mode details
    ed-slo data.json --mode week --categorize --skip-weekends
    ed-slo data.json --mode overall --count-unconfirmed")]
struct Cli {
    /// Path to the Ed Discussion JSON file
    json_file: PathBuf,

    /// Analysis mode
    #[arg(short, long, value_enum, default_value_t = Mode::Overall)]
    mode: Mode,

    /// Show breakdown by category (only for week and overall modes)
    #[arg(short, long)]
    categorize: bool,

    /// Count unconfirmed student answers as resolved
    #[arg(short = 'u', long)]
    count_unconfirmed: bool,

    /// Skip threads posted on weekends in statistical modes
    #[arg(short, long)]
    skip_weekends: bool,

    /// Time zone used for weekends and the weekly window
    #[arg(
        long,
        default_value = "America/New_York",
        value_parser = timezone::parse_zone
    )]
    timezone: ReferenceZone,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Show every question thread
    Details,
    /// Statistics for the last seven days
    Week,
    /// Statistics across all threads
    Overall,
}

impl Mode {
    /// Reporting window for the statistical modes.
    fn period(self) -> Option<Period> {
        match self {
            Mode::Details => None,
            Mode::Week => Some(Period::LastWeek),
            Mode::Overall => Some(Period::Overall),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug)?;

    let dataset = dataset::load(&cli.json_file, &cli.timezone)
        .with_context(|| format!("failed to load {}", cli.json_file.display()))?;

    let output = match cli.mode.period() {
        None => report::build_details(&dataset.threads),
        Some(period) => {
            let now = cli.timezone.now();
            tracing::debug!(zone = %cli.timezone.tz(), %now, ?period, "selecting threads");
            let selection = window::select(&dataset.threads, period, now, cli.skip_weekends);
            report::build_period_report(period, &selection, cli.count_unconfirmed, cli.categorize)
        }
    };

    print!("{output}");
    Ok(())
}

fn init_tracing(debug: bool) -> anyhow::Result<()> {
    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))
}
