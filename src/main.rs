use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use weather_traffic::config::LoggingConfig;
use weather_traffic::fixtures::{self, DEFAULT_SEED};
use weather_traffic::loader;
use weather_traffic::validation::{parse_iso_date, validate_date_range};
use weather_traffic::{InsightsConfig, RawWeatherRecord, TrafficRecord, WeatherTrafficAnalyzer};

#[derive(Parser, Debug)]
#[command(name = "weather-traffic")]
#[command(about = "Detect extreme weather and measure its effect on traffic", version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true, env = "WXTRAFFIC_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze weather and traffic records loaded from JSON files
    Analyze {
        /// JSON array of raw weather records
        #[arg(long)]
        weather: PathBuf,

        /// JSON array of traffic records
        #[arg(long)]
        traffic: PathBuf,

        /// Print a text summary instead of the JSON report
        #[arg(long)]
        summary: bool,
    },

    /// Analyze seeded sample data
    Sample {
        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,

        /// First day (YYYY-MM-DD), defaults to 2023-01-01
        #[arg(long, requires = "end")]
        start: Option<String>,

        /// Last day (YYYY-MM-DD), defaults to 2023-12-31
        #[arg(long, requires = "start")]
        end: Option<String>,

        /// Print a text summary instead of the JSON report
        #[arg(long)]
        summary: bool,
    },

    /// Check that a date range is acceptable for analysis
    ValidateRange {
        #[arg(long)]
        start: String,

        #[arg(long)]
        end: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = InsightsConfig::load_from_path(cli.config.clone())?;
    init_tracing(&config.logging, cli.verbose);

    let significance_level = config.correlation.significance_level;
    let analyzer = WeatherTrafficAnalyzer::new(config);

    match cli.command {
        Commands::Analyze {
            weather,
            traffic,
            summary,
        } => {
            let weather: Vec<RawWeatherRecord> = load(&weather)?;
            let traffic: Vec<TrafficRecord> = load(&traffic)?;
            info!(weather = weather.len(), traffic = traffic.len(), "Loaded records");

            let report = analyzer.analyze(&weather, &traffic);
            if summary {
                println!("{}", report.summary(significance_level));
            } else {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        Commands::Sample {
            seed,
            start,
            end,
            summary,
        } => {
            let (start, end) = match (start, end) {
                (Some(start), Some(end)) => checked_range(&start, &end)?,
                _ => fixtures::default_range(),
            };

            let data = fixtures::generate_sample_data(seed, start, end)?;
            let report = analyzer.analyze(&data.weather, &data.traffic);
            if summary {
                println!("{}", report.summary(significance_level));
            } else {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
        Commands::ValidateRange { start, end } => {
            let (start, end) = checked_range(&start, &end)?;
            println!("Date range {start} to {end} is valid");
        }
    }

    Ok(())
}

fn checked_range(start: &str, end: &str) -> Result<(NaiveDate, NaiveDate)> {
    let start = parse_iso_date(start)?;
    let end = parse_iso_date(end)?;
    validate_date_range(start, end, Local::now().date_naive())?;
    Ok((start, end))
}

fn load<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    loader::load_records(path)
        .with_context(|| format!("Failed to load records from {}", path.display()))
}

fn init_tracing(logging: &LoggingConfig, verbose: bool) {
    let level = if verbose { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // Logs go to stderr so stdout stays machine-readable
    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
