//! CLI entry point for the tent score tables.
//!
//! Provides subcommands for logging in to the camp API, fetching a shift's
//! tent scores as a per-day table, and aggregating a local score export.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tent_scores::{
    app::{fetch_shift_records, log_in},
    auth::{Credentials, Session},
    config::Settings,
    infra::camp::CampApiClient,
    output::{render_table, to_json, write_csv},
    scores::{ScoreTable, aggregate, records_from_json},
};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "tent_scores")]
#[command(about = "Daily tent score tables for camp staff", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in to the camp API and store the session
    Login {
        #[arg(short, long)]
        username: String,

        /// Read from TENT_SCORES_PASSWORD when not given
        #[arg(short, long, env = "TENT_SCORES_PASSWORD", hide_env_values = true)]
        password: String,

        /// Log in again even if a session is stored
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Forget the stored session
    Logout,
    /// Fetch a shift's tent scores and print them per day
    Scores {
        /// Shift to show (defaults to the logged-in user's shift)
        #[arg(short, long)]
        shift: Option<u32>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Aggregate a local JSON export of score records
    Aggregate {
        #[arg(value_name = "FILE")]
        source: PathBuf,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let settings = Settings::from_env()?;

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = settings
        .log_file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = settings
        .log_file_path
        .file_name()
        .unwrap_or(OsStr::new("tent_scores.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive(LevelFilter::INFO.into()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive(LevelFilter::DEBUG.into()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Login {
            username,
            password,
            force,
        } => login(&settings, username, password, force).await?,
        Commands::Logout => {
            let mut session = Session::new(settings.session_path.clone());
            session.clear()?;
            info!("Logged out");
        }
        Commands::Scores {
            shift,
            format,
            output,
        } => {
            let table = fetch_table(&settings, shift).await?;
            emit(&table, format, output.as_deref())?;
        }
        Commands::Aggregate {
            source,
            format,
            output,
        } => {
            let json = std::fs::read_to_string(&source)
                .with_context(|| format!("Failed to read {}", source.display()))?;
            let records = records_from_json(&json)
                .with_context(|| format!("{} is not a JSON list of score records", source.display()))?;
            let table = aggregate(&records, &settings.day_keys);
            emit(&table, format, output.as_deref())?;
        }
    }

    Ok(())
}

/// Validates the credentials, logs in and stores the session.
#[tracing::instrument(skip(settings, password))]
async fn login(settings: &Settings, username: String, password: String, force: bool) -> Result<()> {
    let credentials = Credentials::new(username, password)?;
    let api = CampApiClient::new(settings.api_url.clone())?;
    let mut session = Session::new(settings.session_path.clone());
    log_in(&api, &mut session, &credentials, force).await?;
    Ok(())
}

/// Fetches the scores of `shift` (or the session's shift) and aggregates them.
#[tracing::instrument(skip(settings))]
async fn fetch_table(settings: &Settings, shift: Option<u32>) -> Result<ScoreTable> {
    let api = CampApiClient::new(settings.api_url.clone())?;
    let mut session = Session::new(settings.session_path.clone());
    let records = fetch_shift_records(&api, &mut session, shift).await?;
    Ok(aggregate(&records, &settings.day_keys))
}

/// Renders `table` in `format` to `output`, or stdout.
fn emit(table: &ScoreTable, format: OutputFormat, output: Option<&Path>) -> Result<()> {
    let rendered = match format {
        OutputFormat::Table => render_table(table),
        OutputFormat::Json => to_json(table)?,
        OutputFormat::Csv => {
            let mut buf = Vec::new();
            write_csv(table, &mut buf)?;
            String::from_utf8(buf)?
        }
    };

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Table written");
        }
        None => print!("{rendered}"),
    }
    Ok(())
}
