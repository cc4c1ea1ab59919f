#![allow(clippy::uninlined_format_args)]

use anyhow::Result;
use clap::Parser;
use serde_json::json;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mapharvest::errors::HarvestError;
use mapharvest::output;
use mapharvest::types::{DEFAULT_QUERY, DEFAULT_RESULT_CAP};
use mapharvest::webdriver_manager::GLOBAL_WEBDRIVER_MANAGER;
use mapharvest::{
    AdminTags, BrowserType, Harvester, OutputFormat, SearchRequest, SessionConfig, ViewportSize,
};

// Exit codes
const EXIT_SUCCESS: i32 = 0;

#[derive(Parser, Debug)]
#[command(name = "mapharvest")]
#[command(about = "Collect facility records from map search results", long_about = None)]
struct Cli {
    /// What to search for
    #[arg(long, default_value = DEFAULT_QUERY)]
    query: String,

    /// Where to search (required)
    #[arg(long)]
    location: Option<String>,

    /// Maximum number of records to collect
    #[arg(long = "max", default_value_t = DEFAULT_RESULT_CAP)]
    max: usize,

    /// Province label copied into every record
    #[arg(long)]
    province: Option<String>,

    /// Regency label copied into every record
    #[arg(long)]
    regency: Option<String>,

    /// District label copied into every record
    #[arg(long)]
    district: Option<String>,

    /// Village label copied into every record
    #[arg(long)]
    village: Option<String>,

    /// Output file (default: <data-dir>/schools_<timestamp>.<format>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for the default output file
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "json")]
    format: OutputFormat,

    /// Browser to use (chrome or firefox)
    #[arg(short, long, default_value = "chrome")]
    browser: String,

    /// Viewport size (WIDTHxHEIGHT)
    #[arg(long, default_value = "1280x720")]
    viewport: String,

    /// Run browser in visible mode (disables headless)
    #[arg(long = "no-headless")]
    no_headless: bool,
}

/// A validated run, built before any browser is launched
struct RunConfig {
    request: SearchRequest,
    session: SessionConfig,
    output: Option<PathBuf>,
    data_dir: PathBuf,
    format: OutputFormat,
}

impl Cli {
    fn into_run_config(self) -> Result<RunConfig, HarvestError> {
        let request = SearchRequest::new(
            self.query,
            self.location.unwrap_or_default(),
            self.max,
        )?
        .with_tags(AdminTags {
            province: self.province,
            regency: self.regency,
            district: self.district,
            village: self.village,
        });

        let browser: BrowserType = self
            .browser
            .parse()
            .map_err(|e: anyhow::Error| HarvestError::Configuration(e.to_string()))?;
        let viewport = ViewportSize::parse(&self.viewport)
            .map_err(|e| HarvestError::Configuration(e.to_string()))?;

        let session = SessionConfig {
            browser,
            viewport,
            headless: !self.no_headless,
        };

        Ok(RunConfig {
            request,
            session,
            output: self.output,
            data_dir: self.data_dir,
            format: self.format,
        })
    }
}

#[tokio::main]
async fn main() {
    let result = run().await;

    // Always clean up WebDriver processes before exiting
    GLOBAL_WEBDRIVER_MANAGER.stop_all();

    match result {
        Ok(()) => std::process::exit(EXIT_SUCCESS),
        Err(err) => {
            // Output JSON error to stdout for programmatic consumption
            let error_json = json!({
                "error": true,
                "message": err.to_string(),
                "exit_code": err.exit_code()
            });
            println!(
                "{}",
                serde_json::to_string(&error_json).unwrap_or_else(|_| "{}".to_string())
            );

            // Also log to stderr for human reading
            eprintln!("Error: {}", err);
            std::process::exit(err.exit_code());
        }
    }
}

async fn run() -> Result<(), HarvestError> {
    // Initialize tracing to stderr (so stdout stays machine-readable)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mapharvest=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.into_run_config()?;

    let report = Harvester::default()
        .harvest(&config.session, &config.request)
        .await?;

    let path = output::resolve_output_path(
        config.output.as_deref(),
        &config.data_dir,
        config.format,
        chrono::Utc::now(),
    );
    output::write_records(&path, &report.records, config.format)
        .map_err(|e| HarvestError::Output(format!("{:#}", e)))?;

    println!("Scraping completed!");
    println!("Total records: {}", report.records.len());
    println!("Saved to: {}", path.display());

    Ok(())
}
