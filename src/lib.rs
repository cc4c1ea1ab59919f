//! # mapharvest
#![allow(clippy::uninlined_format_args)]
//!
//! CLI tool that collects facility records (name, address, coordinates,
//! rating, contact details) from a map search service by driving a browser
//! over WebDriver.
//!
//! ## How a run works
//!
//! 1. Open one browser session with one page.
//! 2. Search for `"{query} {location}"` on the map service.
//! 3. Scroll the result feed until its height stops changing or the scroll
//!    budget (`ceil(max / 10)`) runs out.
//! 4. Open each of the first `max` entries and read its detail view. Entries
//!    that fail are skipped; entries without a name are dropped.
//! 5. Close the session and write the records as JSON or CSV.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Requires chromedriver (or geckodriver with --browser firefox) on PATH
//! mapharvest --query "sekolah" --location "Jakarta Selatan" --max 10
//!
//! # Tag every record with administrative labels
//! mapharvest --location "Tebet" --province "DKI Jakarta" \
//!   --regency "Jakarta Selatan" --district "Tebet"
//!
//! # CSV to an explicit file, browser visible
//! mapharvest --location "Bandung" --format csv --output bandung.csv --no-headless
//! ```
//!
//! Records go to `data/schools_<timestamp>.json` unless `--output` is given.
//! Logs go to stderr; set `RUST_LOG=mapharvest=debug` for per-field detail.
//!
//! ## Library Usage
//!
//! ```no_run
//! use mapharvest::{Harvester, SearchRequest, SessionConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let request = SearchRequest::new("sekolah", "Jakarta Selatan", 5)?;
//! let report = Harvester::default()
//!     .harvest(&SessionConfig::default(), &request)
//!     .await?;
//!
//! for record in &report.records {
//!     println!("{} ({}, {})", record.name, record.coordinates.lat, record.coordinates.lng);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Any type implementing [`MapPage`] can stand in for the browser, which is
//! how the pipeline is tested.

/// Record collection from the result feed
pub mod collector;

/// Error types and exit codes
pub mod errors;

/// Field extraction from the detail view
pub mod extractor;

/// Search submission
pub mod navigator;

/// Writing records to JSON or CSV
pub mod output;

/// Browser abstraction used by the pipeline
pub mod page;

/// Result feed scrolling
pub mod paginator;

/// Batch driver
pub mod scraper;

/// CSS selectors for the map service
pub mod selectors;

/// Settle delays and bounded waits
pub mod timing;

/// Request, record and report types
pub mod types;

/// WebDriver browser session
pub mod webdriver;

/// Automatic WebDriver process management
pub mod webdriver_manager;

pub use collector::{Collection, ResultCollector};
pub use errors::HarvestError;
pub use extractor::RecordExtractor;
pub use navigator::SearchNavigator;
pub use page::{MapPage, PageContext, PageSession};
pub use paginator::ResultPaginator;
pub use scraper::Harvester;
pub use selectors::MapSelectors;
pub use timing::Timings;
pub use types::{
    AdminTags, BatchProgress, BatchReport, BatchStatus, Coordinates, FacilityRecord, ItemOutcome,
    OutputFormat, PaginationState, PaginationStop, PaginationSummary, SearchRequest, ViewportSize,
};
pub use webdriver::{BrowserSession, BrowserType, SessionConfig};
