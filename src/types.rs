use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::HarvestError;

/// Default number of results collected per run
pub const DEFAULT_RESULT_CAP: usize = 20;

/// Default search query
pub const DEFAULT_QUERY: &str = "sekolah";

/// Results loaded per feed scroll, used to size the scroll budget
pub const RESULTS_PER_SCROLL: usize = 10;

/// Output format for collected records
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON array of records
    #[default]
    Json,
    /// Comma separated values, one record per row
    Csv,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

/// Browser viewport dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportSize {
    /// Viewport width in pixels
    pub width: u32,
    /// Viewport height in pixels
    pub height: u32,
}

impl Default for ViewportSize {
    fn default() -> Self {
        ViewportSize {
            width: 1280,
            height: 720,
        }
    }
}

impl ViewportSize {
    /// Parse viewport size from "WIDTHxHEIGHT" format (e.g., "1280x720")
    pub fn parse(s: &str) -> Result<Self> {
        let (width, height) = s
            .split_once('x')
            .ok_or_else(|| anyhow::anyhow!("Invalid viewport format. Use WIDTHxHEIGHT (e.g., 1280x720)"))?;

        let width = width
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("Invalid width in viewport size"))?;
        let height = height
            .parse::<u32>()
            .map_err(|_| anyhow::anyhow!("Invalid height in viewport size"))?;

        if width == 0 || height == 0 {
            anyhow::bail!("Viewport dimensions must be greater than zero");
        }

        Ok(ViewportSize { width, height })
    }
}

/// Caller supplied administrative labels, copied verbatim into every record.
///
/// These are free-form and never validated against any region directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminTags {
    pub province: Option<String>,
    pub regency: Option<String>,
    pub district: Option<String>,
    pub village: Option<String>,
}

/// One search run: what to look for, where, and how many results to keep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub location: String,
    pub tags: AdminTags,
    cap: usize,
}

impl SearchRequest {
    /// Build a validated request. A blank location or a zero cap is a
    /// configuration error.
    pub fn new(
        query: impl Into<String>,
        location: impl Into<String>,
        cap: usize,
    ) -> std::result::Result<Self, HarvestError> {
        let query = query.into();
        let location = location.into();

        if location.trim().is_empty() {
            return Err(HarvestError::Configuration(
                "--location is required".to_string(),
            ));
        }
        if cap == 0 {
            return Err(HarvestError::Configuration(
                "--max must be at least 1".to_string(),
            ));
        }

        Ok(SearchRequest {
            query,
            location,
            tags: AdminTags::default(),
            cap,
        })
    }

    pub fn with_tags(mut self, tags: AdminTags) -> Self {
        self.tags = tags;
        self
    }

    /// Maximum number of records the run may produce
    pub fn cap(&self) -> usize {
        self.cap
    }

    /// The text typed into the search box
    pub fn composed_query(&self) -> String {
        format!("{} {}", self.query.trim(), self.location.trim())
            .trim()
            .to_string()
    }
}

/// Latitude/longitude pair.
///
/// `(0, 0)` is the sentinel for "not recoverable from the page URL" and is
/// never a real location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub const UNKNOWN: Coordinates = Coordinates { lat: 0.0, lng: 0.0 };

    pub fn is_unknown(&self) -> bool {
        *self == Self::UNKNOWN
    }
}

impl Default for Coordinates {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

/// One discovered place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityRecord {
    /// Never empty
    pub name: String,
    pub address: String,
    pub coordinates: Coordinates,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(
        rename = "totalReviews",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub review_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Empty when the URL carries no place identifier
    pub place_id: String,
    pub province: String,
    pub regency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub village: Option<String>,
    /// Set when the record was extracted, not when the batch started
    #[serde(rename = "scrapedAt")]
    pub captured_at: DateTime<Utc>,
}

/// Scroll bookkeeping for one pagination pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    pub previous_height: u64,
    pub attempts_used: usize,
    pub attempt_budget: usize,
}

impl PaginationState {
    /// Budget is `ceil(requested_max / 10)` scroll attempts
    pub fn new(requested_max: usize) -> Self {
        PaginationState {
            previous_height: 0,
            attempts_used: 0,
            attempt_budget: requested_max.div_ceil(RESULTS_PER_SCROLL),
        }
    }

    pub fn budget_exhausted(&self) -> bool {
        self.attempts_used >= self.attempt_budget
    }

    /// Record a new height reading. Returns false when the height did not
    /// change since the previous reading.
    pub fn observe(&mut self, height: u64) -> bool {
        if height == self.previous_height {
            return false;
        }
        self.previous_height = height;
        true
    }
}

/// Why pagination stopped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "detail")]
pub enum PaginationStop {
    /// Feed height was unchanged after a scroll
    HeightStable,
    /// All scroll attempts were used
    BudgetExhausted,
    /// Scrolling or measuring the feed failed
    Fault(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationSummary {
    pub attempts: usize,
    pub stop: PaginationStop,
}

/// Lifecycle of a batch. There is no failed state: only items fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    #[default]
    Idle,
    Running,
    Completed,
}

/// Progress of the collection loop
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchProgress {
    pub status: BatchStatus,
    pub current: usize,
    pub total: usize,
    pub message: String,
}

impl BatchProgress {
    pub fn start(&mut self, total: usize) {
        self.status = BatchStatus::Running;
        self.current = 0;
        self.total = total;
        self.message = format!("Processing {} entries", total);
    }

    pub fn advance(&mut self, current: usize) {
        self.current = current;
        self.message = format!("Processing {}/{}", current, self.total);
    }

    pub fn complete(&mut self, recorded: usize) {
        self.status = BatchStatus::Completed;
        self.message = format!("Collected {} of {} entries", recorded, self.total);
    }
}

/// Final state of one opened entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum ItemOutcome {
    /// Record extracted and appended
    Recorded { name: String },
    /// Detail view had no usable name
    Excluded,
    /// Opening or extraction failed
    Skipped { reason: String },
}

/// Everything a completed batch produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub records: Vec<FacilityRecord>,
    pub outcomes: Vec<ItemOutcome>,
    pub pagination: PaginationSummary,
    /// Entries visible in the feed before capping
    pub discovered: usize,
    pub progress: BatchProgress,
}

impl BatchReport {
    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, ItemOutcome::Skipped { .. }))
            .count()
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
