use thiserror::Error;

/// Fatal errors of a harvest run. Each kind carries its own process exit code.
///
/// Pagination, field and item faults never appear here: they are absorbed
/// inside the paginator, extractor and collector and only show up in the
/// [`BatchReport`](crate::types::BatchReport).
#[derive(Debug, Error)]
pub enum HarvestError {
    /// Required input missing or invalid (exit code 2)
    #[error("Invalid configuration: {0}")]
    Configuration(String),
    /// Browser or WebDriver could not be started (exit code 3)
    #[error("Browser initialization failed: {0}")]
    Initialization(String),
    /// Landing page or search input never became available (exit code 4)
    #[error("Navigation failed: {0}")]
    Navigation(String),
    /// Results could not be written (exit code 5)
    #[error("Failed to write output: {0}")]
    Output(String),
    /// Generic error (exit code 1)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HarvestError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            HarvestError::Other(_) => 1,
            HarvestError::Configuration(_) => 2,
            HarvestError::Initialization(_) => 3,
            HarvestError::Navigation(_) => 4,
            HarvestError::Output(_) => 5,
        }
    }

    /// Wrap an error as a navigation failure, keeping the context chain.
    pub fn navigation(err: impl Into<anyhow::Error>) -> Self {
        HarvestError::Navigation(format!("{:#}", err.into()))
    }

    /// Wrap an error as an initialization failure, keeping the context chain.
    pub fn initialization(err: impl Into<anyhow::Error>) -> Self {
        HarvestError::Initialization(format!("{:#}", err.into()))
    }
}

impl From<std::io::Error> for HarvestError {
    fn from(err: std::io::Error) -> Self {
        HarvestError::Output(err.to_string())
    }
}

#[cfg(test)]
#[path = "errors_test.rs"]
mod errors_test;
