//! Batch driver: search, paginate, collect.

use std::future::Future;

use tracing::{debug, info, warn};

use crate::collector::ResultCollector;
use crate::errors::HarvestError;
use crate::navigator::SearchNavigator;
use crate::page::{MapPage, PageContext, PageSession};
use crate::paginator::ResultPaginator;
use crate::selectors::MapSelectors;
use crate::timing::Timings;
use crate::types::{BatchProgress, BatchReport, SearchRequest};
use crate::webdriver::{BrowserSession, SessionConfig};

/// Runs one search through the full collection pipeline
#[derive(Debug, Clone, Default)]
pub struct Harvester {
    pub selectors: MapSelectors,
    pub timings: Timings,
}

impl Harvester {
    pub fn new(selectors: MapSelectors, timings: Timings) -> Self {
        Harvester { selectors, timings }
    }

    /// Run a batch on an already open page.
    ///
    /// Only navigation problems are returned as errors. Pagination and
    /// per-entry faults are absorbed and show up in the report.
    pub async fn run<P: MapPage>(
        &self,
        page: &P,
        request: &SearchRequest,
    ) -> Result<BatchReport, HarvestError> {
        self.run_with_progress(page, request, |progress| {
            debug!("{:?}: {}", progress.status, progress.message)
        })
        .await
    }

    pub async fn run_with_progress<P, F>(
        &self,
        page: &P,
        request: &SearchRequest,
        mut on_progress: F,
    ) -> Result<BatchReport, HarvestError>
    where
        P: MapPage,
        F: FnMut(&BatchProgress),
    {
        let ctx = PageContext::new(page, &self.selectors, &self.timings);

        SearchNavigator::new(ctx).search(request).await?;

        let pagination = ResultPaginator::new(ctx).paginate(request.cap()).await;

        let mut last_progress = BatchProgress::default();
        let collection = ResultCollector::new(ctx)
            .collect(request, |progress| {
                on_progress(progress);
                last_progress = progress.clone();
            })
            .await;

        Ok(BatchReport {
            records: collection.records,
            outcomes: collection.outcomes,
            pagination,
            discovered: collection.discovered,
            progress: last_progress,
        })
    }

    /// Open a browser session, run the batch, and close the session on every
    /// path, exactly once.
    pub async fn harvest(
        &self,
        config: &SessionConfig,
        request: &SearchRequest,
    ) -> Result<BatchReport, HarvestError> {
        self.harvest_with(|| BrowserSession::open(config), request).await
    }

    /// [`Harvester::harvest`] over any session `open` produces. A session
    /// that fails to open is never closed.
    pub async fn harvest_with<S, F, Fut>(
        &self,
        open: F,
        request: &SearchRequest,
    ) -> Result<BatchReport, HarvestError>
    where
        S: PageSession,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<S, HarvestError>>,
    {
        let session = open().await?;

        let result = self.run(&session, request).await;

        match session.close().await {
            Ok(()) => info!("Browser closed"),
            Err(e) => warn!("Failed to close browser cleanly: {:#}", e),
        }

        if let Ok(report) = &result {
            info!(
                "Collected {} record(s) from {} discovered entries ({} skipped)",
                report.records.len(),
                report.discovered,
                report.skipped()
            );
        }
        result
    }
}
