use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::extractor::RecordExtractor;
use crate::page::{MapPage, PageContext};
use crate::timing::settle;
use crate::types::{BatchProgress, FacilityRecord, ItemOutcome, SearchRequest};

/// What the collection loop produced
#[derive(Debug, Default)]
pub struct Collection {
    pub records: Vec<FacilityRecord>,
    pub outcomes: Vec<ItemOutcome>,
    /// Entries found in the feed before capping
    pub discovered: usize,
}

/// Opens result entries one at a time and extracts a record from each.
///
/// A failure on one entry is logged and recorded as skipped; the loop always
/// moves on to the next entry.
pub struct ResultCollector<'a, P> {
    ctx: PageContext<'a, P>,
    extractor: RecordExtractor<'a, P>,
}

impl<'a, P: MapPage> ResultCollector<'a, P> {
    pub fn new(ctx: PageContext<'a, P>) -> Self {
        ResultCollector {
            ctx,
            extractor: RecordExtractor::new(ctx),
        }
    }

    /// Collect up to `request.cap()` records. `on_progress` sees every
    /// progress change.
    pub async fn collect<F>(&self, request: &SearchRequest, mut on_progress: F) -> Collection
    where
        F: FnMut(&BatchProgress),
    {
        let discovered = match self.ctx.page.count(&self.ctx.selectors.entry_link).await {
            Ok(count) => count,
            Err(e) => {
                warn!("Could not list result entries: {:#}", e);
                0
            }
        };
        info!("Found {} places", discovered);
        let total = discovered.min(request.cap());

        let mut progress = BatchProgress::default();
        progress.start(total);
        on_progress(&progress);

        let mut collection = Collection {
            records: Vec::with_capacity(total),
            outcomes: Vec::with_capacity(total),
            discovered,
        };

        for i in 0..total {
            progress.advance(i + 1);
            on_progress(&progress);
            info!("Processing {}/{}...", i + 1, total);

            let outcome = match self.process(i, request).await {
                Ok(Some(record)) => {
                    info!("Scraped: {}", record.name);
                    let name = record.name.clone();
                    collection.records.push(record);
                    ItemOutcome::Recorded { name }
                }
                Ok(None) => {
                    warn!("Entry {} has no name, skipping", i + 1);
                    ItemOutcome::Excluded
                }
                Err(e) => {
                    warn!("Error processing place {}: {:#}", i + 1, e);
                    ItemOutcome::Skipped {
                        reason: format!("{:#}", e),
                    }
                }
            };
            collection.outcomes.push(outcome);
        }

        progress.complete(collection.records.len());
        on_progress(&progress);

        collection
    }

    async fn process(&self, index: usize, request: &SearchRequest) -> Result<Option<FacilityRecord>> {
        self.ctx
            .page
            .open_entry(&self.ctx.selectors.entry_link, index)
            .await
            .context("Failed to open entry")?;
        settle(self.ctx.timings.entry_settle).await;

        Ok(self.extractor.extract(request).await)
    }
}
