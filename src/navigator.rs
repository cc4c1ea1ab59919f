use anyhow::Context;
use tracing::{debug, info, warn};

use crate::errors::HarvestError;
use crate::page::{MapPage, PageContext};
use crate::timing::{settle, wait_until};
use crate::types::SearchRequest;

/// Opens the map service and submits a search
pub struct SearchNavigator<'a, P> {
    ctx: PageContext<'a, P>,
}

impl<'a, P: MapPage> SearchNavigator<'a, P> {
    pub fn new(ctx: PageContext<'a, P>) -> Self {
        SearchNavigator { ctx }
    }

    /// Navigate to the landing page, type `"{query} {location}"` into the
    /// search box and submit it.
    ///
    /// Fails with [`HarvestError::Navigation`] when the landing page or the
    /// search input never becomes available. A result feed that does not show
    /// up in time is only logged: pagination and collection then work with
    /// whatever rendered.
    pub async fn search(&self, request: &SearchRequest) -> Result<(), HarvestError> {
        let PageContext {
            page,
            selectors,
            timings,
        } = self.ctx;
        let composed = request.composed_query();
        info!("Searching: {}", composed);

        page.goto(&selectors.landing_url)
            .await
            .with_context(|| format!("Failed to open {}", selectors.landing_url))
            .map_err(HarvestError::navigation)?;

        wait_until(
            "landing page",
            timings.page_ready_wait,
            timings.poll_interval,
            || page.is_ready(),
        )
        .await
        .map_err(HarvestError::navigation)?;

        settle(timings.landing_settle).await;

        wait_until(
            "search input",
            timings.search_input_wait,
            timings.poll_interval,
            || page.is_present(&selectors.search_input),
        )
        .await
        .map_err(HarvestError::navigation)?;

        debug!("Submitting query into {}", selectors.search_input);
        page.submit_text(&selectors.search_input, &composed)
            .await
            .context("Failed to submit search")
            .map_err(HarvestError::navigation)?;

        if let Err(e) = wait_until(
            "result feed",
            timings.feed_wait,
            timings.poll_interval,
            || page.is_present(&selectors.result_feed),
        )
        .await
        {
            warn!("{}; continuing with whatever results rendered", e);
        }

        Ok(())
    }
}
