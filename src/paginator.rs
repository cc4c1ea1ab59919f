use anyhow::Result;
use tracing::{debug, info, warn};

use crate::page::{MapPage, PageContext};
use crate::timing::settle;
use crate::types::{PaginationState, PaginationStop, PaginationSummary};

/// Scrolls the result feed so more entries load.
///
/// Each attempt scrolls the feed to its bottom, waits, and measures the feed's
/// content height. Pagination stops on the first unchanged reading, when the
/// `ceil(max / 10)` attempt budget runs out, or when scrolling fails. A single
/// unchanged reading is trusted without a second look, so a feed that is slow
/// to render can stop early.
pub struct ResultPaginator<'a, P> {
    ctx: PageContext<'a, P>,
}

impl<'a, P: MapPage> ResultPaginator<'a, P> {
    pub fn new(ctx: PageContext<'a, P>) -> Self {
        ResultPaginator { ctx }
    }

    /// Never fails: a scroll fault ends pagination and is reported in the summary.
    pub async fn paginate(&self, requested_max: usize) -> PaginationSummary {
        let mut state = PaginationState::new(requested_max);

        let stop = loop {
            if state.budget_exhausted() {
                break PaginationStop::BudgetExhausted;
            }
            match self.attempt(&mut state).await {
                Ok(true) => continue,
                Ok(false) => break PaginationStop::HeightStable,
                Err(e) => {
                    warn!("Feed scrolling failed, keeping entries loaded so far: {:#}", e);
                    break PaginationStop::Fault(format!("{:#}", e));
                }
            }
        };

        info!(
            "Pagination finished after {}/{} scroll(s): {:?}",
            state.attempts_used, state.attempt_budget, stop
        );

        PaginationSummary {
            attempts: state.attempts_used,
            stop,
        }
    }

    /// One scroll-and-measure cycle. Returns whether the feed grew.
    async fn attempt(&self, state: &mut PaginationState) -> Result<bool> {
        let feed = &self.ctx.selectors.result_feed;

        self.ctx.page.scroll_to_bottom(feed).await?;
        state.attempts_used += 1;

        settle(self.ctx.timings.scroll_settle).await;

        let height = self.ctx.page.scroll_height(feed).await?;
        debug!(
            "Scroll {}: feed height {} (was {})",
            state.attempts_used, height, state.previous_height
        );
        Ok(state.observe(height))
    }
}
