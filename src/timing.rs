//! Settle delays and bounded waits.
//!
//! The map UI exposes no "results ready" signal. Where a condition can be
//! observed (page loaded, element present) we poll it with a deadline via
//! [`wait_until`]. Scroll and entry-open transitions have nothing to observe,
//! so they keep fixed settle delays.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::debug;

/// Every delay and deadline used by a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timings {
    /// Max wait for the landing page to finish loading
    pub page_ready_wait: Duration,
    /// Quiet period after load, standing in for network idle
    pub landing_settle: Duration,
    /// Max wait for the search input to appear
    pub search_input_wait: Duration,
    /// Max wait for the result feed after submitting a search
    pub feed_wait: Duration,
    /// Delay after each feed scroll before measuring its height
    pub scroll_settle: Duration,
    /// Delay after opening an entry before reading its detail view
    pub entry_settle: Duration,
    /// Interval between readiness probes
    pub poll_interval: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Timings {
            page_ready_wait: Duration::from_secs(30),
            landing_settle: Duration::from_millis(2000),
            search_input_wait: Duration::from_secs(10),
            feed_wait: Duration::from_secs(15),
            scroll_settle: Duration::from_millis(1500),
            entry_settle: Duration::from_millis(2000),
            poll_interval: Duration::from_millis(200),
        }
    }
}

impl Timings {
    /// No delays at all. Readiness probes still run once.
    pub fn immediate() -> Self {
        Timings {
            page_ready_wait: Duration::ZERO,
            landing_settle: Duration::ZERO,
            search_input_wait: Duration::ZERO,
            feed_wait: Duration::ZERO,
            scroll_settle: Duration::ZERO,
            entry_settle: Duration::ZERO,
            poll_interval: Duration::ZERO,
        }
    }
}

/// Sleep for a fixed settle delay, skipping the timer entirely for zero.
pub async fn settle(delay: Duration) {
    if !delay.is_zero() {
        sleep(delay).await;
    }
}

/// Poll `probe` until it reports true or `max_wait` elapses.
///
/// The probe always runs at least once. A probe error counts as "not yet".
/// Expiry is an error naming `what` and the budget that ran out.
pub async fn wait_until<F, Fut>(
    what: &str,
    max_wait: Duration,
    poll_interval: Duration,
    mut probe: F,
) -> anyhow::Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<bool>>,
{
    let deadline = Instant::now() + max_wait;
    let mut probes = 0usize;

    loop {
        probes += 1;
        match probe().await {
            Ok(true) => {
                debug!("{} ready after {} probe(s)", what, probes);
                return Ok(());
            }
            Ok(false) => {}
            Err(e) => debug!("{} probe failed: {:#}", what, e),
        }

        let now = Instant::now();
        if now >= deadline {
            anyhow::bail!("{} not available after {}ms", what, max_wait.as_millis());
        }
        settle(poll_interval.min(deadline - now)).await;
    }
}

#[cfg(test)]
#[path = "timing_test.rs"]
mod timing_test;
