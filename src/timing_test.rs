// Unit tests for bounded waits

use super::*;
use std::cell::Cell;

#[tokio::test]
async fn test_wait_until_ready_immediately() {
    let calls = Cell::new(0);
    let result = wait_until("thing", Duration::ZERO, Duration::ZERO, || {
        calls.set(calls.get() + 1);
        async { Ok(true) }
    })
    .await;

    assert!(result.is_ok());
    assert_eq!(calls.get(), 1);
}

#[tokio::test]
async fn test_wait_until_zero_budget_probes_once_then_times_out() {
    let calls = Cell::new(0);
    let result = wait_until("search input", Duration::ZERO, Duration::ZERO, || {
        calls.set(calls.get() + 1);
        async { Ok(false) }
    })
    .await;

    assert_eq!(calls.get(), 1);
    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "search input not available after 0ms");
}

#[tokio::test]
async fn test_wait_until_polls_until_condition() {
    let calls = Cell::new(0);
    let result = wait_until(
        "feed",
        Duration::from_secs(5),
        Duration::from_millis(1),
        || {
            calls.set(calls.get() + 1);
            let ready = calls.get() >= 3;
            async move { Ok(ready) }
        },
    )
    .await;

    assert!(result.is_ok());
    assert_eq!(calls.get(), 3);
}

#[tokio::test]
async fn test_wait_until_treats_probe_errors_as_not_ready() {
    let calls = Cell::new(0);
    let result = wait_until(
        "landing page",
        Duration::from_secs(5),
        Duration::from_millis(1),
        || {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move {
                if n == 1 {
                    anyhow::bail!("script error");
                }
                Ok(true)
            }
        },
    )
    .await;

    assert!(result.is_ok());
    assert_eq!(calls.get(), 2);
}

#[tokio::test]
async fn test_wait_until_times_out_with_positive_budget() {
    let result = wait_until(
        "result feed",
        Duration::from_millis(20),
        Duration::from_millis(5),
        || async { Ok(false) },
    )
    .await;

    let err = result.unwrap_err();
    assert!(err.to_string().contains("result feed not available after 20ms"));
}

#[test]
fn test_immediate_timings_are_zero() {
    let t = Timings::immediate();
    assert!(t.scroll_settle.is_zero());
    assert!(t.entry_settle.is_zero());
    assert!(t.feed_wait.is_zero());
    assert!(Timings::default().scroll_settle > Duration::ZERO);
}
