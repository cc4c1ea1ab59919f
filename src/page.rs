//! The browser surface the collection pipeline drives.
//!
//! Pipeline components are generic over [`MapPage`] so the same search,
//! pagination and extraction logic runs against a WebDriver session or an
//! in-memory page in tests.

#![allow(async_fn_in_trait)]

use anyhow::Result;

use crate::selectors::MapSelectors;
use crate::timing::Timings;

/// One open page of the map service.
///
/// Implementations own a single page; callers never use it concurrently.
pub trait MapPage {
    /// Navigate to `url`
    async fn goto(&self, url: &str) -> Result<()>;

    /// Whether the current document has finished loading
    async fn is_ready(&self) -> Result<bool>;

    /// Whether at least one element matches `selector`
    async fn is_present(&self, selector: &str) -> Result<bool>;

    /// Replace the value of the input at `selector` with `text` and press Enter
    async fn submit_text(&self, selector: &str, text: &str) -> Result<()>;

    /// Scroll the element at `selector` to its full scroll height
    async fn scroll_to_bottom(&self, selector: &str) -> Result<()>;

    /// Content height of the element at `selector`
    async fn scroll_height(&self, selector: &str) -> Result<u64>;

    /// Number of elements currently matching `selector`
    async fn count(&self, selector: &str) -> Result<usize>;

    /// Open the `index`-th element matching `selector`.
    ///
    /// The element is looked up again on every call, so a feed that
    /// re-rendered since it was counted is read as it is now.
    async fn open_entry(&self, selector: &str, index: usize) -> Result<()>;

    /// Text of the first element matching `selector`, `None` if nothing matches
    async fn text_of(&self, selector: &str) -> Result<Option<String>>;

    /// Address of the current page
    async fn current_url(&self) -> Result<String>;
}

/// A page that owns its browser and is torn down once its batch is over
pub trait PageSession: MapPage + Sized {
    /// End the session
    async fn close(self) -> Result<()>;
}

/// The page plus everything needed to drive it, passed to each component
pub struct PageContext<'a, P> {
    pub page: &'a P,
    pub selectors: &'a MapSelectors,
    pub timings: &'a Timings,
}

impl<'a, P> PageContext<'a, P> {
    pub fn new(page: &'a P, selectors: &'a MapSelectors, timings: &'a Timings) -> Self {
        PageContext {
            page,
            selectors,
            timings,
        }
    }
}

impl<P> Clone for PageContext<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for PageContext<'_, P> {}
