// Scripted in-memory map page for pipeline tests

#![allow(dead_code)]

use anyhow::{Result, anyhow, bail};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use mapharvest::{MapPage, MapSelectors, PageSession};

/// One place shown in the result feed
#[derive(Debug, Clone, Default)]
pub struct FakeListing {
    pub name: Option<String>,
    pub address: Option<String>,
    /// (rating text, review text); `None` means no rating display at all
    pub rating: Option<(String, String)>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub url: String,
    pub fail_open: bool,
    pub fail_heading: bool,
}

impl FakeListing {
    /// A complete listing with a place URL carrying coordinates and a place id
    pub fn full(n: usize) -> Self {
        FakeListing {
            name: Some(format!("SD Negeri {}", n)),
            address: Some(format!("Jl. Sekolah No. {}", n)),
            rating: Some((format!("4.{}", n % 10), format!("({},{:03})", n, n))),
            phone: Some(format!("(021) 555-{:04}", n)),
            website: Some(format!("sdn{}.sch.id", n)),
            url: format!(
                "https://www.google.com/maps/place/SD+Negeri+{n}/@-6.2{n},106.8{n},17z/data=!4m6!3m5!1s0x2e69:0x{n}!8m2"
            ),
            fail_open: false,
            fail_heading: false,
        }
    }
}

#[derive(Debug, Default)]
struct FakeState {
    landing_loaded: bool,
    submitted: Vec<String>,
    scroll_calls: usize,
    heights: VecDeque<u64>,
    last_height: u64,
    open: Option<usize>,
    opened: Vec<usize>,
    /// Entries still in the feed, once it has re-rendered
    visible: Option<usize>,
}

/// A map page whose behaviour is scripted up front
pub struct FakePage {
    pub selectors: MapSelectors,
    pub listings: Vec<FakeListing>,
    pub search_input_present: bool,
    pub feed_present: bool,
    pub goto_fails: bool,
    pub never_ready: bool,
    pub list_entries_fails: bool,
    /// After the first entry is opened the feed re-renders with this many entries
    pub rerender_to: Option<usize>,
    closes: Arc<AtomicUsize>,
    state: Mutex<FakeState>,
}

impl FakePage {
    pub fn new(listings: Vec<FakeListing>) -> Self {
        FakePage {
            selectors: MapSelectors::default(),
            listings,
            search_input_present: true,
            feed_present: true,
            goto_fails: false,
            never_ready: false,
            list_entries_fails: false,
            rerender_to: None,
            closes: Arc::new(AtomicUsize::new(0)),
            state: Mutex::new(FakeState::default()),
        }
    }

    /// Heights returned by successive feed measurements; the last one repeats
    pub fn with_heights(self, heights: &[u64]) -> Self {
        self.state.lock().unwrap().heights = heights.iter().copied().collect();
        self
    }

    pub fn scroll_calls(&self) -> usize {
        self.state.lock().unwrap().scroll_calls
    }

    pub fn opened(&self) -> Vec<usize> {
        self.state.lock().unwrap().opened.clone()
    }

    pub fn submitted(&self) -> Vec<String> {
        self.state.lock().unwrap().submitted.clone()
    }

    /// Shared count of `close` calls, readable after the page is consumed
    pub fn close_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.closes)
    }

    fn open_listing(&self) -> Option<&FakeListing> {
        let open = self.state.lock().unwrap().open?;
        self.listings.get(open)
    }
}

impl MapPage for FakePage {
    async fn goto(&self, url: &str) -> Result<()> {
        if self.goto_fails {
            bail!("net::ERR_NAME_NOT_RESOLVED at {}", url);
        }
        self.state.lock().unwrap().landing_loaded = url == self.selectors.landing_url;
        Ok(())
    }

    async fn is_ready(&self) -> Result<bool> {
        Ok(!self.never_ready && self.state.lock().unwrap().landing_loaded)
    }

    async fn is_present(&self, selector: &str) -> Result<bool> {
        let s = &self.selectors;
        if selector == s.search_input {
            Ok(self.search_input_present)
        } else if selector == s.result_feed {
            Ok(self.feed_present)
        } else if selector == s.rating_display {
            Ok(self.open_listing().is_some_and(|l| l.rating.is_some()))
        } else {
            Ok(false)
        }
    }

    async fn submit_text(&self, selector: &str, text: &str) -> Result<()> {
        if selector != self.selectors.search_input || !self.search_input_present {
            bail!("Element not found: {}", selector);
        }
        self.state.lock().unwrap().submitted.push(text.to_string());
        Ok(())
    }

    async fn scroll_to_bottom(&self, selector: &str) -> Result<()> {
        if selector != self.selectors.result_feed || !self.feed_present {
            bail!("No element matches {}", selector);
        }
        self.state.lock().unwrap().scroll_calls += 1;
        Ok(())
    }

    async fn scroll_height(&self, selector: &str) -> Result<u64> {
        if selector != self.selectors.result_feed || !self.feed_present {
            bail!("No element matches {}", selector);
        }
        let mut state = self.state.lock().unwrap();
        if let Some(next) = state.heights.pop_front() {
            state.last_height = next;
        }
        Ok(state.last_height)
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        if self.list_entries_fails {
            bail!("stale element reference");
        }
        if selector != self.selectors.entry_link || !self.feed_present {
            return Ok(0);
        }
        Ok(self.listings.len())
    }

    async fn open_entry(&self, selector: &str, index: usize) -> Result<()> {
        if selector != self.selectors.entry_link {
            bail!("No element matches {}", selector);
        }
        let mut state = self.state.lock().unwrap();
        state.opened.push(index);
        let visible = state.visible.unwrap_or(self.listings.len());
        let listing = self
            .listings
            .get(index)
            .filter(|_| index < visible)
            .ok_or_else(|| anyhow!("Entry {} is no longer in the feed", index + 1))?;
        if listing.fail_open {
            bail!("stale element reference: entry {}", index);
        }
        state.open = Some(index);
        if state.visible.is_none() {
            state.visible = self.rerender_to;
        }
        Ok(())
    }

    async fn text_of(&self, selector: &str) -> Result<Option<String>> {
        let Some(listing) = self.open_listing() else {
            return Ok(None);
        };
        let s = &self.selectors;
        let text = if selector == s.heading {
            if listing.fail_heading {
                bail!("no such element: h1");
            }
            listing.name.clone()
        } else if selector == s.address {
            listing.address.clone()
        } else if selector == s.rating {
            listing.rating.as_ref().map(|(r, _)| r.clone())
        } else if selector == s.reviews {
            listing.rating.as_ref().map(|(_, r)| r.clone())
        } else if selector == s.phone {
            listing.phone.clone()
        } else if selector == s.website {
            listing.website.clone()
        } else {
            None
        };
        Ok(text)
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self
            .open_listing()
            .map(|l| l.url.clone())
            .unwrap_or_else(|| "https://www.google.com/maps/search/".to_string()))
    }
}

impl PageSession for FakePage {
    async fn close(self) -> Result<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
