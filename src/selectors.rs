//! Where things live on the map service's pages.

use serde::{Deserialize, Serialize};

/// Landing page of the map service
pub const LANDING_URL: &str = "https://www.google.com/maps";

/// CSS selectors for the landing page, the result feed and the detail view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapSelectors {
    pub landing_url: String,
    pub search_input: String,
    /// Scrollable container holding the result entries
    pub result_feed: String,
    /// One link per result entry
    pub entry_link: String,
    /// Place name in the open detail view
    pub heading: String,
    pub address: String,
    /// Combined rating and review count display
    pub rating_display: String,
    pub rating: String,
    pub reviews: String,
    pub phone: String,
    pub website: String,
}

impl Default for MapSelectors {
    fn default() -> Self {
        MapSelectors {
            landing_url: LANDING_URL.to_string(),
            search_input: "input#searchboxinput".to_string(),
            result_feed: r#"div[role="feed"]"#.to_string(),
            entry_link: r#"a[href*="/maps/place/"]"#.to_string(),
            heading: "h1".to_string(),
            address: r#"button[data-item-id="address"] div.fontBodyMedium"#.to_string(),
            rating_display: "div.F7nice".to_string(),
            rating: r#"div.F7nice span[aria-hidden="true"]"#.to_string(),
            reviews: r#"div.F7nice span[aria-label*="review"]"#.to_string(),
            phone: r#"button[data-item-id*="phone"] div.fontBodyMedium"#.to_string(),
            website: r#"a[data-item-id="authority"] div.fontBodyMedium"#.to_string(),
        }
    }
}
