//! Reads the open detail view into a [`FacilityRecord`].
//!
//! Every field is read on its own. A missing or unreadable element only
//! affects that field; the name is the one field whose absence drops the
//! whole record.

use anyhow::Result;
use chrono::Utc;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::page::{MapPage, PageContext};
use crate::types::{Coordinates, FacilityRecord, SearchRequest};

lazy_static! {
    static ref COORDINATES_RE: Regex = Regex::new(r"@(-?\d+\.\d+),(-?\d+\.\d+)").unwrap();
    static ref PLACE_ID_RE: Regex = Regex::new(r"!1s([^!?&#/]+)").unwrap();
    static ref DECIMAL_RE: Regex = Regex::new(r"\d+(?:[.,]\d+)?").unwrap();
    static ref DIGIT_RUN_RE: Regex = Regex::new(r"\d[\d.,\x{a0}\x{202f}]*").unwrap();
}

/// Latitude/longitude from the first `@lat,lng` segment of a map URL, or the
/// `(0, 0)` sentinel when there is none. Both numbers need a fractional part.
pub fn parse_coordinates(url: &str) -> Coordinates {
    COORDINATES_RE
        .captures(url)
        .and_then(|caps| {
            let lat = caps[1].parse::<f64>().ok()?;
            let lng = caps[2].parse::<f64>().ok()?;
            Some(Coordinates { lat, lng })
        })
        .unwrap_or(Coordinates::UNKNOWN)
}

/// Place identifier from the `!1s<id>` data segment of a map URL, or empty.
pub fn parse_place_id(url: &str) -> String {
    PLACE_ID_RE
        .captures(url)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default()
}

/// First decimal number in `text`. A decimal comma is accepted ("4,5").
pub fn parse_rating(text: &str) -> Option<f64> {
    DECIMAL_RE
        .find(text)
        .and_then(|m| m.as_str().replace(',', ".").parse::<f64>().ok())
}

/// Review count from text such as "(1,234)" or "1.234 ulasan".
///
/// Takes the first run of digits and grouping separators and drops the
/// separators.
pub fn parse_review_count(text: &str) -> Option<u64> {
    let run = DIGIT_RUN_RE.find(text)?;
    let digits: String = run
        .as_str()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    digits.parse::<u64>().ok()
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

/// Produces a record from whatever detail view is currently open
pub struct RecordExtractor<'a, P> {
    ctx: PageContext<'a, P>,
}

impl<'a, P: MapPage> RecordExtractor<'a, P> {
    pub fn new(ctx: PageContext<'a, P>) -> Self {
        RecordExtractor { ctx }
    }

    /// `None` when the view has no usable name.
    pub async fn extract(&self, request: &SearchRequest) -> Option<FacilityRecord> {
        let selectors = self.ctx.selectors;

        let name = match self.ctx.page.text_of(&selectors.heading).await {
            Ok(text) => non_empty(text)?,
            Err(e) => {
                debug!("Name unreadable: {:#}", e);
                return None;
            }
        };

        let address = self.optional_text("address", &selectors.address).await;
        let (rating, review_count) = self.rating_and_reviews().await;
        let phone = self.optional_text("phone", &selectors.phone).await;
        let website = self.optional_text("website", &selectors.website).await;

        let (coordinates, place_id) = match self.ctx.page.current_url().await {
            Ok(url) => (parse_coordinates(&url), parse_place_id(&url)),
            Err(e) => {
                debug!("Current URL unavailable: {:#}", e);
                (Coordinates::UNKNOWN, String::new())
            }
        };

        let tags = &request.tags;
        Some(FacilityRecord {
            name,
            address: address.unwrap_or_default(),
            coordinates,
            rating,
            review_count,
            phone,
            website,
            place_id,
            province: tags.province.clone().unwrap_or_default(),
            regency: tags.regency.clone().unwrap_or_default(),
            district: tags.district.clone(),
            village: tags.village.clone(),
            captured_at: Utc::now(),
        })
    }

    async fn optional_text(&self, field: &str, selector: &str) -> Option<String> {
        match self.ctx.page.text_of(selector).await {
            Ok(text) => non_empty(text),
            Err(e) => {
                debug!("{} unreadable: {:#}", field, e);
                None
            }
        }
    }

    /// Both values stay absent when the rating display is missing.
    async fn rating_and_reviews(&self) -> (Option<f64>, Option<u64>) {
        match self.read_rating_display().await {
            Ok(values) => values,
            Err(e) => {
                debug!("Rating display unreadable: {:#}", e);
                (None, None)
            }
        }
    }

    async fn read_rating_display(&self) -> Result<(Option<f64>, Option<u64>)> {
        let selectors = self.ctx.selectors;
        let page = self.ctx.page;

        if !page.is_present(&selectors.rating_display).await? {
            return Ok((None, None));
        }

        let rating = page
            .text_of(&selectors.rating)
            .await
            .ok()
            .flatten()
            .and_then(|t| parse_rating(&t));
        let review_count = page
            .text_of(&selectors.reviews)
            .await
            .ok()
            .flatten()
            .and_then(|t| parse_review_count(&t));

        Ok((rating, review_count))
    }
}

#[cfg(test)]
#[path = "extractor_test.rs"]
mod extractor_test;
