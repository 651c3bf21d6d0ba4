//! Playtime estimates from the "how long to beat" service.
//!
//! Two sources share one contract: the JSON search API and a headless-browser
//! scrape of the public search page.

pub mod api;
pub mod browser;
pub mod scraper;
pub mod selectors;

use std::future::Future;

pub use api::HltbApiClient;
pub use browser::{BrowserDriver, BrowserSession, ChromeDriver, ScopedSession};
pub use scraper::HltbScraper;
pub use selectors::{Selector, SelectorSet, SelectorStrings};

use crate::{error::ApiError, models::PlaytimeEstimate};

/// A source of playtime estimates for a game name.
pub trait PlaytimeSource: Send + Sync {
    /// Best match for `name`.
    fn lookup(&self, name: &str)
        -> impl Future<Output = Result<PlaytimeEstimate, ApiError>> + Send;
}

pub(crate) fn require_name(name: &str) -> Result<&str, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::MissingInput("Game name is required"));
    }
    Ok(name)
}
