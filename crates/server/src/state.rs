use anyhow::{Context, Result};
use gametrack_core::{AppConfig, CatalogClient, HltbApiClient, HltbScraper, RouteGuard};

/// Shared, read-only state handed to every handler.
pub struct AppState {
    /// Catalog forwarder.
    pub catalog: CatalogClient,
    /// Playtime JSON search.
    pub playtime: HltbApiClient,
    /// Playtime scrape fallback.
    pub scraper: HltbScraper,
    /// Page guard.
    pub guard: RouteGuard,
    /// Cookie carrying the session token.
    pub session_cookie: String,
}

impl AppState {
    /// Build every client from `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            catalog: CatalogClient::new(config.catalog.clone())?,
            playtime: HltbApiClient::new(&config.playtime)?,
            scraper: HltbScraper::new(&config.scraper).context("failed to set up scraper")?,
            guard: RouteGuard::new(&config.auth.login_path, &config.auth.landing_path),
            session_cookie: config.auth.session_cookie.clone(),
        })
    }
}
