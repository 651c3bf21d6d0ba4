//! Scrape fallback: render the public search page and read the first result.

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::{config::ScraperConfig, error::ApiError, models::PlaytimeEstimate};

use super::{
    browser::{BrowserDriver, ChromeDriver, ScopedSession},
    require_name,
    selectors::SelectorSet,
    PlaytimeSource,
};

/// Looks estimates up by driving a headless browser, one browser per call.
pub struct HltbScraper<D = ChromeDriver> {
    driver: Arc<D>,
    selectors: Arc<SelectorSet>,
    search_url: String,
    wait_timeout: Duration,
}

impl HltbScraper<ChromeDriver> {
    /// Scraper backed by a local Chrome.
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        Self::with_driver(ChromeDriver::new(config.chrome_path.clone()), config)
    }
}

impl<D: BrowserDriver> HltbScraper<D> {
    /// Scraper backed by a custom driver.
    pub fn with_driver(driver: D, config: &ScraperConfig) -> Result<Self> {
        let selectors = SelectorSet::from_config(config).context("invalid scraper selectors")?;
        Ok(Self {
            driver: Arc::new(driver),
            selectors: Arc::new(selectors),
            search_url: config.search_url.clone(),
            wait_timeout: config.wait_timeout(),
        })
    }

    /// Search page URL for `name`.
    pub fn search_url(&self, name: &str) -> String {
        self.search_url
            .replace("{query}", &urlencoding::encode(name))
    }
}

fn scrape(
    driver: &dyn BrowserDriver,
    selectors: &SelectorSet,
    url: &str,
    timeout: Duration,
) -> Result<Option<PlaytimeEstimate>> {
    let mut session = ScopedSession::launch(driver)?;
    session.navigate(url)?;
    session.wait_for(selectors.result().as_str(), timeout)?;
    let html = session.content()?;
    if let Err(err) = session.close() {
        warn!(error = ?err, "Failed to close browser session");
    }
    Ok(selectors.extract(&html))
}

impl<D: BrowserDriver> PlaytimeSource for HltbScraper<D> {
    async fn lookup(&self, name: &str) -> Result<PlaytimeEstimate, ApiError> {
        let name = require_name(name)?;
        let url = self.search_url(name);
        info!(game = name, selectors = self.selectors.version(), "Scraping playtime estimate");

        let driver = Arc::clone(&self.driver);
        let selectors = Arc::clone(&self.selectors);
        let timeout = self.wait_timeout;
        let outcome = tokio::task::spawn_blocking(move || {
            scrape(driver.as_ref(), &selectors, &url, timeout)
        })
        .await
        .context("scrape task failed")
        .and_then(|result| result);

        match outcome {
            Ok(Some(estimate)) => Ok(estimate),
            Ok(None) => {
                warn!(game = name, "No results found");
                Err(ApiError::NotFound("No results found"))
            }
            Err(err) => {
                error!(game = name, error = ?err, "Scrape failed");
                Err(ApiError::upstream("Failed to fetch data from HLTB.", err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playtime::BrowserSession;
    use anyhow::bail;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Copy)]
    enum Behaviour {
        Render(&'static str),
        FailNavigation,
    }

    #[derive(Default)]
    struct Counters {
        launched: AtomicUsize,
        closed: AtomicUsize,
        visited: Mutex<Vec<String>>,
    }

    struct FakeDriver {
        behaviour: Behaviour,
        counters: Arc<Counters>,
    }

    struct FakeSession {
        behaviour: Behaviour,
        counters: Arc<Counters>,
    }

    impl BrowserDriver for FakeDriver {
        fn launch(&self) -> Result<Box<dyn BrowserSession>> {
            self.counters.launched.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FakeSession {
                behaviour: self.behaviour,
                counters: Arc::clone(&self.counters),
            }))
        }
    }

    impl BrowserSession for FakeSession {
        fn navigate(&mut self, url: &str) -> Result<()> {
            self.counters.visited.lock().push(url.to_string());
            match self.behaviour {
                Behaviour::FailNavigation => bail!("net::ERR_NAME_NOT_RESOLVED"),
                Behaviour::Render(_) => Ok(()),
            }
        }

        fn wait_for(&mut self, _selector: &str, _timeout: Duration) -> Result<()> {
            Ok(())
        }

        fn content(&mut self) -> Result<String> {
            match self.behaviour {
                Behaviour::Render(html) => Ok(html.to_string()),
                Behaviour::FailNavigation => bail!("no page"),
            }
        }

        fn close(&mut self) -> Result<()> {
            self.counters.closed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn scraper(behaviour: Behaviour) -> (HltbScraper<FakeDriver>, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        let driver = FakeDriver {
            behaviour,
            counters: Arc::clone(&counters),
        };
        let scraper =
            HltbScraper::with_driver(driver, &ScraperConfig::default()).expect("default config");
        (scraper, counters)
    }

    const FOUND: &str = r#"<div class="search_list_tidbit">
        <div class="search_list_title"><a>Portal 2</a></div>
        <div class="search_list_tidbit_short">8½ Hours</div>
        <div class="search_list_tidbit_main">13 Hours</div>
        <div class="search_list_tidbit_completionist">22 Hours</div>
    </div>"#;

    #[tokio::test]
    async fn returns_first_result_and_closes_browser() {
        let (scraper, counters) = scraper(Behaviour::Render(FOUND));
        let estimate = scraper.lookup("Portal 2").await.expect("estimate");
        assert_eq!(
            estimate,
            PlaytimeEstimate {
                name: Some("Portal 2".to_string()),
                main: Some(8.5),
                main_extra: Some(13.0),
                completionist: Some(22.0),
            }
        );
        assert_eq!(counters.launched.load(Ordering::SeqCst), 1);
        assert_eq!(counters.closed.load(Ordering::SeqCst), 1);
        assert_eq!(
            counters.visited.lock().as_slice(),
            ["https://howlongtobeat.com/search_results?page=1&query=Portal%202"]
        );
    }

    #[tokio::test]
    async fn missing_result_node_is_not_found_and_closes_browser() {
        let (scraper, counters) = scraper(Behaviour::Render("<p>nothing here</p>"));
        let err = scraper.lookup("Unknown Game").await.expect_err("no result");
        assert_eq!(err.to_string(), "No results found");
        assert_eq!(err.status_code(), 404);
        assert_eq!(counters.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_still_closes_browser() {
        let (scraper, counters) = scraper(Behaviour::FailNavigation);
        let err = scraper.lookup("Portal 2").await.expect_err("navigation fails");
        assert_eq!(err.to_string(), "Failed to fetch data from HLTB.");
        assert_eq!(counters.launched.load(Ordering::SeqCst), 1);
        assert_eq!(counters.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn blank_name_launches_nothing() {
        let (scraper, counters) = scraper(Behaviour::Render(FOUND));
        let err = scraper.lookup("").await.expect_err("blank");
        assert_eq!(err.to_string(), "Game name is required");
        assert_eq!(counters.launched.load(Ordering::SeqCst), 0);
    }
}
