//! Headless-browser sessions with guaranteed teardown.

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{anyhow, Context, Result};
use headless_chrome::{Browser, LaunchOptions, Tab};
use tracing::{debug, warn};

/// Starts isolated browser sessions.
pub trait BrowserDriver: Send + Sync + 'static {
    /// Launch a fresh browser with one page.
    fn launch(&self) -> Result<Box<dyn BrowserSession>>;
}

/// One page in one browser process. Calls block.
pub trait BrowserSession: Send {
    /// Navigate and wait for the load to finish.
    fn navigate(&mut self, url: &str) -> Result<()>;
    /// Wait until `selector` matches, up to `timeout`.
    fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<()>;
    /// Rendered document markup.
    fn content(&mut self) -> Result<String>;
    /// Shut the browser down. Called exactly once.
    fn close(&mut self) -> Result<()>;
}

/// Owns a session and closes it on every exit path.
///
/// [`ScopedSession::close`] ends the session explicitly; dropping an unclosed
/// guard (early return, `?`, panic) closes it as well.
pub struct ScopedSession {
    inner: Box<dyn BrowserSession>,
    closed: bool,
}

impl ScopedSession {
    /// Launch a session through `driver`.
    pub fn launch(driver: &dyn BrowserDriver) -> Result<Self> {
        let inner = driver.launch()?;
        debug!("Browser session started");
        Ok(Self {
            inner,
            closed: false,
        })
    }

    /// See [`BrowserSession::navigate`].
    pub fn navigate(&mut self, url: &str) -> Result<()> {
        self.inner.navigate(url)
    }

    /// See [`BrowserSession::wait_for`].
    pub fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<()> {
        self.inner.wait_for(selector, timeout)
    }

    /// See [`BrowserSession::content`].
    pub fn content(&mut self) -> Result<String> {
        self.inner.content()
    }

    /// Close the session now.
    pub fn close(mut self) -> Result<()> {
        self.closed = true;
        self.inner.close()
    }
}

impl Drop for ScopedSession {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(err) = self.inner.close() {
            warn!(error = ?err, "Failed to close browser session");
        } else {
            debug!("Browser session closed on unwind");
        }
    }
}

/// Drives a local Chrome/Chromium through the DevTools protocol.
#[derive(Debug, Clone, Default)]
pub struct ChromeDriver {
    chrome_path: Option<PathBuf>,
}

impl ChromeDriver {
    /// Use `chrome_path` instead of auto-detecting the browser binary.
    pub fn new(chrome_path: Option<PathBuf>) -> Self {
        Self { chrome_path }
    }
}

impl BrowserDriver for ChromeDriver {
    fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        let options = LaunchOptions::default_builder()
            .headless(true)
            .path(self.chrome_path.clone())
            .build()
            .map_err(|err| anyhow!("invalid browser launch options: {err}"))?;
        let browser = Browser::new(options).context("failed to launch headless browser")?;
        let tab = browser.new_tab().context("failed to open browser tab")?;
        Ok(Box::new(ChromeSession {
            browser: Some(browser),
            tab,
        }))
    }
}

struct ChromeSession {
    browser: Option<Browser>,
    tab: Arc<Tab>,
}

impl BrowserSession for ChromeSession {
    fn navigate(&mut self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .with_context(|| format!("failed to navigate to {url}"))?
            .wait_until_navigated()
            .context("page did not finish loading")?;
        Ok(())
    }

    fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<()> {
        self.tab
            .wait_for_element_with_custom_timeout(selector, timeout)
            .with_context(|| format!("`{selector}` did not appear within {timeout:?}"))?;
        Ok(())
    }

    fn content(&mut self) -> Result<String> {
        self.tab.get_content().context("failed to read page content")
    }

    fn close(&mut self) -> Result<()> {
        let tab_closed = self.tab.close(true);
        // dropping the browser kills the process
        drop(self.browser.take());
        tab_closed.map(|_| ()).context("failed to close browser tab")
    }
}
