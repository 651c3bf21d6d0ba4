//! Application configuration, built once at startup.
//!
//! Values are layered from built-in defaults, an optional TOML file in the
//! user configuration directory, `GAMETRACK__*` environment variables and
//! finally the catalog credential variables `IGDB_CLIENT_ID` and
//! `IGDB_ACCESS_TOKEN`.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::playtime::SelectorStrings;

/// Directory under the platform config dir holding `config.toml`.
pub const CONFIG_DIR: &str = "gametrack";
/// Environment variable carrying the catalog client identifier.
pub const CLIENT_ID_VAR: &str = "IGDB_CLIENT_ID";
/// Environment variable carrying the catalog bearer token.
pub const ACCESS_TOKEN_VAR: &str = "IGDB_ACCESS_TOKEN";

const DEFAULT_CONFIG: &str = r#"# gametrack configuration
#
# Catalog credentials are normally supplied through IGDB_CLIENT_ID and
# IGDB_ACCESS_TOKEN; values here are used when those are unset.

[server]
bind = "127.0.0.1:3000"
log_dir = "logs"

[catalog]
base_url = "https://api.igdb.com/v4"

[playtime]
search_url = "https://howlongtobeat.com/api/search"

[scraper]
search_url = "https://howlongtobeat.com/search_results?page=1&query={query}"
selector_version = "v1"
wait_timeout_secs = 30

[auth]
session_cookie = "sb-access-token"
login_path = "/login"
landing_path = "/dashboard"
"#;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener and logging.
    pub server: ServerConfig,
    /// Game catalog upstream.
    pub catalog: CatalogConfig,
    /// Playtime estimate JSON search.
    pub playtime: PlaytimeConfig,
    /// Headless-browser scrape fallback.
    pub scraper: ScraperConfig,
    /// Page guard settings.
    pub auth: AuthConfig,
}

/// HTTP listener and logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind.
    pub bind: String,
    /// Directory receiving the log file.
    pub log_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            log_dir: PathBuf::from("logs"),
        }
    }
}

/// Game catalog upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Base URL; the endpoint name is appended.
    pub base_url: String,
    /// Client identifier header value.
    pub client_id: Option<String>,
    /// Bearer token.
    pub access_token: Option<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.igdb.com/v4".to_string(),
            client_id: None,
            access_token: None,
        }
    }
}

/// Credentials required for every catalog call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogCredentials {
    /// Client identifier.
    pub client_id: String,
    /// Bearer token.
    pub access_token: String,
}

impl CatalogConfig {
    /// Both credentials, or `None` when either is absent or blank.
    pub fn credentials(&self) -> Option<CatalogCredentials> {
        let client_id = non_blank(self.client_id.as_deref())?;
        let access_token = non_blank(self.access_token.as_deref())?;
        Some(CatalogCredentials {
            client_id: client_id.to_string(),
            access_token: access_token.to_string(),
        })
    }
}

/// Playtime estimate JSON search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaytimeConfig {
    /// Search endpoint accepting a JSON body.
    pub search_url: String,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for PlaytimeConfig {
    fn default() -> Self {
        Self {
            search_url: "https://howlongtobeat.com/api/search".to_string(),
            user_agent: format!("gametrack/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Headless-browser scrape fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Search page template; `{query}` is replaced by the encoded game name.
    pub search_url: String,
    /// Built-in selector set to use.
    pub selector_version: String,
    /// Custom selectors replacing the built-in set.
    pub selectors: Option<SelectorStrings>,
    /// Upper bound on waiting for result markup.
    pub wait_timeout_secs: u64,
    /// Explicit Chrome/Chromium binary.
    pub chrome_path: Option<PathBuf>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            search_url: "https://howlongtobeat.com/search_results?page=1&query={query}"
                .to_string(),
            selector_version: "v1".to_string(),
            selectors: None,
            wait_timeout_secs: 30,
            chrome_path: None,
        }
    }
}

impl ScraperConfig {
    /// Result wait timeout.
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }
}

/// Page guard settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Cookie carrying the externally issued session token.
    pub session_cookie: String,
    /// Login page.
    pub login_path: String,
    /// Landing page for signed-in users.
    pub landing_path: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie: "sb-access-token".to_string(),
            login_path: "/login".to_string(),
            landing_path: "/dashboard".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from the default file location and the process environment.
    pub fn load() -> Result<Self> {
        let path = config_path();
        let mut config = Self::load_from(path.as_deref())?;
        config.apply_credentials(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load defaults, the optional file at `path` and `GAMETRACK__*` variables.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(
            Config::try_from(&AppConfig::default()).context("failed to encode defaults")?,
        );
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }
        builder
            .add_source(
                Environment::with_prefix("GAMETRACK")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .context("failed to assemble configuration")?
            .try_deserialize()
            .context("failed to parse configuration")
    }

    /// Override catalog credentials from `lookup` (normally the environment).
    pub fn apply_credentials(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(id) = lookup(CLIENT_ID_VAR).filter(|v| !v.trim().is_empty()) {
            self.catalog.client_id = Some(id);
        }
        if let Some(token) = lookup(ACCESS_TOKEN_VAR).filter(|v| !v.trim().is_empty()) {
            self.catalog.access_token = Some(token);
        }
    }
}

/// Location of `config.toml`, if a config directory exists on this platform.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join("config.toml"))
}

/// Write the default config file when none exists yet.
pub fn ensure_default_config() -> Result<()> {
    match config_path() {
        Some(path) => write_default_config(&path),
        None => Ok(()),
    }
}

/// Write the default config to `path` unless a file is already there.
pub fn write_default_config(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write config {}", path.display()))
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
