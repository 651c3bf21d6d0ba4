//! Client for the estimate service's JSON search.

use anyhow::{bail, Context, Result};
use reqwest::header::{ORIGIN, REFERER};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::{config::PlaytimeConfig, error::ApiError, models::PlaytimeEstimate};

use super::{require_name, PlaytimeSource};

const SITE: &str = "https://howlongtobeat.com";
const PAGE_SIZE: u32 = 20;

/// One search hit; durations are in seconds.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchEntry {
    /// Upstream game id.
    pub game_id: u64,
    /// Matched title.
    pub game_name: String,
    /// Main story.
    pub comp_main: u64,
    /// Main story plus extras.
    pub comp_plus: u64,
    /// Completionist.
    pub comp_100: u64,
}

impl From<SearchEntry> for PlaytimeEstimate {
    fn from(entry: SearchEntry) -> Self {
        PlaytimeEstimate {
            name: Some(entry.game_name).filter(|n| !n.is_empty()),
            main: seconds_to_hours(entry.comp_main),
            main_extra: seconds_to_hours(entry.comp_plus),
            completionist: seconds_to_hours(entry.comp_100),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<SearchEntry>,
}

/// Rounded to the nearest half hour; zero means "no data".
fn seconds_to_hours(seconds: u64) -> Option<f64> {
    if seconds == 0 {
        return None;
    }
    Some((seconds as f64 / 3600.0 * 2.0).round() / 2.0)
}

/// Looks estimates up through the JSON search and keeps the first hit.
#[derive(Debug, Clone)]
pub struct HltbApiClient {
    client: reqwest::Client,
    search_url: String,
}

impl HltbApiClient {
    /// Build a client from configuration.
    pub fn new(config: &PlaytimeConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .build()
            .context("failed to build playtime HTTP client")?;
        Ok(Self {
            client,
            search_url: config.search_url.clone(),
        })
    }

    /// Raw search hits for `name`, in upstream order.
    pub async fn search(&self, name: &str) -> Result<Vec<SearchEntry>> {
        let body = json!({
            "searchType": "games",
            "searchTerms": name.split_whitespace().collect::<Vec<_>>(),
            "searchPage": 1,
            "size": PAGE_SIZE,
            "searchOptions": {
                "games": {
                    "userId": 0,
                    "platform": "",
                    "sortCategory": "popular",
                    "rangeCategory": "main",
                    "rangeTime": { "min": 0, "max": 0 },
                    "gameplay": { "perspective": "", "flow": "", "genre": "" },
                    "modifier": ""
                },
                "users": { "sortCategory": "postcount" },
                "filter": "",
                "sort": 0,
                "randomizer": 0
            }
        });

        let response = self
            .client
            .post(&self.search_url)
            .header(REFERER, format!("{SITE}/"))
            .header(ORIGIN, SITE)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("failed to reach {}", self.search_url))?;

        let status = response.status();
        if !status.is_success() {
            bail!("{} answered {}", self.search_url, status);
        }

        let decoded: SearchResponse = response
            .json()
            .await
            .context("failed to decode playtime search response")?;
        Ok(decoded.data)
    }
}

impl PlaytimeSource for HltbApiClient {
    async fn lookup(&self, name: &str) -> Result<PlaytimeEstimate, ApiError> {
        let name = require_name(name)?;
        info!(game = name, "Looking up playtime estimate");

        let entries = self.search(name).await.map_err(|err| {
            error!(game = name, error = ?err, "Playtime search failed");
            ApiError::upstream("Failed to fetch data", err)
        })?;

        entries
            .into_iter()
            .next()
            .map(PlaytimeEstimate::from)
            .ok_or(ApiError::NotFound("No results found"))
    }
}
