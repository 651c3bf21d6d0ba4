//! Shared domain models.

use chrono::{DateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A `{ "name": ... }` entry as the catalog returns for genres, themes and modes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Named {
    /// Display name.
    pub name: String,
}

/// Image reference expanded from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    /// Image identifier used to build CDN URLs.
    #[serde(default)]
    pub image_id: Option<String>,
    /// Protocol-relative URL when requested.
    #[serde(default)]
    pub url: Option<String>,
}

/// Platform descriptor attached to a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Platform name (e.g. `PlayStation 5`).
    pub name: String,
    /// Logo image, when expanded.
    #[serde(default)]
    pub platform_logo: Option<ImageRef>,
}

/// Read-through projection of a catalog game record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    /// Catalog identifier.
    pub id: u64,
    /// Title.
    #[serde(default)]
    pub name: String,
    /// URL slug.
    #[serde(default)]
    pub slug: Option<String>,
    /// Catalog category code (main game, DLC, bundle...).
    #[serde(default)]
    pub category: Option<u32>,
    /// Short description.
    #[serde(default)]
    pub summary: Option<String>,
    /// Longer narrative text.
    #[serde(default)]
    pub storyline: Option<String>,
    /// Cover art.
    #[serde(default)]
    pub cover: Option<ImageRef>,
    /// Platforms the game was released on.
    #[serde(default)]
    pub platforms: Option<Vec<Platform>>,
    /// Genre names.
    #[serde(default)]
    pub genres: Option<Vec<Named>>,
    /// Theme names.
    #[serde(default)]
    pub themes: Option<Vec<Named>>,
    /// Game mode names.
    #[serde(default)]
    pub game_modes: Option<Vec<Named>>,
    /// Player perspective names.
    #[serde(default)]
    pub player_perspectives: Option<Vec<Named>>,
    /// User rating.
    #[serde(default)]
    pub rating: Option<f64>,
    /// Combined user and critic rating.
    #[serde(default)]
    pub total_rating: Option<f64>,
    /// Critic rating.
    #[serde(default)]
    pub aggregated_rating: Option<f64>,
    /// Number of user ratings.
    #[serde(default)]
    pub rating_count: Option<u64>,
    /// First release as a Unix timestamp.
    #[serde(default)]
    pub first_release_date: Option<i64>,
    /// Base game this record is a version of.
    #[serde(default)]
    pub version_parent: Option<u64>,
    /// Base game this record extends (DLC, expansion).
    #[serde(default)]
    pub parent_game: Option<u64>,
    /// Ids of downloadable content.
    #[serde(default)]
    pub dlcs: Option<Vec<u64>>,
    /// Ids of expansions.
    #[serde(default)]
    pub expansions: Option<Vec<u64>>,
    /// Fields not modelled above, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Game {
    /// Whether this record is an edition or add-on of another title.
    pub fn is_variant(&self) -> bool {
        self.version_parent.is_some() || self.parent_game.is_some()
    }

    /// First release date, if known.
    pub fn release_date(&self) -> Option<DateTime<Utc>> {
        self.first_release_date
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
    }
}

/// Approximate completion times for a title, in hours.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaytimeEstimate {
    /// Name of the matched game as reported by the upstream.
    pub name: Option<String>,
    /// Main story.
    pub main: Option<f64>,
    /// Main story plus extras.
    pub main_extra: Option<f64>,
    /// Everything.
    pub completionist: Option<f64>,
}

static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(½)?\s*(hours?|hrs?|h|mins?|minutes?|m)?(?:\b|$)")
        .expect("invalid duration regex")
});

/// Parse a scraped duration label (`12½ Hours`, `45 Mins`, `--`) into hours.
pub fn parse_hours(label: &str) -> Option<f64> {
    let label = label.trim();
    if label.is_empty() || label.chars().all(|c| c == '-') {
        return None;
    }

    let caps = DURATION_RE.captures(label)?;
    let mut value: f64 = caps.get(1)?.as_str().parse().ok()?;
    if caps.get(2).is_some() {
        value += 0.5;
    }

    let unit = caps
        .get(3)
        .map(|m| m.as_str().to_ascii_lowercase())
        .unwrap_or_default();
    if unit.starts_with('m') {
        value /= 60.0;
    }

    Some(value)
}
