use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::{
    error::ApiError,
    vocabulary::{Vocabulary, GAME_MODES, GENRES, PLATFORMS, PLAYER_PERSPECTIVES, THEMES},
};

use super::query::{CatalogQuery, SearchFilters, GAMES_ENDPOINT};

/// Query-string parameters of the game search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// Free-text search.
    pub query: Option<String>,
    /// Platform name.
    pub platform: Option<String>,
    /// Genre name.
    pub genre: Option<String>,
    /// Game mode name.
    pub game_mode: Option<String>,
    /// Player perspective name.
    pub perspective: Option<String>,
    /// Theme name.
    pub theme: Option<String>,
    /// Comma-separated game ids; when present the search becomes a lookup.
    pub ids: Option<String>,
}

impl SearchRequest {
    /// Translate into a catalog query, resolving filter names.
    ///
    /// Unknown filter names silently apply no filter.
    pub fn into_query(self) -> Result<CatalogQuery, ApiError> {
        let ids = split_ids(self.ids.as_deref())?;
        if !ids.is_empty() {
            return Ok(CatalogQuery::games_by_id(ids));
        }

        let named = [
            &self.platform,
            &self.genre,
            &self.game_mode,
            &self.perspective,
            &self.theme,
        ]
        .iter()
        .any(|name| non_empty(name.as_deref()).is_some());
        let text = non_empty(self.query.as_deref()).map(str::to_string);
        if text.is_none() && !named {
            return Err(ApiError::MissingInput("No search query provided"));
        }

        let filters = SearchFilters {
            platform: resolve(&PLATFORMS, self.platform.as_deref()),
            genre: resolve(&GENRES, self.genre.as_deref()),
            game_mode: resolve(&GAME_MODES, self.game_mode.as_deref()),
            perspective: resolve(&PLAYER_PERSPECTIVES, self.perspective.as_deref()),
            theme: resolve(&THEMES, self.theme.as_deref()),
        };
        Ok(CatalogQuery::Search { text, filters })
    }
}

/// JSON body of the generic by-id lookup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LookupRequest {
    /// Record ids as JSON numbers or numeric strings. Anything other than
    /// an array counts as no ids.
    #[serde(default)]
    pub ids: Option<Value>,
    /// Catalog endpoint; defaults to games.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Fields to return; defaults to every field.
    #[serde(default)]
    pub fields: Vec<String>,
}

impl LookupRequest {
    /// Translate into a catalog lookup.
    pub fn into_query(self) -> Result<CatalogQuery, ApiError> {
        let ids = match self.ids {
            Some(Value::Array(ids)) => ids.iter().map(raw_id).collect::<Result<Vec<_>, _>>()?,
            _ => Vec::new(),
        };
        let endpoint = self
            .endpoint
            .as_deref()
            .and_then(|e| non_empty(Some(e)))
            .unwrap_or(GAMES_ENDPOINT)
            .to_string();
        Ok(CatalogQuery::Lookup {
            endpoint,
            fields: self.fields,
            ids,
        })
    }
}

fn raw_id(value: &Value) -> Result<u64, ApiError> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| ApiError::InvalidInput(format!("Invalid ID: {n}"))),
        Value::String(text) => parse_id(text),
        other => Err(ApiError::InvalidInput(format!("Invalid ID: {other}"))),
    }
}

fn split_ids(raw: Option<&str>) -> Result<Vec<u64>, ApiError> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(parse_id)
        .collect()
}

fn parse_id(raw: &str) -> Result<u64, ApiError> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::InvalidInput(format!("Invalid ID: {raw}")))
}

fn resolve(table: &Vocabulary, name: Option<&str>) -> Option<u32> {
    let name = non_empty(name)?;
    let id = table.id_of(name);
    if id.is_none() {
        debug!(kind = table.kind(), name, "unknown filter name ignored");
    }
    id
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
