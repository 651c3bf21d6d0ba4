use chrono::{DateTime, Months, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ApiError;

/// Field projection requested for every game listing.
pub const GAME_FIELDS: &[&str] = &[
    "name",
    "category",
    "platforms.name",
    "platforms.platform_logo.image_id",
    "themes.name",
    "genres.name",
    "cover.image_id",
    "slug",
    "total_rating",
    "rating",
    "aggregated_rating",
    "rating_count",
    "game_modes.name",
    "dlcs",
    "expansions",
    "player_perspectives.name",
    "first_release_date",
    "release_dates.date",
    "storyline",
    "summary",
    "version_parent",
    "parent_game",
    "cover.url",
    "screenshots.url",
];

/// Catalog endpoint for game records.
pub const GAMES_ENDPOINT: &str = "games";

/// Platforms considered for the popularity listing (PlayStation 4, PC).
const POPULAR_PLATFORMS: &[u32] = &[48, 6];
const POPULAR_WINDOW_MONTHS: u32 = 12;
const POPULAR_MIN_AGGREGATED_RATING: u32 = 80;
const POPULAR_MIN_RATING_COUNT: u32 = 20;
const POPULAR_LIMIT: usize = 21;
const SEARCH_LIMIT: usize = 25;

static ENDPOINT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z_]+$").expect("invalid endpoint regex"));
static FIELD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.*]+$").expect("invalid field regex"));

/// Numeric filters resolved from the vocabulary tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    /// Platform id.
    pub platform: Option<u32>,
    /// Genre id.
    pub genre: Option<u32>,
    /// Game mode id.
    pub game_mode: Option<u32>,
    /// Player perspective id.
    pub perspective: Option<u32>,
    /// Theme id.
    pub theme: Option<u32>,
}

impl SearchFilters {
    fn clauses(&self) -> Vec<String> {
        [
            ("platforms", self.platform),
            ("genres", self.genre),
            ("game_modes", self.game_mode),
            ("player_perspectives", self.perspective),
            ("themes", self.theme),
        ]
        .into_iter()
        .filter_map(|(field, id)| id.map(|id| format!("{field} = {{{id}}}")))
        .collect()
    }
}

/// One catalog operation.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogQuery {
    /// Records of `endpoint` with the given ids.
    Lookup {
        /// Catalog endpoint, e.g. `games` or `dlcs`.
        endpoint: String,
        /// Fields to return; empty means every field.
        fields: Vec<String>,
        /// Record ids.
        ids: Vec<u64>,
    },
    /// Games with the given ids, using the standard projection.
    GamesById {
        /// Game ids.
        ids: Vec<u64>,
    },
    /// Highly rated recent releases.
    Popular {
        /// Only games released after this instant.
        since: DateTime<Utc>,
    },
    /// Free-text and/or filtered search over base titles.
    Search {
        /// Search text.
        text: Option<String>,
        /// Resolved filters.
        filters: SearchFilters,
    },
}

impl CatalogQuery {
    /// Game lookup by ids with the standard projection.
    pub fn games_by_id(ids: Vec<u64>) -> Self {
        CatalogQuery::GamesById { ids }
    }

    /// Popularity listing over the window ending at `now`.
    pub fn popular(now: DateTime<Utc>) -> Self {
        let since = now
            .checked_sub_months(Months::new(POPULAR_WINDOW_MONTHS))
            .unwrap_or(now);
        CatalogQuery::Popular { since }
    }

    /// Endpoint the statement is posted to.
    pub fn endpoint(&self) -> &str {
        match self {
            CatalogQuery::Lookup { endpoint, .. } => endpoint,
            CatalogQuery::GamesById { .. }
            | CatalogQuery::Popular { .. }
            | CatalogQuery::Search { .. } => GAMES_ENDPOINT,
        }
    }

    /// Short operation name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogQuery::Lookup { .. } => "lookup",
            CatalogQuery::GamesById { .. } => "games_by_id",
            CatalogQuery::Popular { .. } => "popular",
            CatalogQuery::Search { .. } => "search",
        }
    }

    /// Client message used when the upstream call fails.
    pub fn failure_message(&self) -> &'static str {
        match self {
            CatalogQuery::GamesById { .. } => "Failed to fetch games by ids from IGDB",
            CatalogQuery::Popular { .. } => "Failed to fetch popular games from IGDB",
            CatalogQuery::Lookup { .. } | CatalogQuery::Search { .. } => {
                "Failed to fetch data from IGDB"
            }
        }
    }

    /// Validate the input and render the query-language statement.
    pub fn statement(&self) -> Result<String, ApiError> {
        match self {
            CatalogQuery::Lookup {
                endpoint,
                fields,
                ids,
            } => lookup_statement(endpoint, fields, ids),
            CatalogQuery::GamesById { ids } => lookup_statement(GAMES_ENDPOINT, GAME_FIELDS, ids),
            CatalogQuery::Popular { since } => Ok(popular_statement(*since)),
            CatalogQuery::Search { text, filters } => Ok(search_statement(text.as_deref(), filters)),
        }
    }
}

fn lookup_statement<F: AsRef<str>>(
    endpoint: &str,
    fields: &[F],
    ids: &[u64],
) -> Result<String, ApiError> {
    if ids.is_empty() {
        return Err(ApiError::MissingInput("No IDs provided"));
    }
    if !ENDPOINT_RE.is_match(endpoint) {
        return Err(ApiError::InvalidInput(format!("Invalid endpoint: {endpoint}")));
    }
    let fields = fields.iter().map(|field| field.as_ref()).collect::<Vec<&str>>();
    if let Some(bad) = fields.iter().find(|field| !FIELD_RE.is_match(field)) {
        return Err(ApiError::InvalidInput(format!("Invalid field: {bad}")));
    }

    let fields = if fields.is_empty() {
        "*".to_string()
    } else {
        fields.join(", ")
    };
    let limit = ids.len();
    let ids = ids
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(",");

    Ok(format!("fields {fields}; where id = ({ids}); limit {limit};"))
}

fn popular_statement(since: DateTime<Utc>) -> String {
    let platforms = POPULAR_PLATFORMS
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "fields {}; where platforms = ({platforms}) & first_release_date > {} & aggregated_rating >= {POPULAR_MIN_AGGREGATED_RATING} & rating_count > {POPULAR_MIN_RATING_COUNT}; sort aggregated_rating desc; limit {POPULAR_LIMIT};",
        GAME_FIELDS.join(", "),
        since.timestamp(),
    )
}

fn search_statement(text: Option<&str>, filters: &SearchFilters) -> String {
    let mut statement = format!("fields {};", GAME_FIELDS.join(", "));
    if let Some(text) = text {
        statement.push_str(&format!(" search \"{}\";", escape(text)));
    }

    let mut conditions = vec!["version_parent = null".to_string(), "rating != null".to_string()];
    conditions.extend(filters.clauses());
    statement.push_str(&format!(" where {};", conditions.join(" & ")));

    // relevance ordering applies when searching by text
    if text.is_none() {
        statement.push_str(" sort rating desc;");
    }
    statement.push_str(&format!(" limit {SEARCH_LIMIT};"));
    statement
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
