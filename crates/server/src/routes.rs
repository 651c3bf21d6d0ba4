//! Route table and JSON handlers.

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use gametrack_core::{
    catalog::{LookupRequest, SearchRequest},
    ApiError, CatalogQuery, PlaytimeSource,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::{auth::guard_pages, state::AppState};

/// Build the full router.
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/searchGames", get(search_games))
        .route("/popularGames", get(popular_games))
        .route("/fetchDlc", post(fetch_dlc))
        .route("/howlongtobeat", get(howlongtobeat))
        .route("/scrapeHowLongToBeat", get(scrape_howlongtobeat));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .route("/login", get(login_page))
        .route("/dashboard", get(dashboard_page))
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state.clone(), guard_pages))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct NameQuery {
    #[serde(default)]
    name: String,
}

async fn health() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

async fn search_games(
    State(state): State<Arc<AppState>>,
    request: Result<Query<SearchRequest>, QueryRejection>,
) -> Response {
    let result = match query_params(request).and_then(SearchRequest::into_query) {
        Ok(query) => state.catalog.execute(&query).await,
        Err(err) => Err(err),
    };
    json_result(result)
}

async fn popular_games(State(state): State<Arc<AppState>>) -> Response {
    json_result(state.catalog.execute(&CatalogQuery::popular(Utc::now())).await)
}

async fn fetch_dlc(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LookupRequest>, JsonRejection>,
) -> Response {
    let query = payload
        .map_err(|rejection| ApiError::InvalidInput(rejection.body_text()))
        .and_then(|Json(request)| request.into_query());
    let result = match query {
        Ok(query) => state.catalog.execute(&query).await,
        Err(err) => Err(err),
    };
    json_result(result)
}

async fn howlongtobeat(
    State(state): State<Arc<AppState>>,
    query: Result<Query<NameQuery>, QueryRejection>,
) -> Response {
    let result = match query_params(query) {
        Ok(query) => state.playtime.lookup(&query.name).await,
        Err(err) => Err(err),
    };
    json_result(result)
}

async fn scrape_howlongtobeat(
    State(state): State<Arc<AppState>>,
    query: Result<Query<NameQuery>, QueryRejection>,
) -> Response {
    let result = match query_params(query) {
        Ok(query) => state.scraper.lookup(&query.name).await,
        Err(err) => Err(err),
    };
    json_result(result)
}

async fn login_page() -> Html<&'static str> {
    Html("<!doctype html><title>Sign in</title><h1>Sign in</h1>")
}

async fn dashboard_page() -> Html<&'static str> {
    Html("<!doctype html><title>Dashboard</title><h1>Your games</h1>")
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not found")
}

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError::InvalidInput(rejection.body_text()))
}

fn json_result<T: Serialize>(result: Result<T, ApiError>) -> Response {
    match result {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(err) => error_response(&err),
    }
}

fn error_response(err: &ApiError) -> Response {
    if matches!(err, ApiError::MissingCredentials) {
        warn!("Catalog credentials are not configured");
    }
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}
