use std::future::Future;

use anyhow::{bail, Context, Result};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::{debug, error};

use crate::{
    config::{CatalogConfig, CatalogCredentials},
    error::ApiError,
};

use super::query::CatalogQuery;

/// A fully prepared catalog call.
#[derive(Debug, Clone)]
pub struct CatalogRequest {
    /// Absolute endpoint URL.
    pub url: String,
    /// Credentials for the required headers.
    pub credentials: CatalogCredentials,
    /// Query-language statement.
    pub body: String,
}

/// Sends prepared statements to the catalog.
pub trait CatalogTransport: Send + Sync {
    /// POST the statement and return the decoded JSON payload.
    fn post(&self, request: CatalogRequest) -> impl Future<Output = Result<Value>> + Send;
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport with a fresh connection pool.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("gametrack/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build catalog HTTP client")?;
        Ok(Self { client })
    }
}

impl CatalogTransport for HttpTransport {
    async fn post(&self, request: CatalogRequest) -> Result<Value> {
        let response = self
            .client
            .post(&request.url)
            .header("Client-ID", &request.credentials.client_id)
            .bearer_auth(&request.credentials.access_token)
            .header(CONTENT_TYPE, "text/plain")
            .body(request.body)
            .send()
            .await
            .with_context(|| format!("failed to reach {}", request.url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("{} answered {}: {}", request.url, status, body.trim());
        }

        response
            .json()
            .await
            .with_context(|| format!("invalid JSON from {}", request.url))
    }
}

/// Forwards catalog queries upstream and returns the payload verbatim.
#[derive(Debug, Clone)]
pub struct CatalogClient<T = HttpTransport> {
    config: CatalogConfig,
    transport: T,
}

impl CatalogClient<HttpTransport> {
    /// Client using the HTTP transport.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        Ok(Self::with_transport(config, HttpTransport::new()?))
    }
}

impl<T: CatalogTransport> CatalogClient<T> {
    /// Client using a custom transport.
    pub fn with_transport(config: CatalogConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// Validate, authenticate and forward `query`.
    ///
    /// Input is checked before credentials; neither failure reaches the
    /// transport.
    pub async fn execute(&self, query: &CatalogQuery) -> Result<Value, ApiError> {
        let body = query.statement()?;
        let credentials = self
            .config
            .credentials()
            .ok_or(ApiError::MissingCredentials)?;
        let url = format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            query.endpoint()
        );

        debug!(kind = query.kind(), %url, statement = %body, "Forwarding catalog query");
        self.transport
            .post(CatalogRequest {
                url,
                credentials,
                body,
            })
            .await
            .map_err(|err| {
                error!(kind = query.kind(), error = ?err, "Catalog request failed");
                ApiError::upstream(query.failure_message(), err)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{LookupRequest, SearchFilters, SearchRequest};
    use crate::models::Game;
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct RecordingTransport {
        calls: Arc<Mutex<Vec<CatalogRequest>>>,
        fail: bool,
    }

    impl RecordingTransport {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<CatalogRequest> {
            self.calls.lock().clone()
        }
    }

    impl CatalogTransport for RecordingTransport {
        async fn post(&self, request: CatalogRequest) -> Result<Value> {
            self.calls.lock().push(request);
            if self.fail {
                bail!("connection reset by peer");
            }
            Ok(json!([{
                "id": 1,
                "name": "Celeste",
                "slug": "celeste",
                "first_release_date": 1516665600,
                "genres": [{ "id": 8, "name": "Platform" }]
            }]))
        }
    }

    fn config(with_credentials: bool) -> CatalogConfig {
        let mut config = CatalogConfig {
            base_url: "https://catalog.test/v4/".to_string(),
            ..CatalogConfig::default()
        };
        if with_credentials {
            config.client_id = Some("client".to_string());
            config.access_token = Some("token".to_string());
        }
        config
    }

    #[tokio::test]
    async fn empty_ids_never_reach_transport() {
        let transport = RecordingTransport::default();
        let client = CatalogClient::with_transport(config(true), transport.clone());

        let err = client
            .execute(&CatalogQuery::games_by_id(Vec::new()))
            .await
            .expect_err("empty ids must fail");
        assert_eq!(err.to_string(), "No IDs provided");
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_credentials_short_circuit() {
        let transport = RecordingTransport::default();
        let client = CatalogClient::with_transport(config(false), transport.clone());

        for query in [
            CatalogQuery::games_by_id(vec![1, 2]),
            CatalogQuery::popular(chrono::Utc::now()),
            CatalogQuery::Search {
                text: Some("hades".to_string()),
                filters: SearchFilters::default(),
            },
        ] {
            let err = client.execute(&query).await.expect_err("no credentials");
            assert!(matches!(err, ApiError::MissingCredentials));
            assert_eq!(err.to_string(), "Missing IGDB credentials in environment variables");
        }
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn forwards_statement_and_returns_payload() -> anyhow::Result<()> {
        let transport = RecordingTransport::default();
        let client = CatalogClient::with_transport(config(true), transport.clone());
        let query = SearchRequest {
            query: Some("celeste".to_string()),
            ..SearchRequest::default()
        }
        .into_query()?;

        let payload = client.execute(&query).await?;
        let games: Vec<Game> = serde_json::from_value(payload)?;
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].name, "Celeste");
        assert!(!games[0].is_variant());
        assert_eq!(
            games[0].release_date().map(|d| d.date_naive().to_string()),
            Some("2018-01-23".to_string())
        );

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].url, "https://catalog.test/v4/games");
        assert_eq!(calls[0].credentials.client_id, "client");
        assert_eq!(calls[0].credentials.access_token, "token");
        assert_eq!(calls[0].body, query.statement()?);
        Ok(())
    }

    #[tokio::test]
    async fn upstream_failure_is_generic() {
        let transport = RecordingTransport::failing();
        let client = CatalogClient::with_transport(config(true), transport.clone());

        let err = client
            .execute(&CatalogQuery::popular(chrono::Utc::now()))
            .await
            .expect_err("transport fails");
        assert_eq!(err.to_string(), "Failed to fetch popular games from IGDB");
        assert_eq!(err.status_code(), 502);
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn each_query_reports_its_own_failure() -> anyhow::Result<()> {
        let transport = RecordingTransport::failing();
        let client = CatalogClient::with_transport(config(true), transport.clone());

        let dlc_lookup: LookupRequest = serde_json::from_value(json!({
            "ids": [101, 102],
            "endpoint": "dlcs"
        }))?;
        let search_by_ids = SearchRequest {
            ids: Some("1942,2000".to_string()),
            ..SearchRequest::default()
        };
        let search = SearchRequest {
            query: Some("hades".to_string()),
            ..SearchRequest::default()
        };

        for (query, message) in [
            (dlc_lookup.into_query()?, "Failed to fetch data from IGDB"),
            (search_by_ids.into_query()?, "Failed to fetch games by ids from IGDB"),
            (search.into_query()?, "Failed to fetch data from IGDB"),
            (
                CatalogQuery::popular(chrono::Utc::now()),
                "Failed to fetch popular games from IGDB",
            ),
        ] {
            let err = client.execute(&query).await.expect_err("transport fails");
            assert_eq!(err.to_string(), message, "{}", query.kind());
            assert_eq!(err.status_code(), 502);
        }
        assert_eq!(transport.calls().len(), 4);
        Ok(())
    }
}
