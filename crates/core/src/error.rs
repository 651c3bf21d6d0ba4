//! Client-facing error taxonomy.

use thiserror::Error;

/// Errors surfaced to HTTP clients as `{ "error": <message> }`.
///
/// The `Display` output of every variant is exactly the message the client
/// sees; upstream causes are kept for logging only.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Required request input was absent.
    #[error("{0}")]
    MissingInput(&'static str),
    /// Request input was present but unusable.
    #[error("{0}")]
    InvalidInput(String),
    /// Catalog credentials were not configured.
    #[error("Missing IGDB credentials in environment variables")]
    MissingCredentials,
    /// The upstream answered but had nothing matching.
    #[error("{0}")]
    NotFound(&'static str),
    /// Transport, status or parsing failure talking to an upstream.
    #[error("{message}")]
    Upstream {
        /// Generic message returned to the client.
        message: &'static str,
        /// Underlying cause, logged but never returned.
        #[source]
        source: anyhow::Error,
    },
}

impl ApiError {
    /// Wrap an upstream failure behind a generic client message.
    pub fn upstream(message: &'static str, source: anyhow::Error) -> Self {
        Self::Upstream { message, source }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::MissingInput(_) | ApiError::InvalidInput(_) => 400,
            ApiError::MissingCredentials => 500,
            ApiError::NotFound(_) => 404,
            ApiError::Upstream { .. } => 502,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_hides_cause() {
        let err = ApiError::upstream(
            "Failed to fetch data from IGDB",
            anyhow::anyhow!("connection refused"),
        );
        assert_eq!(err.to_string(), "Failed to fetch data from IGDB");
        assert_eq!(err.status_code(), 502);
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("connection refused"));
    }

    #[test]
    fn credentials_message() {
        assert_eq!(
            ApiError::MissingCredentials.to_string(),
            "Missing IGDB credentials in environment variables"
        );
    }
}
