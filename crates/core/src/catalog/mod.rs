//! Catalog query building and forwarding.

/// Upstream transport and the forwarding client.
pub mod client;
/// Query-language statements for each catalog operation.
pub mod query;
/// Request shapes accepted from HTTP clients.
pub mod request;

pub use client::{CatalogClient, CatalogRequest, CatalogTransport, HttpTransport};
pub use query::{CatalogQuery, SearchFilters, GAME_FIELDS};
pub use request::{LookupRequest, SearchRequest};
