#![warn(clippy::all, missing_docs)]

//! Core domain logic for the gametrack service.
//!
//! This crate hosts the data models, configuration handling, catalog
//! query building, playtime lookups and the small helpers (route guard,
//! text truncation) shared by the HTTP server and any future frontends.

pub mod catalog;
pub mod config;
pub mod error;
pub mod guard;
pub mod models;
pub mod playtime;
pub mod text;
pub mod vocabulary;

pub use catalog::{CatalogClient, CatalogQuery, HttpTransport, SearchRequest};
pub use config::AppConfig;
pub use error::ApiError;
pub use guard::{AuthUser, Navigation, RouteGuard};
pub use models::{Game, PlaytimeEstimate};
pub use playtime::{HltbApiClient, HltbScraper, PlaytimeSource};
pub use text::truncate;
