//! # Tally API
//!
//! HTTP service that ingests pipe-delimited order files and serves the
//! resulting reports.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Tally API                                     │
//! │                                                                         │
//! │  ┌────────────────┐   ┌──────────────────────┐   ┌──────────────────┐  │
//! │  │  routes (axum) │──►│  services            │──►│ SubmissionStore  │  │
//! │  │                │   │  • ingestion         │   │ (tally-db)       │  │
//! │  │ • upload       │   │    └ tally_core::run │   │                  │  │
//! │  │ • history      │   │  • retrieval         │   │ SQLite           │  │
//! │  │ • file/download│   └──────────────────────┘   └──────────────────┘  │
//! │  └────────────────┘                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `TALLY_HTTP_PORT` - HTTP port (default: 8000)
//! - `TALLY_BIND_ADDR` - Interface to bind (default: 0.0.0.0)
//! - `TALLY_DATABASE_PATH` - SQLite file (default: data/tally.db)
//! - `TALLY_DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `TALLY_MAX_UPLOAD_BYTES` - Request body cap (default: 10 MiB)
//! - `RUST_LOG` - Log filter (default: info)

use std::sync::Arc;

use axum::Router;
use tally_db::SubmissionStore;

pub mod config;
pub mod error;
pub mod routes;
pub mod services;

// Re-exports
pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SubmissionStore>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(store: Arc<dyn SubmissionStore>, config: &ApiConfig) -> Self {
        AppState {
            store,
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

/// Builds the full HTTP application.
pub fn build_router(state: AppState) -> Router {
    routes::router(state)
}
