//! # tally-db: Storage Layer for Tally
//!
//! Submission history and processed-file artifacts, stored in SQLite through
//! sqlx.
//!
//! ```text
//! tally-api ──► SubmissionStore (store.rs) ──► Database (pool.rs)
//!                                                 │
//!                         SubmissionRepository ◄──┤──► ArtifactRepository
//!                                                 ▼
//!                              SQLite, schema from migrations/sqlite/
//!
//! tally-api --import-legacy ──► legacy.rs ──► SubmissionStore
//! ```
//!
//! ```rust,ignore
//! use tally_db::{Database, DbConfig, SubmissionStore};
//!
//! let db = Database::new(DbConfig::new("data/tally.db")).await?;
//! let history = db.list_submissions().await?;
//! ```

pub mod error;
pub mod legacy;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

pub use error::{DbError, DbResult};
pub use legacy::{import_legacy_history, ImportReport};
pub use pool::{Database, DbConfig, DbLocation};
pub use store::SubmissionStore;

pub use repository::artifact::{ArtifactRepository, NewArtifact, StoredArtifact};
pub use repository::submission::SubmissionRepository;
