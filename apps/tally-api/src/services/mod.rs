//! Request-independent service logic behind the HTTP handlers.
//!
//! Handlers in `routes` extract and encode; everything they decide lives here
//! and works against `&dyn SubmissionStore`.

pub mod ingestion;
pub mod retrieval;
