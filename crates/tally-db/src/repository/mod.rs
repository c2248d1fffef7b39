//! Repositories over the submission tables.
//!
//! Each repository owns a pool handle and speaks plain SQL. Multi-table
//! writes (a submission with its files and artifacts) go through one
//! transaction in [`submission::SubmissionRepository::insert`].
//!
//! ```text
//! submissions ─1:n─► submission_files ─1:n─► artifacts (input, output, error)
//! ```

pub mod artifact;
pub mod submission;
