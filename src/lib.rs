//! hatchling - memory journal tagging and export pipeline
//!
//! Resolves tags for journal entries with a remote classifier and local
//! fallbacks, submits entries to the journal service, and exports selected
//! entries as PDF, CSV or JSON documents.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::HatchlingError;
