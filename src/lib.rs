//! # PubMed Papers
//!
//! Search PubMed for papers matching a query, pull the metadata of every hit
//! through the NCBI E-utilities API and export it as a CSV table, flagging
//! authors affiliated with pharmaceutical or biotech companies.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (SearchQuery, PaperRecord)
//! - [`sources`]: The [`PaperSource`] trait and the PubMed E-utilities client
//! - [`output`]: CSV table writer
//! - [`pipeline`]: Search, fetch and export driver
//! - [`utils`]: HTTP client, XML element tree and affiliation heuristics
//! - [`config`]: Configuration management

pub mod config;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use models::{PaperId, PaperRecord, SearchQuery};
pub use output::{ExportError, TableWriter};
pub use pipeline::{Pipeline, RunOutcome};
pub use sources::{PaperSource, PubMedClient, SourceError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
