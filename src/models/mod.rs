//! Core data models for search queries and exported paper records.

mod paper;
mod search;

pub use paper::{PaperId, PaperRecord, COLUMNS};
pub use search::{SearchQuery, DEFAULT_MAX_RESULTS};
