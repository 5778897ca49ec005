//! Search request model.

use serde::{Deserialize, Serialize};

use crate::sources::SourceError;

/// Default upper bound on the number of identifiers requested from esearch
pub const DEFAULT_MAX_RESULTS: usize = 100;

/// Search query parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text query, passed through to PubMed untouched
    pub term: String,

    /// Maximum number of identifiers to return (single bounded page)
    pub max_results: usize,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            term: String::new(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl SearchQuery {
    /// Create a new search query
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Default::default()
        }
    }

    /// Set maximum results
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Check the query before it is sent anywhere
    pub fn validate(&self) -> Result<(), SourceError> {
        if self.term.trim().is_empty() {
            return Err(SourceError::InvalidRequest(
                "search term must not be empty".to_string(),
            ));
        }
        if self.max_results == 0 {
            return Err(SourceError::InvalidRequest(
                "max_results must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }
}
