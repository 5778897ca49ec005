//! Paper sources.
//!
//! A [`PaperSource`] answers the two questions the pipeline asks: which papers
//! match a query, and what is the metadata of one paper. [`PubMedClient`] is
//! the real implementation backed by NCBI E-utilities; [`MockSource`] serves
//! canned data for tests.
//!
//! Both trait methods absorb failures: a failed search yields no identifiers,
//! a failed fetch yields `None`, and each failure is logged. Callers who need
//! the underlying [`SourceError`] use the `try_*` methods on [`PubMedClient`].

mod extract;
mod pubmed;

pub mod mock;

pub use extract::parse_fetch_response;
pub use mock::MockSource;
pub use pubmed::{parse_search_response, PubMedClient};

use crate::models::{PaperId, PaperRecord, SearchQuery};
use crate::utils::XmlError;
use async_trait::async_trait;

/// Something that can resolve a query to paper identifiers and an identifier
/// to a paper record.
#[async_trait]
pub trait PaperSource: Send + Sync + std::fmt::Debug {
    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Identifiers matching the query, in the order the source ranks them.
    ///
    /// Empty when nothing matched or when the search failed.
    async fn search_ids(&self, query: &SearchQuery) -> Vec<PaperId>;

    /// Metadata for a single paper, or `None` if it could not be fetched.
    async fn fetch_details(&self, id: &str) -> Option<PaperRecord>;
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or transport error
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status from the source
    #[error("API error: status {0}")]
    Api(reqwest::StatusCode),

    /// Parsing error (XML)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<XmlError> for SourceError {
    fn from(err: XmlError) -> Self {
        SourceError::Parse(format!("XML: {}", err))
    }
}

impl From<quick_xml::DeError> for SourceError {
    fn from(err: quick_xml::DeError) -> Self {
        SourceError::Parse(format!("XML: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SourceError::Api(reqwest::StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.to_string(), "API error: status 503 Service Unavailable");

        let err = SourceError::Parse("unexpected end of file".to_string());
        assert_eq!(err.to_string(), "Parse error: unexpected end of file");
    }
}
