//! Mock source for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::models::{PaperId, PaperRecord, SearchQuery};
use crate::sources::PaperSource;

/// A mock source that returns predefined identifiers and records and keeps
/// track of what it was asked for.
#[derive(Debug, Default)]
pub struct MockSource {
    ids: Mutex<Vec<PaperId>>,
    records: Mutex<HashMap<PaperId, PaperRecord>>,
    searches: Mutex<Vec<SearchQuery>>,
    fetched: Mutex<Vec<PaperId>>,
}

impl MockSource {
    /// Create a new mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identifiers returned by every search.
    pub fn with_ids<I, S>(self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PaperId>,
    {
        *self.ids.lock().unwrap() = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Register a record; identifiers without one fail to fetch.
    pub fn with_record(self, record: PaperRecord) -> Self {
        self.records
            .lock()
            .unwrap()
            .insert(record.pubmed_id.clone(), record);
        self
    }

    /// Queries received so far.
    pub fn searches(&self) -> Vec<SearchQuery> {
        self.searches.lock().unwrap().clone()
    }

    /// Identifiers fetched so far, in call order.
    pub fn fetched(&self) -> Vec<PaperId> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaperSource for MockSource {
    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn search_ids(&self, query: &SearchQuery) -> Vec<PaperId> {
        self.searches.lock().unwrap().push(query.clone());
        self.ids.lock().unwrap().clone()
    }

    async fn fetch_details(&self, id: &str) -> Option<PaperRecord> {
        self.fetched.lock().unwrap().push(id.to_string());
        self.records.lock().unwrap().get(id).cloned()
    }
}

/// Helper function to create a record for testing.
pub fn make_record(pubmed_id: &str, title: &str) -> PaperRecord {
    PaperRecord {
        pubmed_id: pubmed_id.to_string(),
        title: title.to_string(),
        publication_date: "2024-01-01".to_string(),
        non_academic_authors: vec!["Jane Doe".to_string()],
        company_affiliations: vec!["Acme Therapeutics, Boston, MA".to_string()],
        corresponding_author_email: Some(format!("author{}@acme.com", pubmed_id)),
    }
}
