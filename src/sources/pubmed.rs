//! PubMed client using the NCBI E-utilities API.
//!
//! Two endpoints are used, one request each, strictly in sequence:
//! `esearch.fcgi` resolves a query to PMIDs and `efetch.fcgi` returns the
//! record for one PMID.

use async_trait::async_trait;
use quick_xml::de::from_str;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::{Config, EutilsConfig};
use crate::models::{PaperId, PaperRecord, SearchQuery};
use crate::sources::{parse_fetch_response, PaperSource, SourceError};
use crate::utils::HttpClient;

const ESEARCH_PATH: &str = "esearch.fcgi";
const EFETCH_PATH: &str = "efetch.fcgi";
const DATABASE: &str = "pubmed";
const RETURN_MODE: &str = "xml";

type QueryParams = Vec<(&'static str, String)>;

/// PubMed paper source
#[derive(Debug, Clone)]
pub struct PubMedClient {
    client: HttpClient,
    eutils: EutilsConfig,
}

impl PubMedClient {
    /// Create a client with default settings
    pub fn new() -> Result<Self, SourceError> {
        Self::from_config(&Config::default())
    }

    /// Create a client from application configuration
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        Ok(Self {
            client: HttpClient::with_config(&config.http)?,
            eutils: config.eutils.clone(),
        })
    }

    /// Create with a custom HTTP client (for testing)
    pub fn with_client(client: HttpClient, eutils: EutilsConfig) -> Self {
        Self { client, eutils }
    }

    /// Point the client at a different E-utilities base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.eutils.base_url = base_url.into();
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.eutils.base_url.trim_end_matches('/'), path)
    }

    /// Parameters NCBI asks every client to send
    fn identity_params(&self) -> QueryParams {
        let mut params = vec![("tool", self.eutils.tool.clone())];
        if let Some(email) = &self.eutils.email {
            params.push(("email", email.clone()));
        }
        if let Some(api_key) = &self.eutils.api_key {
            params.push(("api_key", api_key.clone()));
        }
        params
    }

    fn search_params(&self, query: &SearchQuery) -> QueryParams {
        let mut params = vec![
            ("db", DATABASE.to_string()),
            ("term", query.term.clone()),
            ("retmax", query.max_results.to_string()),
            ("retmode", RETURN_MODE.to_string()),
        ];
        params.extend(self.identity_params());
        params
    }

    fn fetch_params(&self, id: &str) -> QueryParams {
        let mut params = vec![
            ("db", DATABASE.to_string()),
            ("id", id.to_string()),
            ("retmode", RETURN_MODE.to_string()),
        ];
        params.extend(self.identity_params());
        params
    }

    /// GET the endpoint and return the body of a `200 OK` response
    async fn get_xml(&self, path: &str, params: &QueryParams) -> Result<String, SourceError> {
        let url = self.endpoint(path);
        tracing::debug!(url = %url, ?params, "E-utilities request");

        let response = self.client.client().get(&url).query(params).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(SourceError::Api(status));
        }

        Ok(response.text().await?)
    }

    /// Search PubMed, surfacing any failure as a [`SourceError`]
    pub async fn try_search_ids(&self, query: &SearchQuery) -> Result<Vec<PaperId>, SourceError> {
        query.validate()?;

        let xml = self.get_xml(ESEARCH_PATH, &self.search_params(query)).await?;
        let ids = parse_search_response(&xml)?;

        tracing::debug!(term = %query.term, count = ids.len(), "esearch returned identifiers");
        Ok(ids)
    }

    /// Fetch one paper, surfacing any failure as a [`SourceError`]
    pub async fn try_fetch_details(&self, id: &str) -> Result<PaperRecord, SourceError> {
        if id.trim().is_empty() {
            return Err(SourceError::InvalidRequest(
                "paper id must not be empty".to_string(),
            ));
        }

        let xml = self.get_xml(EFETCH_PATH, &self.fetch_params(id)).await?;
        parse_fetch_response(&xml, id)
    }
}

/// Parse an esearch response into identifiers, in document order
pub fn parse_search_response(xml: &str) -> Result<Vec<PaperId>, SourceError> {
    #[derive(Debug, Deserialize)]
    #[allow(non_snake_case)]
    struct ESearchResult {
        #[serde(default)]
        IdList: Option<IdList>,
    }

    #[derive(Debug, Deserialize)]
    struct IdList {
        #[serde(rename = "Id", default)]
        ids: Vec<String>,
    }

    let result: ESearchResult = from_str(xml)?;

    Ok(result
        .IdList
        .map(|list| list.ids)
        .unwrap_or_default()
        .into_iter()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect())
}

#[async_trait]
impl PaperSource for PubMedClient {
    fn name(&self) -> &str {
        "PubMed"
    }

    async fn search_ids(&self, query: &SearchQuery) -> Vec<PaperId> {
        match self.try_search_ids(query).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!(error = %e, "Error fetching paper IDs.");
                Vec::new()
            }
        }
    }

    async fn fetch_details(&self, id: &str) -> Option<PaperRecord> {
        match self.try_fetch_details(id).await {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::error!(error = %e, "Error fetching paper details for {}", id);
                None
            }
        }
    }
}
