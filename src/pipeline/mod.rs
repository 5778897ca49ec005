//! Search, fetch and export driver.
//!
//! ```text
//! search_ids ──▶ fetch_details (one id at a time) ──▶ write_table
//! ```
//!
//! The run stops early, without touching the destination, when the search
//! finds nothing or when every detail fetch fails.

use std::path::{Path, PathBuf};

use crate::models::{PaperRecord, SearchQuery};
use crate::output::{ExportError, TableWriter};
use crate::sources::PaperSource;

/// How a pipeline run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The search returned no identifiers
    NoPapersFound,

    /// Identifiers were found but no record could be fetched
    NoPapersToSave,

    /// The table was written
    Saved { count: usize, destination: PathBuf },
}

impl RunOutcome {
    /// Number of rows written
    pub fn saved(&self) -> usize {
        match self {
            RunOutcome::Saved { count, .. } => *count,
            _ => 0,
        }
    }
}

/// Runs a query against a source and writes the results
#[derive(Debug)]
pub struct Pipeline<'a> {
    source: &'a dyn PaperSource,
    writer: TableWriter,
}

impl<'a> Pipeline<'a> {
    pub fn new(source: &'a dyn PaperSource, writer: TableWriter) -> Self {
        Self { source, writer }
    }

    /// Fetch the record of every identifier in order, dropping the failures
    pub async fn fetch_all(&self, ids: &[String]) -> Vec<PaperRecord> {
        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(record) = self.source.fetch_details(id).await {
                records.push(record);
            }
        }
        records
    }

    /// Run the whole pipeline.
    ///
    /// Search and fetch failures are logged and absorbed; only a failure to
    /// write the destination is returned as an error.
    pub async fn run(
        &self,
        query: &SearchQuery,
        destination: &Path,
    ) -> Result<RunOutcome, ExportError> {
        tracing::debug!(source = self.source.name(), term = %query.term, "searching");

        let ids = self.source.search_ids(query).await;
        if ids.is_empty() {
            tracing::info!("No papers found.");
            return Ok(RunOutcome::NoPapersFound);
        }
        tracing::debug!(count = ids.len(), "fetching paper details");

        let records = self.fetch_all(&ids).await;
        if records.is_empty() {
            tracing::info!("No papers to save.");
            return Ok(RunOutcome::NoPapersToSave);
        }

        let flagged = records.iter().filter(|r| r.has_company_author()).count();
        tracing::debug!(
            rows = records.len(),
            with_company_authors = flagged,
            "writing table"
        );

        self.writer.write_table(&records, destination)?;
        tracing::info!(
            "Saved {} papers to {}",
            records.len(),
            destination.display()
        );

        Ok(RunOutcome::Saved {
            count: records.len(),
            destination: destination.to_path_buf(),
        })
    }
}
