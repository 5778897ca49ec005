//! CSV table output.
//!
//! The header is always the fixed six-column schema from [`COLUMNS`], whatever
//! fields a record happens to populate, so every row lines up with it.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::models::{PaperRecord, COLUMNS};

/// Destination that means "standard output"
pub const STDOUT_DESTINATION: &str = "-";

/// Errors raised while writing the output table
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The destination could not be opened for writing
    #[error("cannot open {} for writing: {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing or flushing failed
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// CSV serialization failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Whether `destination` names standard output rather than a file
pub fn is_stdout(destination: &Path) -> bool {
    destination == Path::new(STDOUT_DESTINATION)
}

/// Writes paper records as a delimited table
#[derive(Debug, Clone, Copy)]
pub struct TableWriter {
    delimiter: u8,
}

impl Default for TableWriter {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl TableWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different field delimiter (e.g. `b'\t'`)
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Write the header and one row per record to any writer
    pub fn write_to<W: Write>(&self, records: &[PaperRecord], writer: W) -> Result<(), ExportError> {
        let mut table = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(writer);

        table.write_record(COLUMNS)?;
        for record in records {
            table.write_record(record.to_row())?;
        }
        table.flush()?;

        Ok(())
    }

    /// Create or truncate `destination` and write the table to it.
    ///
    /// `-` writes to standard output instead.
    pub fn write_table(&self, records: &[PaperRecord], destination: &Path) -> Result<(), ExportError> {
        if is_stdout(destination) {
            return self.write_to(records, io::stdout().lock());
        }

        let file = File::create(destination).map_err(|source| ExportError::Create {
            path: destination.to_path_buf(),
            source,
        })?;

        self.write_to(records, BufWriter::new(file))?;
        tracing::debug!(path = %destination.display(), rows = records.len(), "table written");
        Ok(())
    }
}
