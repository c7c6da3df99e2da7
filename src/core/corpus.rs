/// Batch ingestion — feeding directories or file lists of parsed
/// documents into a bank.
use log::{info, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::bank::NarrativeBank;
use crate::schema::document::Document;

#[derive(Debug, Error)]
pub enum CorpusError {
    /// The corpus root itself could not be read. Individual document
    /// failures are skipped and reported, never surfaced here.
    #[error("corpus directory unreadable: {0}")]
    Unreadable(#[from] std::io::Error),
}

/// Outcome of a batch ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub ingested: usize,
    pub skipped: usize,
}

impl NarrativeBank {
    /// Ingest every `.ron` document directly under `dir`, in path
    /// order.
    ///
    /// An unreadable directory is fatal; a single unparseable document
    /// is not.
    pub fn ingest_dir(&mut self, dir: &Path) -> Result<IngestReport, CorpusError> {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("ron") {
                files.push(path);
            }
        }
        // Directory iteration order is filesystem-dependent; sorting
        // keeps ingestion (and pair insertion order) reproducible.
        files.sort();
        Ok(self.ingest_files(&files))
    }

    /// Ingest a list of parsed-document files, in the order given.
    ///
    /// A document that fails to read or parse is logged and skipped;
    /// the rest of the batch continues.
    pub fn ingest_files(&mut self, files: &[PathBuf]) -> IngestReport {
        let mut report = IngestReport::default();
        for path in files {
            match Document::load(path) {
                Ok(doc) => {
                    self.add_document(&doc);
                    report.ingested += 1;
                }
                Err(err) => {
                    warn!("skipping {}: {}", path.display(), err);
                    report.skipped += 1;
                }
            }
        }
        info!(
            "ingested {} documents ({} skipped), {} events / {} pairs",
            report.ingested,
            report.skipped,
            self.unique_events(),
            self.unique_pairs()
        );
        report
    }
}
