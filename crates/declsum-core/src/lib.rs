pub mod aggregate;
pub mod diagnostics;
pub mod error;
pub mod extraction;
pub mod model;
pub mod options;
pub mod parsing;

use diagnostics::DocumentWarning;
use error::DeclsumError;
use extraction::TableExtractor;
use model::{CombinedTable, SourceDocument, TypedRow};
use options::ExtractOptions;
use parsing::Rejection;
use serde::Serialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Result of processing a batch of PDFs.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProcessOutcome {
    /// Combined table, or `None` when no document was accepted.
    pub table: Option<CombinedTable>,
    /// Documents without a usable table, in input order.
    pub no_table_files: Vec<String>,
    pub warnings: Vec<DocumentWarning>,
}

/// Main API entry point: extract, filter and total the declaration tables of
/// every document.
///
/// Documents are processed in order and independently. A failing document
/// never aborts the batch; it is reported through `no_table_files` and/or
/// `warnings` instead.
pub fn process_documents(
    documents: &[SourceDocument],
    extractor: &dyn TableExtractor,
    options: &ExtractOptions,
) -> ProcessOutcome {
    let sources = documents.iter().map(|doc| (doc.name.clone(), Source::Bytes(&doc.bytes)));
    process_batch(sources, extractor, options)
}

/// Read PDFs from disk and process them, named by their file names.
///
/// A file that cannot be read is reported like any other per-document
/// processing error.
pub fn process_pdf_files(
    paths: &[PathBuf],
    extractor: &dyn TableExtractor,
    options: &ExtractOptions,
) -> ProcessOutcome {
    let sources = paths.iter().map(|path| {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        (name, Source::File(path))
    });
    process_batch(sources, extractor, options)
}

enum Source<'a> {
    Bytes(&'a [u8]),
    File(&'a Path),
}

impl Source<'_> {
    fn load(&self) -> Result<Cow<'_, [u8]>, DeclsumError> {
        match self {
            Source::Bytes(bytes) => Ok(Cow::Borrowed(*bytes)),
            Source::File(path) => Ok(Cow::Owned(std::fs::read(path)?)),
        }
    }
}

enum DocumentFailure {
    Rejected(Rejection),
    Extraction(DeclsumError),
}

fn process_batch<'a>(
    sources: impl Iterator<Item = (String, Source<'a>)>,
    extractor: &dyn TableExtractor,
    options: &ExtractOptions,
) -> ProcessOutcome {
    let mut outcome = ProcessOutcome::default();
    let mut accepted: Vec<Vec<TypedRow>> = Vec::new();

    for (name, source) in sources {
        tracing::debug!(document = %name, backend = extractor.backend_name(), "processing");

        match process_document(&source, extractor, options) {
            Ok(rows) => {
                tracing::info!(document = %name, rows = rows.len(), "document accepted");
                accepted.push(rows);
            }
            Err(DocumentFailure::Rejected(Rejection::NoAnchorFound)) => {
                tracing::debug!(document = %name, "no table region found");
                outcome.no_table_files.push(name);
            }
            Err(DocumentFailure::Rejected(Rejection::InvalidHeader)) => {
                outcome.warn(DocumentWarning::invalid_header(&name));
            }
            Err(DocumentFailure::Rejected(Rejection::MissingRequiredColumns(missing))) => {
                outcome.warn(DocumentWarning::missing_columns(&name, &missing));
            }
            Err(DocumentFailure::Rejected(cause @ Rejection::EmptyRegion)) => {
                outcome.warn(DocumentWarning::processing_error(&name, cause));
                outcome.no_table_files.push(name);
            }
            Err(DocumentFailure::Extraction(err)) => {
                outcome.warn(DocumentWarning::processing_error(&name, err));
                outcome.no_table_files.push(name);
            }
        }
    }

    outcome.table = aggregate::combine(accepted);
    if outcome.table.is_none() {
        outcome.warn(DocumentWarning::no_valid_data());
    }

    outcome
}

fn process_document(
    source: &Source<'_>,
    extractor: &dyn TableExtractor,
    options: &ExtractOptions,
) -> Result<Vec<TypedRow>, DocumentFailure> {
    let bytes = source.load().map_err(DocumentFailure::Extraction)?;
    let pages = extractor
        .extract_tables(&bytes)
        .map_err(DocumentFailure::Extraction)?;
    let rows = parsing::flatten_tables(pages);
    parsing::parse_document(&rows, options).map_err(DocumentFailure::Rejected)
}

impl ProcessOutcome {
    fn warn(&mut self, warning: DocumentWarning) {
        tracing::warn!(document = ?warning.document, "{}", warning.message);
        self.warnings.push(warning);
    }
}
