pub mod layout;
pub mod pdftotext;

use crate::error::DeclsumError;
use crate::model::Row;

/// One table found on a page: rows of cells, in top-to-bottom order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub rows: Vec<Row>,
}

/// Tables extracted from a single page of a PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTables {
    pub page_number: usize,
    pub tables: Vec<RawTable>,
}

/// Trait for PDF table extraction backends.
pub trait TableExtractor: Send + Sync {
    /// Extract tables from PDF bytes, returning one PageTables per page in
    /// document order. A page without tables has an empty `tables` list.
    fn extract_tables(&self, pdf_bytes: &[u8]) -> Result<Vec<PageTables>, DeclsumError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
