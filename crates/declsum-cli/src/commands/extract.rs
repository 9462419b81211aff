use declsum_core::error::DeclsumError;
use declsum_core::extraction::pdftotext::PdftotextExtractor;
use declsum_core::options::{load_options, ExtractOptions};
use std::path::PathBuf;

use crate::output;

pub fn run(
    input_files: Vec<PathBuf>,
    options_file: Option<PathBuf>,
    output_format: &str,
    summary: bool,
) -> Result<(), DeclsumError> {
    let options = match options_file {
        Some(path) => load_options(&path)?,
        None => ExtractOptions::default(),
    };

    if !PdftotextExtractor::is_available() {
        return Err(DeclsumError::PdftotextNotFound);
    }
    let extractor = PdftotextExtractor::new().with_timeout(options.timeout());

    let outcome = declsum_core::process_pdf_files(&input_files, &extractor, &options);

    match output_format {
        "json" => output::json::print(&outcome, summary)?,
        _ => output::table::print(&outcome, summary),
    }

    Ok(())
}
