use declsum_core::error::DeclsumError;
use declsum_core::options::{load_options, ExtractOptions};
use std::path::Path;

pub fn show() -> Result<(), DeclsumError> {
    let json = serde_json::to_string_pretty(&ExtractOptions::default())?;
    println!("{json}");
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), DeclsumError> {
    let options = load_options(file)?;

    println!("Options file '{}' is valid.", file.display());
    println!(
        "  Region: after '{}' up to '{}' (fallback '{}')",
        options.start_marker, options.end_marker, options.end_marker_fallback
    );
    println!(
        "  Columns: {}",
        options.required_columns.names().join(", ")
    );
    match options.timeout_secs {
        Some(secs) => println!("  Timeout: {secs}s per document"),
        None => println!("  Timeout: none"),
    }

    Ok(())
}
