use crate::error::DeclsumError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_START_MARKER: &str = "汇总";
pub const DEFAULT_END_MARKER: &str = "报关单草稿";
pub const DEFAULT_END_MARKER_FALLBACK: &str = "报关单统一编号";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Names of the three columns kept from every document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequiredColumns {
    /// Grouping key.
    pub sequence_no: String,
    pub quantity: String,
    pub total_value: String,
}

impl Default for RequiredColumns {
    fn default() -> Self {
        RequiredColumns {
            sequence_no: "备案序号".into(),
            quantity: "申报数量".into(),
            total_value: "申报总价".into(),
        }
    }
}

impl RequiredColumns {
    pub fn names(&self) -> [&str; 3] {
        [
            self.sequence_no.as_str(),
            self.quantity.as_str(),
            self.total_value.as_str(),
        ]
    }
}

/// Tunables for the extraction pipeline. Every field has a default, so a
/// JSON options file only needs the keys it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Data starts on the row after the first row containing this text.
    pub start_marker: String,
    /// Data ends (exclusive) at the first row containing this text.
    pub end_marker: String,
    /// Used only when no row contains `end_marker`.
    pub end_marker_fallback: String,
    pub required_columns: RequiredColumns,
    /// Per-document limit for the extraction backend. `None` waits forever.
    pub timeout_secs: Option<u64>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            start_marker: DEFAULT_START_MARKER.into(),
            end_marker: DEFAULT_END_MARKER.into(),
            end_marker_fallback: DEFAULT_END_MARKER_FALLBACK.into(),
            required_columns: RequiredColumns::default(),
            timeout_secs: Some(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ExtractOptions {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Load options from a JSON file.
pub fn load_options(path: &Path) -> Result<ExtractOptions, DeclsumError> {
    let content = std::fs::read_to_string(path).map_err(|e| DeclsumError::OptionsLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let options: ExtractOptions =
        serde_json::from_str(&content).map_err(|e| DeclsumError::OptionsLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_options(&options)?;
    Ok(options)
}

/// Parse options from a JSON string (no file path context).
pub fn parse_options_str(json: &str) -> Result<ExtractOptions, DeclsumError> {
    let options: ExtractOptions = serde_json::from_str(json)?;
    validate_options(&options)?;
    Ok(options)
}

pub fn validate_options(options: &ExtractOptions) -> Result<(), DeclsumError> {
    for (field, value) in [
        ("start_marker", &options.start_marker),
        ("end_marker", &options.end_marker),
        ("end_marker_fallback", &options.end_marker_fallback),
    ] {
        if value.trim().is_empty() {
            return Err(DeclsumError::OptionsInvalid(format!(
                "{field} must not be empty"
            )));
        }
    }

    let names = options.required_columns.names();
    if names.iter().any(|n| n.trim().is_empty()) {
        return Err(DeclsumError::OptionsInvalid(
            "required column names must not be empty".into(),
        ));
    }
    if names[0] == names[1] || names[0] == names[2] || names[1] == names[2] {
        return Err(DeclsumError::OptionsInvalid(format!(
            "required column names must be distinct, got {}",
            names.join(", ")
        )));
    }

    if options.timeout_secs == Some(0) {
        return Err(DeclsumError::OptionsInvalid(
            "timeout_secs must be greater than zero".into(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let options = parse_options_str("{}").unwrap();
        assert_eq!(options, ExtractOptions::default());
        assert_eq!(options.required_columns.names(), ["备案序号", "申报数量", "申报总价"]);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let options = parse_options_str(r#"{"end_marker": "END", "timeout_secs": null}"#).unwrap();
        assert_eq!(options.end_marker, "END");
        assert_eq!(options.start_marker, DEFAULT_START_MARKER);
        assert!(options.timeout().is_none());
    }

    #[test]
    fn rejects_blank_marker() {
        let err = parse_options_str(r#"{"start_marker": "  "}"#).unwrap_err();
        assert!(matches!(err, DeclsumError::OptionsInvalid(_)));
    }

    #[test]
    fn rejects_duplicate_columns() {
        let json = r#"{"required_columns": {"sequence_no": "A", "quantity": "A", "total_value": "B"}}"#;
        assert!(parse_options_str(json).is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        assert!(parse_options_str(r#"{"timeout_secs": 0}"#).is_err());
    }

    #[test]
    fn load_reports_path_on_missing_file() {
        let err = load_options(Path::new("/nonexistent/options.json")).unwrap_err();
        assert!(matches!(err, DeclsumError::OptionsLoad { .. }));
    }
}
