use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    InvalidHeader,
    MissingRequiredColumns,
    ProcessingError,
    NoValidData,
}

/// A non-fatal problem, usually tied to one input document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentWarning {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    pub kind: WarningKind,
    pub message: String,
}

impl DocumentWarning {
    pub fn invalid_header(document: &str) -> Self {
        DocumentWarning {
            document: Some(document.to_string()),
            kind: WarningKind::InvalidHeader,
            message: format!("{document}: first row has no valid column names"),
        }
    }

    pub fn missing_columns(document: &str, missing: &[String]) -> Self {
        DocumentWarning {
            document: Some(document.to_string()),
            kind: WarningKind::MissingRequiredColumns,
            message: format!(
                "{document}: missing required columns ({})",
                missing.join(", ")
            ),
        }
    }

    pub fn processing_error(document: &str, cause: impl fmt::Display) -> Self {
        DocumentWarning {
            document: Some(document.to_string()),
            kind: WarningKind::ProcessingError,
            message: format!("{document}: error while processing file: {cause}"),
        }
    }

    pub fn no_valid_data() -> Self {
        DocumentWarning {
            document: None,
            kind: WarningKind::NoValidData,
            message: "no valid table data found".to_string(),
        }
    }
}

impl fmt::Display for DocumentWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_document() {
        let w = DocumentWarning::missing_columns("a.pdf", &["申报总价".to_string()]);
        assert_eq!(w.document.as_deref(), Some("a.pdf"));
        assert!(w.message.contains("a.pdf"));
        assert!(w.message.contains("申报总价"));

        let w = DocumentWarning::processing_error("b.pdf", "broken xref");
        assert!(w.to_string().contains("b.pdf"));
        assert!(w.to_string().contains("broken xref"));
    }

    #[test]
    fn kind_serializes_snake_case() {
        let json = serde_json::to_string(&DocumentWarning::no_valid_data()).unwrap();
        assert!(json.contains("\"no_valid_data\""));
        assert!(!json.contains("document"));
    }
}
