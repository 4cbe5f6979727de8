//! Error handling for the qbank pipeline
//!
//! This module provides a unified error type and result type for every
//! stage of a solve/generate request, plus the non-fatal warning type that
//! degraded stages report instead of failing.

use std::fmt;

use qbank_pdf_backend::PdfError;

/// Pipeline error type
#[derive(Debug, thiserror::Error)]
pub enum QbankError {
    /// Invalid input, e.g. an empty question selection
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
    /// IO error (for file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config { message: String },
    /// Question bank JSON is malformed or an exercise is missing
    #[error("Question bank error: {message}")]
    QuestionBank { message: String },
    /// Completion provider failure
    #[error("Completion error: {message}")]
    Completion { message: String },
    /// Document export failure
    #[error("Error creating PDF: {message}")]
    Export { message: String },
}

/// Result type for pipeline operations
pub type QbankResult<T> = Result<T, QbankError>;

impl From<PdfError> for QbankError {
    fn from(err: PdfError) -> Self {
        QbankError::export(err.to_string())
    }
}

// Convenience constructors for errors
impl QbankError {
    pub fn invalid(message: impl Into<String>) -> Self {
        QbankError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        QbankError::Config {
            message: message.into(),
        }
    }

    pub fn bank(message: impl Into<String>) -> Self {
        QbankError::QuestionBank {
            message: message.into(),
        }
    }

    pub fn completion(message: impl Into<String>) -> Self {
        QbankError::Completion {
            message: message.into(),
        }
    }

    pub fn export(message: impl Into<String>) -> Self {
        QbankError::Export {
            message: message.into(),
        }
    }
}

/// Pipeline stage that produced a warning. Translation is the only stage
/// that degrades instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Translate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Translate => write!(f, "translate"),
        }
    }
}

/// Non-fatal issue: the stage degraded to untransformed output.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PipelineWarning {
    pub stage: Stage,
    pub message: String,
}

impl PipelineWarning {
    pub fn new(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

impl fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.stage, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_error_display() {
        let err = QbankError::export("disk full");
        assert_eq!(err.to_string(), "Error creating PDF: disk full");
    }

    #[test]
    fn test_pdf_error_converts_to_export() {
        let err: QbankError = PdfError::Render("broken pipe".into()).into();
        let msg = err.to_string();
        assert!(msg.starts_with("Error creating PDF:"));
        assert!(msg.contains("broken pipe"));
    }

    #[test]
    fn test_invalid_input() {
        let err = QbankError::invalid("no questions");
        assert!(err.to_string().contains("no questions"));
    }

    #[test]
    fn test_warning_display() {
        let warning = PipelineWarning::new(Stage::Translate, "status 403");
        assert_eq!(warning.to_string(), "[translate] status 403");
    }

    #[test]
    fn test_warning_json() {
        let warning = PipelineWarning::new(Stage::Translate, "no key");
        let value = serde_json::to_value(&warning).unwrap();
        assert_eq!(value, serde_json::json!({"stage": "translate", "message": "no key"}));
    }
}
