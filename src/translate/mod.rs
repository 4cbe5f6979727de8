//! Translation adapter
//!
//! The provider only ever sees placeholder-bearing text: callers go through
//! [`translate_protected`], which protects math spans, rewrites leftover
//! LaTeX commands to glyphs, translates, and restores the spans. A failed
//! translation degrades to the untranslated input plus a warning.

mod google;

pub use google::{interpret_response, GoogleTranslateClient};

use qbank_ir::Language;
use tracing::warn;

use crate::core::latex::latex_to_symbols;
use crate::core::math_span::{protect, restore};
use crate::utils::error::{PipelineWarning, Stage};

#[derive(Debug, Clone, thiserror::Error)]
pub enum TranslateError {
    /// Request could not be sent or the body could not be read
    #[error("transport failure: {0}")]
    Transport(String),
    /// Provider answered with a non-200 status
    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// 200 response without `data.translations[0].translatedText`
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
    #[error("no translation API key configured")]
    MissingCredential,
}

/// External translation service.
pub trait TranslationProvider {
    /// Translate `text` into the language with provider code `target`.
    fn translate(&self, text: &str, target: &str) -> Result<String, TranslateError>;
}

impl<P: TranslationProvider + ?Sized> TranslationProvider for &P {
    fn translate(&self, text: &str, target: &str) -> Result<String, TranslateError> {
        (**self).translate(text, target)
    }
}

impl<P: TranslationProvider + ?Sized> TranslationProvider for Box<P> {
    fn translate(&self, text: &str, target: &str) -> Result<String, TranslateError> {
        (**self).translate(text, target)
    }
}

/// Translated content with any recovered failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationOutput {
    pub content: String,
    pub warnings: Vec<PipelineWarning>,
}

impl TranslationOutput {
    pub fn new(content: String) -> Self {
        Self {
            content,
            warnings: Vec::new(),
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Translate `text`, falling back to the input unchanged on any failure.
pub fn translate(
    provider: &dyn TranslationProvider,
    text: &str,
    target: Language,
) -> TranslationOutput {
    if text.trim().is_empty() {
        return TranslationOutput::new(text.to_string());
    }
    match provider.translate(text, target.code()) {
        Ok(translated) => TranslationOutput::new(translated),
        Err(err) => {
            warn!(error = %err, target = target.code(), "translation failed, keeping original text");
            TranslationOutput {
                content: text.to_string(),
                warnings: vec![PipelineWarning::new(Stage::Translate, err.to_string())],
            }
        }
    }
}

/// Protect math, normalise LaTeX commands, translate, restore math.
pub fn translate_protected(
    provider: &dyn TranslationProvider,
    text: &str,
    target: Language,
) -> TranslationOutput {
    let (protected, table) = protect(text);
    let prepared = latex_to_symbols(&protected);
    let mut output = translate(provider, &prepared, target);
    output.content = restore(&output.content, table);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Uppercase {
        seen: RefCell<Vec<String>>,
    }

    impl TranslationProvider for Uppercase {
        fn translate(&self, text: &str, _target: &str) -> Result<String, TranslateError> {
            self.seen.borrow_mut().push(text.to_string());
            Ok(text.to_uppercase())
        }
    }

    struct Rejecting;

    impl TranslationProvider for Rejecting {
        fn translate(&self, text: &str, _target: &str) -> Result<String, TranslateError> {
            interpret_response(500, &format!("cannot translate {}", text.len()))
        }
    }

    #[test]
    fn failure_returns_input_unchanged() {
        let out = translate(&Rejecting, "Solve for x.", Language::Hindi);
        assert_eq!(out.content, "Solve for x.");
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].stage, Stage::Translate);
        assert!(out.warnings[0].message.contains("500"));
    }

    #[test]
    fn provider_never_sees_math() {
        let provider = Uppercase {
            seen: RefCell::new(Vec::new()),
        };
        let out = translate_protected(
            &provider,
            "area \\[\\pi r^2\\] is \\boxed{\\alpha} and \\times",
            Language::Hindi,
        );
        let seen = provider.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert!(!seen[0].contains("\\["));
        assert!(!seen[0].contains("\\boxed"));
        assert!(seen[0].contains('×'));
        assert_eq!(out.content, "AREA \\[\\pi r^2\\] IS \\boxed{\\alpha} AND ×");
    }

    #[test]
    fn blank_text_skips_provider() {
        let out = translate(&Rejecting, "  ", Language::Hindi);
        assert!(!out.has_warnings());
    }
}
