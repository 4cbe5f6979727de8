//! Configuration for providers and export.
//!
//! Loaded from TOML, then overridden from the environment so credentials
//! never need to live in the file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::utils::error::{QbankError, QbankResult};

pub const DEFAULT_TRANSLATE_ENDPOINT: &str =
    "https://translation.googleapis.com/language/translate/v2";
pub const DEFAULT_COMPLETION_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QbankConfig {
    pub translation: TranslationConfig,
    pub completion: CompletionConfig,
    pub export: ExportOptions,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_TRANSLATE_ENDPOINT.to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    /// Model used for step-by-step solutions
    pub solve_model: String,
    /// Model used for similar-question generation
    pub generate_model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_COMPLETION_ENDPOINT.to_string(),
            api_key: None,
            solve_model: "gpt-4o-mini".to_string(),
            generate_model: "gpt-4o".to_string(),
            temperature: 0.7,
            timeout_secs: 120,
        }
    }
}

/// Page geometry and typography for PDF export, in points.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub heading_size: f32,
    pub body_size: f32,
    pub paragraph_spacing: f32,
    pub title: Option<String>,
    /// TrueType font file; installed fonts are searched when unset.
    pub font: Option<PathBuf>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            page_width: 595.0,
            page_height: 842.0,
            margin: 56.0,
            heading_size: 16.0,
            body_size: 11.0,
            paragraph_spacing: 8.0,
            title: None,
            font: None,
        }
    }
}

impl ExportOptions {
    /// US Letter instead of A4.
    pub fn letter() -> Self {
        Self {
            page_width: 612.0,
            page_height: 792.0,
            ..Self::default()
        }
    }
}

impl QbankConfig {
    pub fn from_toml_str(source: &str) -> QbankResult<Self> {
        toml::from_str(source).map_err(|e| QbankError::config(e.to_string()))
    }

    pub fn load(path: &Path) -> QbankResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            QbankError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&source)
    }

    /// Load `path` when given, otherwise start from defaults; then apply
    /// environment overrides.
    pub fn resolve(path: Option<&Path>) -> QbankResult<Self> {
        let config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(config.with_env())
    }

    /// Apply `QBANK_TRANSLATE_KEY`/`GOOGLE_API_KEY`, `QBANK_TRANSLATE_ENDPOINT`,
    /// `OPENAI_API_KEY`, `OPENAI_API_BASE` and `QBANK_PDF_FONT`.
    pub fn with_env(self) -> Self {
        self.with_vars(|name| std::env::var(name).ok())
    }

    fn with_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = var("QBANK_TRANSLATE_KEY").or_else(|| var("GOOGLE_API_KEY")) {
            self.translation.api_key = Some(key);
        }
        if let Some(endpoint) = var("QBANK_TRANSLATE_ENDPOINT") {
            self.translation.endpoint = endpoint;
        }
        if let Some(key) = var("OPENAI_API_KEY") {
            self.completion.api_key = Some(key);
        }
        if let Some(base) = var("OPENAI_API_BASE") {
            self.completion.endpoint = format!("{}/chat/completions", base.trim_end_matches('/'));
        }
        if let Some(font) = var("QBANK_PDF_FONT") {
            self.export.font = Some(PathBuf::from(font));
        }
        self
    }
}
