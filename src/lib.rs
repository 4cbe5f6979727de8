//! # qbank
//!
//! Text pipeline behind a curriculum question-bank viewer: browse exercise
//! questions, ask a completion model for step-by-step solutions or similar
//! questions, and turn the free-form reply into a canonical
//! Questions/Answers document.
//!
//! ## Pipeline
//!
//! ```text
//! reply ─ protect ─ normalise ─ translate ─ restore ─ segment ─ render
//! ```
//!
//! - [`core::math_span`]: swap `\[..\]` and `\boxed{..}` spans for
//!   placeholders and back.
//! - [`core::latex`]: LaTeX commands to Unicode symbols or `$`/`$$` fences,
//!   plus the "is this line math" heuristic.
//! - [`core::segment`]: line-driven Questions/Answers segmentation.
//! - [`translate`]: math-safe translation with fallback to the input.
//! - [`render`]: screen blocks and paginated PDF export.
//!
//! ## Example
//!
//! ```rust
//! use qbank::{segment, SectionKind};
//!
//! let doc = segment("Questions:\n1. Solve $x+1=2$\nAnswers:\n1. Steps: subtract 1\nFinal Answer: 1");
//! let answers = doc.section(SectionKind::Answers).unwrap();
//! assert_eq!(answers.items.len(), 1);
//! assert_eq!(answers.items[0].lines.len(), 2);
//! ```

pub mod bank;
pub mod completion;
pub mod config;
pub mod core;
pub mod pipeline;
pub mod prompt;
pub mod render;
pub mod translate;
pub mod utils;

pub use qbank_ir::{GeneratedDocument, Item, Language, Section, SectionKind, SectionLabel};

pub use bank::{QuestionBank, QuestionQueue};
pub use completion::{CompletionProvider, CompletionRequest, OpenAiClient};
pub use config::{ExportOptions, QbankConfig};
pub use crate::core::latex::{
    latex_document_to_plain, latex_to_markdown_math, latex_to_symbols, looks_like_math,
    normalize_delimiters,
};
pub use crate::core::math_span::{protect, restore, MathSpanProtector, PlaceholderTable};
pub use crate::core::segment::segment;
pub use pipeline::{generate, solve, GenerateParams, PipelineOutput, RequestContext};
pub use prompt::{Difficulty, PromptKey, QuestionType};
pub use render::{export_pdf, render_screen, screen_to_markdown, MathConvention, ScreenBlock};
pub use translate::{
    translate, translate_protected, GoogleTranslateClient, TranslateError, TranslationOutput,
    TranslationProvider,
};
pub use utils::error::{PipelineWarning, QbankError, QbankResult, Stage};
