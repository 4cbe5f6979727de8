//! LaTeX normalisation
//!
//! Two targets share one command table: symbol mode (Unicode glyphs, for
//! plain text and pre-translation) and delimiter mode (`$`/`$$` fences, for
//! markdown math renderers). The classifier decides whether a line should be
//! kept out of prose rendering.

pub mod classify;
pub mod normalize;
pub mod symbols;

pub use classify::looks_like_math;
pub use normalize::{
    caret_superscripts, latex_document_to_plain, latex_to_markdown_math, latex_to_symbols,
    normalize_delimiters,
};
