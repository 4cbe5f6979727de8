//! Utility modules
//!
//! Error types, result types and the non-fatal warning type shared by every
//! pipeline stage.

pub mod error;

// Re-export commonly used items
pub use error::{PipelineWarning, QbankError, QbankResult, Stage};
