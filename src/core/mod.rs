//! Core text transformations
//!
//! Pure, synchronous functions: math span protection, LaTeX normalisation and
//! Questions/Answers segmentation. No state survives between calls except
//! the placeholder table a caller explicitly holds.

pub mod latex;
pub mod math_span;
pub mod segment;
