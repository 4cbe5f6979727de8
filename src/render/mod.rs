//! Document assembly for screen and paginated output.

mod document;
mod screen;

pub use document::{document_flow, export_pdf};
pub use screen::{render_screen, screen_to_markdown, MathConvention, ScreenBlock};
