//! Flow blocks to paginated PDF backend.
//!
//! Wrapping and pagination are done by `genpdf`. Text is set in an embedded
//! TrueType font chosen by [`fonts::load_family`], so Devanagari and math
//! glyphs are written as-is.

pub mod fonts;

use std::io::Cursor;
use std::path::PathBuf;

use genpdf::elements::{Break, Paragraph};
use genpdf::style::Style;
use genpdf::{Margins, Mm, SimplePageDecorator, Size};
use tracing::debug;

/// A unit of flowed content, laid out top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowBlock {
    Heading(String),
    Paragraph(String),
}

impl FlowBlock {
    pub fn text(&self) -> &str {
        match self {
            FlowBlock::Heading(text) | FlowBlock::Paragraph(text) => text,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("font unavailable: {0}")]
    Font(String),
    #[error("failed to render document: {0}")]
    Render(String),
    #[error("invalid page geometry: {0}")]
    Geometry(String),
}

/// Page geometry and type sizes, in PDF points.
#[derive(Debug, Clone)]
pub struct PdfRenderOptions {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub heading_size: f32,
    pub body_size: f32,
    /// Vertical gap after each paragraph.
    pub paragraph_spacing: f32,
    /// Line spacing factor applied to the font's own line height.
    pub line_spacing: f32,
    pub title: Option<String>,
    /// TrueType file to use instead of searching the installed fonts.
    pub font: Option<PathBuf>,
}

impl Default for PdfRenderOptions {
    fn default() -> Self {
        Self {
            page_width: 595.0,
            page_height: 842.0,
            margin: 56.0,
            heading_size: 16.0,
            body_size: 11.0,
            paragraph_spacing: 8.0,
            line_spacing: 1.1,
            title: None,
            font: None,
        }
    }
}

impl PdfRenderOptions {
    fn validate(&self) -> Result<(), PdfError> {
        let text_width = self.page_width - 2.0 * self.margin;
        if text_width <= self.body_size || self.page_height <= 2.0 * self.margin {
            return Err(PdfError::Geometry(format!(
                "{}x{} page with {} margin leaves no room for text",
                self.page_width, self.page_height, self.margin
            )));
        }
        let sizes = [self.body_size, self.heading_size];
        if sizes.iter().any(|s| !(1.0..=255.0).contains(s)) || self.line_spacing <= 0.0 {
            return Err(PdfError::Geometry(
                "font sizes must be between 1 and 255pt and line spacing positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn points_to_mm(points: f32) -> f64 {
    f64::from(points) * 25.4 / 72.0
}

fn mm(points: f32) -> Mm {
    Mm::from(points_to_mm(points))
}

fn font_size(points: f32) -> u8 {
    points.round().clamp(1.0, 255.0) as u8
}

/// Lay out and serialise blocks as PDF bytes.
pub fn render_pdf(blocks: &[FlowBlock], options: &PdfRenderOptions) -> Result<Vec<u8>, PdfError> {
    options.validate()?;

    let mut text: Vec<&str> = blocks.iter().map(FlowBlock::text).collect();
    text.extend(options.title.as_deref());
    let family = fonts::load_family(options.font.as_deref(), &text.join("\n"))?;

    let mut doc = genpdf::Document::new(family);
    if let Some(title) = &options.title {
        doc.set_title(title.clone());
    }
    doc.set_paper_size(Size::new(mm(options.page_width), mm(options.page_height)));
    doc.set_font_size(font_size(options.body_size));
    doc.set_line_spacing(f64::from(options.line_spacing));

    let mut decorator = SimplePageDecorator::new();
    let margin = options.margin;
    decorator.set_margins(Margins::trbl(mm(margin), mm(margin), mm(margin), mm(margin)));
    doc.set_page_decorator(decorator);

    // Breaks are measured in body lines.
    let gap = f64::from(options.paragraph_spacing / options.body_size);
    let heading = Style::new()
        .with_font_size(font_size(options.heading_size))
        .bold();

    for (index, block) in blocks.iter().enumerate() {
        match block {
            FlowBlock::Heading(text) => {
                if index > 0 {
                    doc.push(Break::new(gap));
                }
                let mut para = Paragraph::default();
                para.push_styled(text.clone(), heading.clone());
                doc.push(para);
                doc.push(Break::new(gap / 2.0));
            }
            FlowBlock::Paragraph(text) => {
                for line in text.lines() {
                    if line.trim().is_empty() {
                        doc.push(Break::new(1.0));
                    } else {
                        doc.push(Paragraph::new(line.to_string()));
                    }
                }
                doc.push(Break::new(gap));
            }
        }
    }

    let mut buffer = Cursor::new(Vec::new());
    doc.render(&mut buffer)
        .map_err(|e| PdfError::Render(e.to_string()))?;
    let bytes = buffer.into_inner();
    debug!(blocks = blocks.len(), bytes = bytes.len(), "pdf rendered");
    Ok(bytes)
}
