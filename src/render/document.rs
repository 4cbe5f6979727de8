//! Paginated document renderer.

use tracing::info;

use qbank_ir::GeneratedDocument;
use qbank_pdf_backend::{render_pdf, FlowBlock, PdfRenderOptions};

use crate::config::ExportOptions;
use crate::utils::error::QbankResult;

/// Heading per labelled section, paragraph per item, in document order.
pub fn document_flow(doc: &GeneratedDocument) -> Vec<FlowBlock> {
    let mut blocks = Vec::with_capacity(doc.item_count() + doc.sections.len());
    for section in &doc.sections {
        if let Some(heading) = section.heading() {
            blocks.push(FlowBlock::Heading(heading.to_string()));
        }
        for item in &section.items {
            blocks.push(FlowBlock::Paragraph(item.text()));
        }
    }
    blocks
}

fn render_options(options: &ExportOptions) -> PdfRenderOptions {
    PdfRenderOptions {
        page_width: options.page_width,
        page_height: options.page_height,
        margin: options.margin,
        heading_size: options.heading_size,
        body_size: options.body_size,
        paragraph_spacing: options.paragraph_spacing,
        title: options.title.clone(),
        font: options.font.clone(),
        ..PdfRenderOptions::default()
    }
}

/// Export as PDF bytes. Writer failures surface as
/// `QbankError::Export` ("Error creating PDF: ...").
pub fn export_pdf(doc: &GeneratedDocument, options: &ExportOptions) -> QbankResult<Vec<u8>> {
    let blocks = document_flow(doc);
    let bytes = render_pdf(&blocks, &render_options(options))?;
    info!(blocks = blocks.len(), bytes = bytes.len(), "pdf exported");
    Ok(bytes)
}
