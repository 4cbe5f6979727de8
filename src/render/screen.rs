//! Screen renderer: section headings, per-item markdown and math blocks.

use serde::Serialize;

use qbank_ir::{GeneratedDocument, Item};

use crate::core::latex::looks_like_math;
use crate::core::math_span::{MathSpanKind, MathSpanProtector};

/// Delimiter convention of the text being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MathConvention {
    /// `\[..\]` and `\boxed{..}`, typeset through a dedicated math block.
    #[default]
    Boxed,
    /// `$..$`/`$$..$$`, left inline for the markdown renderer.
    Dollar,
}

impl std::str::FromStr for MathConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "boxed" | "display" => Ok(MathConvention::Boxed),
            "dollar" | "markdown" => Ok(MathConvention::Dollar),
            other => Err(format!("unknown math convention '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "text", rename_all = "lowercase")]
pub enum ScreenBlock {
    Heading(String),
    Markdown(String),
    /// LaTeX source without surrounding delimiters.
    Math(String),
    Spacer,
}

/// Render a segmented document for display, preserving section and item
/// order.
pub fn render_screen(doc: &GeneratedDocument, convention: MathConvention) -> Vec<ScreenBlock> {
    let mut blocks = Vec::new();
    for section in &doc.sections {
        if let Some(heading) = section.heading() {
            blocks.push(ScreenBlock::Heading(heading.to_string()));
        }
        for item in &section.items {
            match convention {
                MathConvention::Dollar => {
                    blocks.push(ScreenBlock::Markdown(item.text()));
                }
                MathConvention::Boxed => render_boxed_item(item, &mut blocks),
            }
            blocks.push(ScreenBlock::Spacer);
        }
    }
    blocks
}

fn render_boxed_item(item: &Item, blocks: &mut Vec<ScreenBlock>) {
    let text = item.text();
    let spans = MathSpanProtector::new().find_spans(&text);
    let mut cursor = 0;
    for span in &spans {
        push_prose(&text[cursor..span.start], blocks);
        let content = span.content.trim();
        match span.kind {
            MathSpanKind::Boxed => blocks.push(ScreenBlock::Math(format!("\\boxed{{{}}}", content))),
            MathSpanKind::Display | MathSpanKind::Inline => {
                blocks.push(ScreenBlock::Math(content.to_string()))
            }
        }
        cursor = span.end;
    }
    push_prose(&text[cursor..], blocks);
}

// Lines that are bare math would render as raw LaTeX, so they are skipped.
fn push_prose(text: &str, blocks: &mut Vec<ScreenBlock>) {
    for line in text.lines() {
        if line.trim().is_empty() || looks_like_math(line) {
            continue;
        }
        blocks.push(ScreenBlock::Markdown(line.to_string()));
    }
}

/// Serialise screen blocks as a markdown stream.
pub fn screen_to_markdown(blocks: &[ScreenBlock]) -> String {
    let mut out = String::new();
    for block in blocks {
        match block {
            ScreenBlock::Heading(text) => {
                out.push_str("### ");
                out.push_str(text);
                out.push_str("\n\n");
            }
            ScreenBlock::Markdown(text) => {
                out.push_str(text);
                out.push_str("\n\n");
            }
            ScreenBlock::Math(latex) => {
                out.push_str("$$\n");
                out.push_str(latex);
                out.push_str("\n$$\n\n");
            }
            ScreenBlock::Spacer => out.push_str("&nbsp;\n\n"),
        }
    }
    out
}
