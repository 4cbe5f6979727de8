//! Section/item segmentation of a model response
//!
//! A line-driven state machine: exact header lines switch section, `N.`
//! markers open items, and everything else (lettered options, `Steps:`
//! lines, free prose) continues the open item. Nothing is dropped except
//! blank separator lines.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use qbank_ir::{GeneratedDocument, Item, Section, SectionKind, SectionLabel};

lazy_static! {
    static ref NUMBERED: Regex = Regex::new(r"^(\d+)\.").unwrap();
    static ref LETTERED: Regex = Regex::new(r"^([a-d])\)").unwrap();
}

const STEPS_PREFIXES: [&str; 2] = ["Steps:", "चरण:"];

/// Classification of a single input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Header(SectionLabel),
    /// `N.` marker; the number is `None` when it does not fit a `u32`.
    Numbered(Option<u32>),
    /// `a)` .. `d)`
    Option(char),
    Steps,
    Blank,
    Text,
}

impl LineKind {
    pub fn classify(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return LineKind::Blank;
        }
        if let Some(label) = SectionKind::from_header(trimmed) {
            return LineKind::Header(label);
        }
        let lead = line.trim_start();
        if let Some(caps) = NUMBERED.captures(lead) {
            return LineKind::Numbered(caps[1].parse().ok());
        }
        if let Some(caps) = LETTERED.captures(lead) {
            let letter = caps[1].chars().next().unwrap_or('a');
            return LineKind::Option(letter);
        }
        if STEPS_PREFIXES.iter().any(|p| lead.starts_with(p)) {
            return LineKind::Steps;
        }
        LineKind::Text
    }
}

/// Segmenter state. `NoSection` holds content seen before any header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    NoSection,
    In(SectionKind),
}

struct Segmenter {
    state: State,
    sections: Vec<Section>,
    open: Option<Item>,
}

impl Segmenter {
    fn new() -> Self {
        Self {
            state: State::NoSection,
            sections: Vec::new(),
            open: None,
        }
    }

    fn current_section(&mut self) -> &mut Section {
        let idx = match self.state {
            State::NoSection => self.sections.iter().position(|s| s.label.is_none()),
            State::In(kind) => self.sections.iter().position(|s| s.kind() == Some(kind)),
        };
        let idx = match idx {
            Some(idx) => idx,
            None => {
                // Only reachable for the unlabeled block; headers create their own section.
                self.sections.insert(0, Section::new(None));
                0
            }
        };
        &mut self.sections[idx]
    }

    fn flush(&mut self) {
        if let Some(item) = self.open.take() {
            self.current_section().items.push(item);
        }
    }

    fn enter(&mut self, label: SectionLabel) {
        self.flush();
        match self.sections.iter_mut().find(|s| s.kind() == Some(label.kind)) {
            // Reopen the tail item so re-entered prose continues it, as it
            // does when `to_text` output is read back.
            Some(section) => self.open = section.items.pop(),
            None => self.sections.push(Section::new(Some(label))),
        }
        self.state = State::In(label.kind);
    }

    fn continue_item(&mut self, line: &str) {
        match self.open.as_mut() {
            Some(item) => item.push_line(line),
            None => self.open = Some(Item::new(None, line)),
        }
    }

    fn feed(&mut self, raw: &str) {
        let line = raw.trim_end();
        match LineKind::classify(line) {
            LineKind::Header(label) => self.enter(label),
            LineKind::Blank => {}
            LineKind::Numbered(number) => {
                self.flush();
                self.open = Some(Item::new(number, line));
            }
            LineKind::Steps => match self.open.as_mut() {
                Some(item) => {
                    item.push_line("");
                    item.push_line(line);
                }
                None => self.open = Some(Item::new(None, line)),
            },
            LineKind::Option(_) | LineKind::Text => self.continue_item(line),
        }
    }

    fn finish(mut self) -> GeneratedDocument {
        self.flush();
        GeneratedDocument::new(self.sections)
    }
}

/// Split a response into labelled sections of items.
///
/// Headers must occupy a whole line (`Questions:`, `Answers:`, `प्रश्न:`,
/// `उत्तर:`). A repeated header appends to the earlier section of the same
/// kind. Running this on [`GeneratedDocument::to_text`] output reproduces the
/// same document.
pub fn segment(text: &str) -> GeneratedDocument {
    let mut segmenter = Segmenter::new();
    for line in text.lines() {
        segmenter.feed(line);
    }
    let doc = segmenter.finish();
    debug!(
        sections = doc.sections.len(),
        items = doc.item_count(),
        "segmented response"
    );
    doc
}
