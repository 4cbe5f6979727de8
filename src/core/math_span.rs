//! Math span detection and placeholder protection
//!
//! Text-level operations (translation, line splitting, symbol rewriting) must
//! not see LaTeX math. `protect` swaps every math span for an opaque
//! placeholder and hands back the table needed to undo it; `restore` consumes
//! that table, so a table cannot be reused across requests.

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    /// `\[..\]` and `\boxed{..}`, shortest closing match, across newlines.
    static ref DISPLAY_OR_BOXED: Regex =
        Regex::new(r"(?s)\\\[.*?\\\]|\\boxed\{.*?\}").unwrap();

    /// Same as above plus inline `\(..\)`.
    static ref ANY_MATH: Regex =
        Regex::new(r"(?s)\\\[.*?\\\]|\\\(.*?\\\)|\\boxed\{.*?\}").unwrap();
}

const PLACEHOLDER_TAG: &str = "MATH";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MathSpanKind {
    /// `\[ ... \]`
    Display,
    /// `\( ... \)`
    Inline,
    /// `\boxed{ ... }`
    Boxed,
}

impl MathSpanKind {
    fn of(raw: &str) -> Self {
        if raw.starts_with("\\[") {
            MathSpanKind::Display
        } else if raw.starts_with("\\(") {
            MathSpanKind::Inline
        } else {
            MathSpanKind::Boxed
        }
    }

    fn delimiters(self) -> (&'static str, &'static str) {
        match self {
            MathSpanKind::Display => ("\\[", "\\]"),
            MathSpanKind::Inline => ("\\(", "\\)"),
            MathSpanKind::Boxed => ("\\boxed{", "}"),
        }
    }
}

/// A recognised math span with byte offsets into the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathSpan {
    pub kind: MathSpanKind,
    /// Text between the delimiters.
    pub content: String,
    /// Full match, delimiters included.
    pub raw: String,
    pub start: usize,
    pub end: usize,
}

impl MathSpan {
    fn from_match(m: regex::Match<'_>) -> Self {
        let raw = m.as_str();
        let kind = MathSpanKind::of(raw);
        let (open, close) = kind.delimiters();
        Self {
            kind,
            content: raw[open.len()..raw.len() - close.len()].to_string(),
            raw: raw.to_string(),
            start: m.start(),
            end: m.end(),
        }
    }
}

/// Ordered placeholder → original span mapping for one protect/restore cycle.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PlaceholderTable {
    entries: IndexMap<String, String>,
}

impl PlaceholderTable {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, placeholder: &str) -> Option<&str> {
        self.entries.get(placeholder).map(String::as_str)
    }

    /// Entries in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Scanner configuration: which delimiter families count as math.
#[derive(Debug, Clone, Copy, Default)]
pub struct MathSpanProtector {
    include_inline: bool,
}

impl MathSpanProtector {
    /// Display and boxed spans only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also treat `\(..\)` as protected math.
    pub fn with_inline(mut self, include_inline: bool) -> Self {
        self.include_inline = include_inline;
        self
    }

    fn pattern(&self) -> &'static Regex {
        if self.include_inline {
            &ANY_MATH
        } else {
            &DISPLAY_OR_BOXED
        }
    }

    pub fn find_spans(&self, text: &str) -> Vec<MathSpan> {
        self.pattern()
            .find_iter(text)
            .map(MathSpan::from_match)
            .collect()
    }

    /// Replace every math span with a fresh placeholder.
    pub fn protect(&self, text: &str) -> (String, PlaceholderTable) {
        let mut table = PlaceholderTable::default();
        let mut matches = self.pattern().find_iter(text).peekable();
        if matches.peek().is_none() {
            return (text.to_string(), table);
        }

        let tag = unused_tag(text);
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for (n, m) in matches.enumerate() {
            let placeholder = format!("__{}_{}__", tag, n);
            out.push_str(&text[last..m.start()]);
            out.push_str(&placeholder);
            table
                .entries
                .insert(placeholder, m.as_str().to_string());
            last = m.end();
        }
        out.push_str(&text[last..]);

        debug!(spans = table.len(), "protected math spans");
        (out, table)
    }
}

/// Pick a placeholder tag whose prefix does not already occur in `text`.
fn unused_tag(text: &str) -> String {
    let mut tag = PLACEHOLDER_TAG.to_string();
    let mut salt = 0usize;
    while text.contains(&format!("__{}_", tag)) {
        salt += 1;
        tag = format!("{}{}", PLACEHOLDER_TAG, salt);
    }
    tag
}

/// Find `\[..\]` and `\boxed{..}` spans.
pub fn find_math_spans(text: &str) -> Vec<MathSpan> {
    MathSpanProtector::new().find_spans(text)
}

/// Protect `\[..\]` and `\boxed{..}` spans behind `__MATH_<n>__` placeholders.
pub fn protect(text: &str) -> (String, PlaceholderTable) {
    MathSpanProtector::new().protect(text)
}

/// Put the original spans back. Placeholders that no longer occur are skipped.
pub fn restore(text: &str, table: PlaceholderTable) -> String {
    let mut out = text.to_string();
    for (placeholder, original) in table.entries {
        if out.contains(&placeholder) {
            out = out.replace(&placeholder, &original);
        } else {
            debug!(%placeholder, "placeholder dropped by an intermediate transform");
        }
    }
    out
}
