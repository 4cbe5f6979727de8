//! Document model shared by the segmenter and the renderers.

#[cfg(feature = "serde")]
use serde::Serialize;

/// Output language of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Language {
    #[default]
    English,
    Hindi,
}

impl Language {
    /// Code understood by the translation provider.
    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
        }
    }

    /// Accepts display names and provider codes, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "english" | "en" => Some(Language::English),
            "hindi" | "hi" => Some(Language::Hindi),
            _ => None,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SectionKind {
    Questions,
    Answers,
}

impl SectionKind {
    pub const ALL: [SectionKind; 2] = [SectionKind::Questions, SectionKind::Answers];

    /// Header token for the given language, colon included.
    pub fn header(self, language: Language) -> &'static str {
        match (self, language) {
            (SectionKind::Questions, Language::English) => "Questions:",
            (SectionKind::Answers, Language::English) => "Answers:",
            (SectionKind::Questions, Language::Hindi) => "प्रश्न:",
            (SectionKind::Answers, Language::Hindi) => "उत्तर:",
        }
    }

    /// Resolve an exact header token to its section and language.
    pub fn from_header(token: &str) -> Option<SectionLabel> {
        for kind in Self::ALL {
            for language in [Language::English, Language::Hindi] {
                if kind.header(language) == token {
                    return Some(SectionLabel { kind, language });
                }
            }
        }
        None
    }
}

/// A section kind together with the language its header was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SectionLabel {
    pub kind: SectionKind,
    pub language: Language,
}

impl SectionLabel {
    pub fn new(kind: SectionKind, language: Language) -> Self {
        Self { kind, language }
    }

    pub fn text(&self) -> &'static str {
        self.kind.header(self.language)
    }
}

/// One numbered question or answer block.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Item {
    /// Value of the leading `N.` marker, `None` for unnumbered prose.
    pub number: Option<u32>,
    pub lines: Vec<String>,
}

impl Item {
    pub fn new(number: Option<u32>, first_line: impl Into<String>) -> Self {
        Self {
            number,
            lines: vec![first_line.into()],
        }
    }

    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Section {
    /// `None` for content that appeared before any header.
    pub label: Option<SectionLabel>,
    pub items: Vec<Item>,
}

impl Section {
    pub fn new(label: Option<SectionLabel>) -> Self {
        Self {
            label,
            items: Vec::new(),
        }
    }

    pub fn kind(&self) -> Option<SectionKind> {
        self.label.map(|l| l.kind)
    }

    pub fn heading(&self) -> Option<&'static str> {
        self.label.as_ref().map(SectionLabel::text)
    }
}

/// Segmented response, built once per request and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct GeneratedDocument {
    pub sections: Vec<Section>,
}

impl GeneratedDocument {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|s| s.items.is_empty())
    }

    pub fn section(&self, kind: SectionKind) -> Option<&Section> {
        self.sections.iter().find(|s| s.kind() == Some(kind))
    }

    pub fn unlabeled(&self) -> Option<&Section> {
        self.sections.iter().find(|s| s.label.is_none())
    }

    pub fn item_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }

    /// Per-section item counts in document order.
    pub fn shape(&self) -> Vec<(Option<SectionKind>, usize)> {
        self.sections
            .iter()
            .map(|s| (s.kind(), s.items.len()))
            .collect()
    }

    /// Flatten back to header-and-item text. Segmenting the result
    /// reproduces this document.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            if let Some(heading) = section.heading() {
                if !out.is_empty() {
                    out.push('\n');
                }
                out.push_str(heading);
                out.push('\n');
            }
            for item in &section.items {
                out.push_str(&item.text());
                out.push('\n');
            }
        }
        out
    }
}
