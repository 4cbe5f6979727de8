//! TrueType font selection.
//!
//! The document text decides the font: installed faces are scored by how
//! many of its characters they have glyphs for, so a Hindi document picks a
//! Devanagari-capable face when one is installed.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use genpdf::fonts::{FontData, FontFamily};
use tracing::{debug, warn};

use crate::PdfError;

/// Faces tried first, in order.
const PREFERRED: &[&str] = &[
    "NotoSans-Regular",
    "NotoSansDevanagari-Regular",
    "NotoSansDevanagariUI-Regular",
    "Lohit-Devanagari",
    "FreeSans",
    "Mangal",
    "Nirmala",
    "DejaVuSans",
    "LiberationSans-Regular",
    "Arial",
];

/// File-name fragments of faces that are not an upright regular weight.
const STYLE_MARKERS: &[&str] = &[
    "Bold", "Italic", "Oblique", "Light", "Thin", "Medium", "Black", "Heavy", "Condensed",
    "Mono", "Semi", "Extra",
];

const MAX_DEPTH: usize = 6;

/// An installed font and the number of requested characters it cannot show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontMatch {
    pub path: PathBuf,
    pub missing: usize,
}

/// Best installed font for `text`, or `None` when no TrueType font is found.
pub fn find_system_font(text: &str) -> Option<FontMatch> {
    let needed = needed_chars(text);
    best_system_font(&needed).map(|(path, _, covered)| FontMatch {
        path,
        missing: needed.len() - covered,
    })
}

/// Load the regular face (and a bold sibling when one exists) from
/// `explicit`, or from the best installed font for `text`.
pub fn load_family(explicit: Option<&Path>, text: &str) -> Result<FontFamily<FontData>, PdfError> {
    let needed = needed_chars(text);
    let (path, data, covered) = match explicit {
        Some(path) => {
            let data = fs::read(path)
                .map_err(|e| PdfError::Font(format!("cannot read {}: {}", path.display(), e)))?;
            let covered = coverage(&data, &needed).ok_or_else(|| {
                PdfError::Font(format!("{} is not a TrueType font", path.display()))
            })?;
            (path.to_path_buf(), data, covered)
        }
        None => best_system_font(&needed).ok_or_else(|| {
            PdfError::Font("no TrueType font installed; set a font file in the export options".into())
        })?,
    };

    if covered < needed.len() {
        warn!(
            font = %path.display(),
            missing = needed.len() - covered,
            "font has no glyphs for some characters"
        );
    } else {
        debug!(font = %path.display(), "pdf font selected");
    }

    let regular = font_data(data, &path)?;
    let bold = match bold_sibling(&path) {
        Some(bold_path) => match fs::read(&bold_path) {
            Ok(data) => font_data(data, &bold_path)?,
            Err(_) => regular.clone(),
        },
        None => regular.clone(),
    };
    Ok(FontFamily {
        regular: regular.clone(),
        italic: regular,
        bold: bold.clone(),
        bold_italic: bold,
    })
}

fn font_data(data: Vec<u8>, path: &Path) -> Result<FontData, PdfError> {
    FontData::new(data, None).map_err(|e| PdfError::Font(format!("{}: {}", path.display(), e)))
}

fn needed_chars(text: &str) -> BTreeSet<char> {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Characters of `needed` the font has a glyph for; `None` if unparsable.
fn coverage(data: &[u8], needed: &BTreeSet<char>) -> Option<usize> {
    let font = rusttype::Font::try_from_bytes(data)?;
    Some(needed.iter().filter(|&&c| font.glyph(c).id().0 != 0).count())
}

fn best_system_font(needed: &BTreeSet<char>) -> Option<(PathBuf, Vec<u8>, usize)> {
    let mut paths = Vec::new();
    for dir in font_dirs() {
        collect_ttf(&dir, 0, &mut paths);
    }
    paths.retain(|p| is_regular(p));
    paths.sort_by_cached_key(|p| (rank(p), p.clone()));

    let mut best: Option<(PathBuf, Vec<u8>, usize)> = None;
    for path in paths {
        let Ok(data) = fs::read(&path) else {
            continue;
        };
        let Some(covered) = coverage(&data, needed) else {
            continue;
        };
        if covered == needed.len() {
            return Some((path, data, covered));
        }
        if best.as_ref().map_or(true, |(_, _, most)| covered > *most) {
            best = Some((path, data, covered));
        }
    }
    best
}

fn font_dirs() -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = [
        "/usr/share/fonts",
        "/usr/local/share/fonts",
        "/Library/Fonts",
        "/System/Library/Fonts",
        r"C:\Windows\Fonts",
    ]
    .iter()
    .map(PathBuf::from)
    .collect();
    if let Some(user) = dirs::font_dir() {
        out.push(user);
    }
    if let Some(home) = dirs::home_dir() {
        out.push(home.join(".fonts"));
    }
    out
}

fn collect_ttf(dir: &Path, depth: usize, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if depth < MAX_DEPTH {
                collect_ttf(&path, depth + 1, out);
            }
        } else if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("ttf"))
        {
            out.push(path);
        }
    }
}

fn stem(path: &Path) -> &str {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or("")
}

fn is_regular(path: &Path) -> bool {
    let stem = stem(path);
    !STYLE_MARKERS.iter().any(|marker| stem.contains(marker))
}

fn rank(path: &Path) -> usize {
    let stem = stem(path);
    PREFERRED
        .iter()
        .position(|name| stem.eq_ignore_ascii_case(name))
        .unwrap_or(PREFERRED.len())
}

/// `Foo-Regular.ttf` -> `Foo-Bold.ttf`, `Foo.ttf` -> `Foo-Bold.ttf`.
fn bold_sibling(path: &Path) -> Option<PathBuf> {
    let stem = stem(path);
    let name = if stem.contains("Regular") {
        stem.replacen("Regular", "Bold", 1)
    } else {
        format!("{}-Bold", stem)
    };
    let candidate = path.with_file_name(format!("{}.ttf", name));
    candidate.exists().then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regular_faces_only() {
        assert!(is_regular(Path::new("/f/DejaVuSans.ttf")));
        assert!(is_regular(Path::new("/f/NotoSansDevanagari-Regular.ttf")));
        assert!(!is_regular(Path::new("/f/DejaVuSans-Bold.ttf")));
        assert!(!is_regular(Path::new("/f/DejaVuSansMono.ttf")));
        assert!(!is_regular(Path::new("/f/DejaVuSans-ExtraLight.ttf")));
    }

    #[test]
    fn devanagari_faces_rank_before_latin() {
        let noto = rank(Path::new("/f/NotoSansDevanagari-Regular.ttf"));
        let dejavu = rank(Path::new("/f/DejaVuSans.ttf"));
        let unknown = rank(Path::new("/f/Whatever.ttf"));
        assert!(noto < dejavu);
        assert!(dejavu < unknown);
    }

    #[test]
    fn whitespace_is_not_needed() {
        let needed = needed_chars("a b\n a\tप");
        assert_eq!(needed.into_iter().collect::<String>(), "abप");
    }

    #[test]
    fn garbage_is_not_a_font() {
        assert_eq!(coverage(b"not a font", &needed_chars("x")), None);
    }

    #[test]
    fn missing_explicit_font_is_font_error() {
        let err = load_family(Some(Path::new("/nonexistent/font.ttf")), "x").unwrap_err();
        assert!(matches!(err, PdfError::Font(_)));
    }
}
