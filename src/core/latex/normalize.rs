//! Symbol-mode and delimiter-mode normalisation.

use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::symbols::{lookup, subscript_digit, superscript_digit, superscript_digits};

lazy_static! {
    static ref FRAC: Regex = Regex::new(r"\\frac\{([^}]+)\}\{([^}]+)\}").unwrap();
    static ref SQRT: Regex = Regex::new(r"\\sqrt\{([^}]+)\}").unwrap();
    static ref SUP_DIGIT: Regex = Regex::new(r"\^\{([0-9])\}").unwrap();
    static ref SUB_DIGIT: Regex = Regex::new(r"_\{([0-9])\}").unwrap();
    static ref COMMAND: Regex = Regex::new(r"\\([A-Za-z]+)").unwrap();
    static ref CARET_DIGITS: Regex = Regex::new(r"\^([0-9]+)").unwrap();
    static ref CARET_BRACED_DIGITS: Regex = Regex::new(r"\^\{([0-9]+)\}").unwrap();
    static ref DOLLAR_MATH: Regex = Regex::new(r"(?s)\$\$(.*?)\$\$|\$(.*?)\$").unwrap();
    static ref TEXT_GROUP: Regex = Regex::new(r"\\(?:text|mathrm|mbox)\{([^}]*)\}").unwrap();
    static ref SIZING: Regex = Regex::new(r"\\(?:left|right)\b|\\[,;:!]|\\q?quad\b").unwrap();
}

/// Rewrite the bounded LaTeX subset to Unicode glyphs.
///
/// `\frac{A}{B}` becomes `A/B`, `\sqrt{A}` becomes `√A`, single-digit braced
/// scripts become script digits, and known commands become their glyph.
/// Unknown commands are left verbatim.
pub fn latex_to_symbols(text: &str) -> String {
    let text = FRAC.replace_all(text, "${1}/${2}");
    let text = SQRT.replace_all(&text, "√${1}");
    let text = SUP_DIGIT.replace_all(&text, |caps: &Captures| {
        script_or_verbatim(caps, superscript_digit)
    });
    let text = SUB_DIGIT.replace_all(&text, |caps: &Captures| {
        script_or_verbatim(caps, subscript_digit)
    });
    replace_commands(&text).into_owned()
}

fn script_or_verbatim(caps: &Captures, map: fn(char) -> Option<char>) -> String {
    caps[1]
        .chars()
        .next()
        .and_then(map)
        .map(String::from)
        .unwrap_or_else(|| caps[0].to_string())
}

/// Token-exact command replacement: `\subseteq` is looked up whole, never
/// as `\subset` followed by `eq`.
fn replace_commands(text: &str) -> Cow<'_, str> {
    COMMAND.replace_all(text, |caps: &Captures| match lookup(&caps[1]) {
        Some(glyph) => glyph.to_string(),
        None => caps[0].to_string(),
    })
}

/// `\(`/`\)` → `$` and `\[`/`\]` → `$$`.
pub fn normalize_delimiters(text: &str) -> String {
    text.replace("\\(", "$")
        .replace("\\)", "$")
        .replace("\\[", "$$")
        .replace("\\]", "$$")
}

/// `^<digits>` anywhere in the text → superscript digits.
pub fn caret_superscripts(text: &str) -> String {
    CARET_DIGITS
        .replace_all(text, |caps: &Captures| superscript_digits(&caps[1]))
        .into_owned()
}

/// Delimiter mode for markdown renderers: `$`/`$$` fences plus caret
/// superscripts.
pub fn latex_to_markdown_math(text: &str) -> String {
    caret_superscripts(&normalize_delimiters(text))
}

/// Flatten `$..$` / `$$..$$` math into readable plain text.
///
/// Each span is rendered in symbol mode with its fences dropped; caret
/// exponents outside math are converted as well. An empty span is kept as
/// written.
pub fn latex_document_to_plain(text: &str) -> String {
    let converted = DOLLAR_MATH.replace_all(text, |caps: &Captures| {
        let inner = caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .unwrap_or("");
        if inner.trim().is_empty() {
            return caps[0].to_string();
        }
        math_to_plain(inner)
    });
    caret_superscripts(&converted)
}

fn math_to_plain(math: &str) -> String {
    let unwrapped = TEXT_GROUP.replace_all(math, "${1}");
    let stripped = SIZING.replace_all(&unwrapped, "");
    let braced = CARET_BRACED_DIGITS
        .replace_all(&stripped, |caps: &Captures| superscript_digits(&caps[1]));
    caret_superscripts(&latex_to_symbols(&braced)).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn symbol_rewrites() {
        assert_eq!(latex_to_symbols(r"\frac{1}{2}"), "1/2");
        assert_eq!(latex_to_symbols(r"\sqrt{4}"), "√4");
        assert_eq!(latex_to_symbols(r"x^{2}"), "x²");
        assert_eq!(latex_to_symbols(r"a_{1}"), "a₁");
        assert_eq!(latex_to_symbols(r"\alpha"), "α");
    }

    #[test]
    fn multi_digit_braces_untouched() {
        assert_eq!(latex_to_symbols(r"x^{10}"), "x^{10}");
        assert_eq!(latex_to_symbols(r"x_{ij}"), "x_{ij}");
    }

    #[test]
    fn commands_are_matched_whole() {
        assert_eq!(latex_to_symbols(r"A \subseteq B"), "A ⊆ B");
        assert_eq!(latex_to_symbols(r"\int_0^1 \infty"), "∫_0^1 ∞");
        assert_eq!(latex_to_symbols(r"x \in S"), "x ∈ S");
    }

    #[test]
    fn unknown_commands_left_verbatim() {
        assert_eq!(latex_to_symbols(r"\mathcal{F} \times 2"), r"\mathcal{F} × 2");
    }

    #[test]
    fn delimiter_mode() {
        assert_eq!(normalize_delimiters(r"\(x\) and \[y\]"), "$x$ and $$y$$");
        assert_eq!(caret_superscripts("x^2 + y^10 + z^a"), "x² + y¹⁰ + z^a");
        assert_eq!(latex_to_markdown_math(r"\(x^3\)"), "$x³$");
    }

    #[test]
    fn plain_text_conversion() {
        assert_eq!(
            latex_document_to_plain(r"Compute $\frac{a}{b} \times c^{12}$ then 2^5."),
            "Compute a/b × c¹² then 2⁵."
        );
        assert_eq!(latex_document_to_plain("$$\\alpha + \\beta$$"), "α + β");
        assert_eq!(latex_document_to_plain("costs $ $ today"), "costs $ $ today");
        assert_eq!(
            latex_document_to_plain(r"$\left(x\right) = \text{five}$"),
            "(x) = five"
        );
    }
}
