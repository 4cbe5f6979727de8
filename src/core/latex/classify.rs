//! Heuristic "does this line look like math" predicate.
//!
//! Used by the boxed-convention screen renderer to keep math lines out of the
//! prose stream when the math is shown separately. Any single pattern match
//! classifies the line as math.

use lazy_static::lazy_static;
use regex::RegexSet;

const MATH_PATTERNS: &[&str] = &[
    // arithmetic with equals
    r"\d+\s*÷\s*\d+\s*=\s*\d+",
    r"\d+\s*×\s*\d+\s*=\s*\d+",
    r"\d+\s*\+\s*\d+\s*=\s*\d+",
    r"\d+\s*-\s*\d+\s*=\s*\d+",
    r"\d+\s*=\s*\d+\s*×\s*\d+",
    r"\d+\s*=\s*\d+\s*\^\s*\d+",
    // roots, fractions, operators
    r"\\sqrt\{[^}]+\}",
    r"\\frac\{[^}]+\}\{[^}]+\}",
    r"\\cdot",
    r"\\times",
    r"\\div",
    r"\\pm",
    r"\\leq",
    r"\\geq",
    r"\\neq",
    r"\\approx",
    // powers and subscripts
    r"\^[0-9]+",
    r"\^\{[^}]+\}",
    r"_[0-9]+",
    r"_\{[^}]+\}",
    // functions
    r"\\(?:sin|cos|tan|csc|sec|cot|log|ln|exp|lim)",
    // sets and logic
    r"\\(?:in|subset|subseteq|cup|cap|emptyset|forall|exists)",
    // brackets
    r"\\left[(\[{].*?\\right[)\]}]",
    r"\([^)]*\)",
    r"\{[^}]*\}",
    r"\[[^\]]*\]",
    // calculus symbols
    r"\\(?:infty|partial|nabla|int|sum|prod)",
    // arrows
    r"\\(?:rightarrow|leftarrow|Rightarrow|Leftarrow|leftrightarrow|Leftrightarrow)",
    // matrices and vectors
    r"\\begin\{matrix\}.*?\\end\{matrix\}",
    r"\\begin\{pmatrix\}.*?\\end\{pmatrix\}",
    r"\\begin\{bmatrix\}.*?\\end\{bmatrix\}",
    r"\\vec\{[^}]+\}",
    // equation forms
    r"\d+\s*=\s*[^=]+",
    r"[a-zA-Z]\s*=\s*[^=]+",
    r"\\boxed\{[^}]+\}",
    // greek letters
    r"\\(?:alpha|beta|gamma|delta|epsilon|zeta|eta|theta|iota|kappa|lambda|mu|nu|xi|pi|rho|sigma|tau|upsilon|phi|chi|psi|omega)",
    // other operators
    r"\\(?:oplus|otimes|odot|star|ast|perp|parallel)",
    r"[a-zA-Z]\s*=\s*\\frac\{[^}]+\}\{[^}]+\}",
    r"[a-zA-Z]\s*=\s*\\sqrt\{[^}]+\}",
    // number systems
    r"\\mathbb\{[NZQRC]\}",
    r"\\varnothing",
];

lazy_static! {
    static ref MATH_LINE: RegexSet = RegexSet::new(MATH_PATTERNS).unwrap();
}

/// True when the trimmed line matches any math pattern.
pub fn looks_like_math(line: &str) -> bool {
    MATH_LINE.is_match(line.trim())
}

/// Patterns that fired, for diagnostics.
pub fn matching_patterns(line: &str) -> Vec<&'static str> {
    MATH_LINE
        .matches(line.trim())
        .into_iter()
        .map(|i| MATH_PATTERNS[i])
        .collect()
}
