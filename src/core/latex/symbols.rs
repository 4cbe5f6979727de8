//! Compile-time LaTeX command → Unicode glyph tables.

use phf::phf_map;

/// Operators, relations, set and calculus symbols, arrows.
pub static OPERATORS: phf::Map<&'static str, &'static str> = phf_map! {
    "div" => "÷",
    "times" => "×",
    "cdot" => "⋅",
    "pm" => "±",
    "mp" => "∓",
    "leq" => "≤",
    "le" => "≤",
    "geq" => "≥",
    "ge" => "≥",
    "neq" => "≠",
    "ne" => "≠",
    "approx" => "≈",
    "infty" => "∞",
    "partial" => "∂",
    "nabla" => "∇",
    "int" => "∫",
    "sum" => "∑",
    "prod" => "∏",
    "in" => "∈",
    "notin" => "∉",
    "subset" => "⊂",
    "subseteq" => "⊆",
    "supset" => "⊃",
    "supseteq" => "⊇",
    "cup" => "∪",
    "cap" => "∩",
    "emptyset" => "∅",
    "varnothing" => "∅",
    "forall" => "∀",
    "exists" => "∃",
    "perp" => "⊥",
    "parallel" => "∥",
    "angle" => "∠",
    "degree" => "°",
    "circ" => "∘",
    "rightarrow" => "→",
    "to" => "→",
    "leftarrow" => "←",
    "Rightarrow" => "⇒",
    "implies" => "⇒",
    "Leftarrow" => "⇐",
    "leftrightarrow" => "↔",
    "Leftrightarrow" => "⇔",
    "iff" => "⇔",
};

/// Lowercase Greek letters and their `var` forms.
pub static GREEK_LETTERS: phf::Map<&'static str, &'static str> = phf_map! {
    "alpha" => "α",
    "beta" => "β",
    "gamma" => "γ",
    "delta" => "δ",
    "epsilon" => "ε",
    "varepsilon" => "ϵ",
    "zeta" => "ζ",
    "eta" => "η",
    "theta" => "θ",
    "vartheta" => "ϑ",
    "iota" => "ι",
    "kappa" => "κ",
    "lambda" => "λ",
    "mu" => "μ",
    "nu" => "ν",
    "xi" => "ξ",
    "omicron" => "ο",
    "pi" => "π",
    "rho" => "ρ",
    "varrho" => "ϱ",
    "sigma" => "σ",
    "varsigma" => "ς",
    "tau" => "τ",
    "upsilon" => "υ",
    "phi" => "φ",
    "varphi" => "ϕ",
    "chi" => "χ",
    "psi" => "ψ",
    "omega" => "ω",
};

const SUPERSCRIPT_DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];
const SUBSCRIPT_DIGITS: [char; 10] = ['₀', '₁', '₂', '₃', '₄', '₅', '₆', '₇', '₈', '₉'];

/// Glyph for a command name (without the backslash).
pub fn lookup(name: &str) -> Option<&'static str> {
    OPERATORS
        .get(name)
        .or_else(|| GREEK_LETTERS.get(name))
        .copied()
}

pub fn superscript_digit(d: char) -> Option<char> {
    d.to_digit(10).map(|v| SUPERSCRIPT_DIGITS[v as usize])
}

pub fn subscript_digit(d: char) -> Option<char> {
    d.to_digit(10).map(|v| SUBSCRIPT_DIGITS[v as usize])
}

/// Map every ASCII digit to its superscript form, leaving other chars alone.
pub fn superscript_digits(s: &str) -> String {
    s.chars()
        .map(|c| superscript_digit(c).unwrap_or(c))
        .collect()
}
