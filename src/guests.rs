//! Turns the free-text "who's coming?" field into individual names.
//!
//! People type guest lists every which way: `John & Jane`, `Bob, Carol, and Ted`,
//! one name per line, `alice + bob`. Every separator is rewritten to a comma
//! first, then the string is split, trimmed and title-cased.

use once_cell::sync::Lazy;
use regex::Regex;

static AND_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i),?\s+and\s+").expect("and regex"));
static AMPERSAND_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*&\s*").expect("ampersand regex"));
static NEWLINE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+").expect("newline regex"));
static SEMICOLON_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r";").expect("semicolon regex"));
static PLUS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\+\s*").expect("plus regex"));

const SEPARATOR: &str = ", ";

/// Parses a raw guest string into an ordered list of title-cased names.
///
/// Never fails: absent or empty input gives an empty list, and anything else
/// degrades to best-effort splitting. Duplicates are kept in input order.
pub fn parse_guest_names(raw: Option<&str>) -> Vec<String> {
    let raw = match raw {
        Some(r) if !r.is_empty() => r,
        _ => return Vec::new(),
    };

    let normalized = normalize_separators(raw);

    normalized
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(title_case)
        .collect()
}

// Order matters: "and" runs before "&" so ", and " swallows the oxford comma.
fn normalize_separators(raw: &str) -> String {
    let s = AND_RE.replace_all(raw, SEPARATOR);
    let s = AMPERSAND_RE.replace_all(&s, SEPARATOR);
    let s = NEWLINE_RE.replace_all(&s, SEPARATOR);
    let s = SEMICOLON_RE.replace_all(&s, SEPARATOR);
    let s = PLUS_RE.replace_all(&s, SEPARATOR);
    s.into_owned()
}

/// Upper-cases the first character of each space-separated word and
/// lower-cases the rest. No special handling for `O'brien` or `Mary-jane`.
fn title_case(name: &str) -> String {
    name.split(' ')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
