//! Field-level text cleaning.
//!
//! Supplier exports arrive as Windows-1252 with stray mojibake, soft hyphens
//! and assorted invisible characters. Every field passes through
//! [`clean_text`] first; address and name fields get extra handling on top.

use std::sync::LazyLock;

use regex::{Captures, Regex};

// UK postcode fragment anywhere inside an address line ("ab1 2cd", "SW1A1AA").
static POSTCODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b[a-z]{1,2}\d{1,2}[a-z]?\s*\d[a-z]{2}\b").expect("postcode pattern")
});

static MC_MAC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(Mc|Mac)(\w)").expect("Mc/Mac pattern"));

static SPACES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s{2,}").expect("spaces pattern"));

/// Format characters (Unicode category Cf).
fn is_format_char(c: char) -> bool {
    matches!(
        c,
        '\u{AD}'
            | '\u{600}'..='\u{605}'
            | '\u{61C}'
            | '\u{200B}'..='\u{200F}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{206F}'
            | '\u{FEFF}'
            | '\u{FFF9}'..='\u{FFFB}'
            | '\u{110BD}'
            | '\u{110CD}'
            | '\u{13430}'..='\u{1343F}'
            | '\u{1BCA0}'..='\u{1BCA3}'
            | '\u{1D173}'..='\u{1D17A}'
            | '\u{E0001}'
            | '\u{E0020}'..='\u{E007F}'
    )
}

fn is_private_use(c: char) -> bool {
    matches!(
        c,
        '\u{E000}'..='\u{F8FF}' | '\u{F0000}'..='\u{FFFFD}' | '\u{100000}'..='\u{10FFFD}'
    )
}

/// Noncharacters: U+FDD0..U+FDEF and the last two code points of every plane.
fn is_noncharacter(c: char) -> bool {
    matches!(c, '\u{FDD0}'..='\u{FDEF}') || (c as u32) & 0xFFFE == 0xFFFE
}

fn is_invisible(c: char) -> bool {
    c.is_control() || is_format_char(c) || is_private_use(c) || is_noncharacter(c)
}

/// Strip control, format, private-use and noncharacter code points and the
/// mojibake lead bytes `Ã` / `Â`, turn non-breaking spaces into plain
/// spaces, then trim.
///
/// Other unassigned code points are kept.
pub fn clean_text(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .filter(|&c| !is_invisible(c))
        .filter(|&c| c != '\u{C3}' && c != '\u{C2}')
        .map(|c| if c == '\u{A0}' { ' ' } else { c })
        .collect();
    cleaned.trim().to_string()
}

/// Upper-case the first letter of every word and lower-case the rest.
///
/// A word starts after any character that is not a letter or digit, so
/// `o'neil` becomes `O'Neil` and `flat 1st floor` becomes `Flat 1st Floor`.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
        } else {
            out.push(c);
        }
        in_word = c.is_alphanumeric();
    }
    out
}

/// Capitalize the letter following a `Mc` or `Mac` prefix.
pub fn capitalize_mc_mac(name: &str) -> String {
    MC_MAC_RE
        .replace_all(name, |caps: &Captures| {
            format!("{}{}", &caps[1], caps[2].to_uppercase())
        })
        .into_owned()
}

fn is_apostrophe_like(c: char) -> bool {
    matches!(
        c,
        '`' | '\u{80}'..='\u{BF}' | '\u{2018}' | '\u{2019}' | '\u{201B}' | '\u{2032}'
    )
}

/// Normalize a personal name field.
pub fn clean_name(name: &str) -> String {
    let normalized: String = name
        .chars()
        .filter(|&c| c != ',')
        .map(|c| if is_apostrophe_like(c) { '\'' } else { c })
        .collect();
    capitalize_mc_mac(&title_case(normalized.trim()))
}

/// Clean one address line: drop commas, blank it when it only repeats the
/// postcode, and strip postcode fragments embedded in the text.
pub fn clean_address(line: &str, postcode: &str) -> String {
    let line = line.replace(',', "");
    if !postcode.is_empty() && line.trim().eq_ignore_ascii_case(postcode.trim()) {
        return String::new();
    }
    let stripped = POSTCODE_RE.replace_all(&line, "");
    SPACES_RE.replace_all(stripped.trim(), " ").into_owned()
}
