//! Elector number handling and `Elector ID` derivation.

/// Split a combined `PD-NNN` elector number into its polling district code
/// and number. Anything after a second `-` is dropped.
pub fn split_elector_number(number: &str) -> Option<(&str, &str)> {
    let mut parts = number.split('-');
    let district = parts.next()?;
    let rest = parts.next()?;
    Some((district, rest))
}

/// Drop a single trailing `/` left over from an empty suffix.
pub fn normalize_number(number: &str) -> &str {
    number.strip_suffix('/').unwrap_or(number)
}

/// Build the register key from prefix, number and suffix.
///
/// `number` is expected to have been through [`normalize_number`] already.
/// A number that still carries a `/suffix` is used as is; otherwise the
/// suffix is appended, defaulting to `0`.
pub fn elector_id(prefix: &str, number: &str, suffix: &str) -> String {
    if number.contains('/') {
        format!("{prefix}-{number}")
    } else if suffix.is_empty() {
        format!("{prefix}-{number}/0")
    } else {
        format!("{prefix}-{number}/{suffix}")
    }
}
