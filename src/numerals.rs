//! Devanagari numeral normalization.
//!
//! Nepali legal documents number their markers in Devanagari digits
//! (० १ २ ... ९, U+0966–U+096F). Downstream citation matching expects ASCII
//! digits, so every digit run is mapped before tokenization. Everything
//! else, including ASCII digits already present in prose, passes through
//! untouched, which also makes the mapping idempotent.

/// Map a single Devanagari digit to its ASCII equivalent.
///
/// Returns `None` for any other character.
#[must_use]
fn to_ascii_digit(c: char) -> Option<char> {
    let code = c as u32;
    if (0x0966..=0x096F).contains(&code) {
        // U+0966 is DEVANAGARI DIGIT ZERO
        char::from_u32(code - 0x0966 + u32::from(b'0'))
    } else {
        None
    }
}

/// Replace every Devanagari digit in `text` with its ASCII equivalent.
///
/// Idempotent: normalizing already-normalized text is a no-op. Empty input
/// returns empty. Unrecognized code points are treated as opaque and copied
/// through unchanged.
///
/// # Examples
/// ```
/// use vidhi_ingest::numerals::normalize_numerals;
///
/// assert_eq!(normalize_numerals("दफा १२"), "दफा 12");
/// assert_eq!(normalize_numerals("already 12"), "already 12");
/// ```
#[must_use]
pub fn normalize_numerals(text: &str) -> String {
    // Fast path: most English-language lines have no Devanagari digits
    if !text.chars().any(|c| to_ascii_digit(c).is_some()) {
        return text.to_string();
    }

    text.chars()
        .map(|c| to_ascii_digit(c).unwrap_or(c))
        .collect()
}

/// Extract the first digit run from a marker string, normalized to ASCII.
///
/// Used on marker lines like "भाग १" or "दफा 22" to pull out the declared
/// number. Returns `None` when the string contains no digits.
#[must_use]
pub fn extract_number(text: &str) -> Option<String> {
    let normalized = normalize_numerals(text);
    let start = normalized.find(|c: char| c.is_ascii_digit())?;
    let run: String = normalized[start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    Some(run)
}
