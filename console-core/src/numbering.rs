//! Sequential human-readable numbers (`BOT003`, `NS004`, `001`).
//!
//! Numbers are a presentation convenience. The durable identifier is always
//! the server-assigned id.

/// Derive the next sequential number from the current collection size.
///
/// The ordinal is `current_count + 1`, zero-padded to `pad_width` and
/// prefixed. Ordinals wider than `pad_width` are never truncated. The
/// ordinal saturates at `usize::MAX`.
pub fn sequential_number(prefix: &str, current_count: usize, pad_width: usize) -> String {
    format!("{prefix}{:0width$}", current_count.saturating_add(1), width = pad_width)
}

/// Extract the numeric ordinal from a number carrying `prefix`.
///
/// Returns `None` when the prefix does not match or the suffix is not a
/// plain decimal. Ordinals with no successor (`usize::MAX` and beyond) are
/// rejected so they never seed the next local number.
pub fn parse_ordinal(prefix: &str, number: &str) -> Option<usize> {
    let digits = number.strip_prefix(prefix)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<usize>().ok().filter(|ordinal| *ordinal < usize::MAX)
}
