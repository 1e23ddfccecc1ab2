//! Bounded text rendering shared by the registries.

use std::fmt;

/// Registries longer than this are abbreviated to their first and last rows.
pub const SUMMARY_ROWS: usize = 6;

/// Writes `"<n> <noun> (\n<row>\n...\n<row>)"`, eliding the middle of long lists.
pub(crate) fn write_summary<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    noun: &str,
    items: &[T],
) -> fmt::Result {
    write!(f, "{} {} (", items.len(), noun)?;
    let half = SUMMARY_ROWS / 2;
    if items.len() <= SUMMARY_ROWS {
        for item in items {
            write!(f, "\n{}", item)?;
        }
    } else {
        for item in &items[..half] {
            write!(f, "\n{}", item)?;
        }
        write!(f, "\n...")?;
        for item in &items[items.len() - half..] {
            write!(f, "\n{}", item)?;
        }
    }
    write!(f, ")")
}

/// Resolves an optional start/end pair against a sequence of length `len`.
///
/// Out of range bounds are clamped and an inverted range is empty.
pub(crate) fn clamp_range(
    start: Option<usize>,
    end: Option<usize>,
    len: usize,
) -> std::ops::Range<usize> {
    let end = end.unwrap_or(len).min(len);
    let start = start.unwrap_or(0).min(end);
    start..end
}
