//! String conversion utilities.

/// Returns `true` when the value is empty or only whitespace.
///
/// Sheet cells routinely carry stray spaces, so "blank" rather than "empty"
/// is the test used for optional row fields.
///
/// # Examples
///
/// ```
/// use scenescript_domain::common::is_blank;
///
/// assert!(is_blank(""));
/// assert!(is_blank("  \t"));
/// assert!(!is_blank(" a "));
/// ```
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Converts an empty string to `None`, otherwise returns `Some(value)`.
///
/// # Examples
///
/// ```
/// use scenescript_domain::common::none_if_empty;
///
/// assert_eq!(none_if_empty("hello"), Some("hello"));
/// assert_eq!(none_if_empty(""), None);
/// assert_eq!(none_if_empty(" "), Some(" ")); // Whitespace is not empty
/// ```
pub fn none_if_empty(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Trims the value and returns `None` when nothing is left.
///
/// # Examples
///
/// ```
/// use scenescript_domain::common::none_if_blank;
///
/// assert_eq!(none_if_blank("  greet01 "), Some("greet01"));
/// assert_eq!(none_if_blank("   "), None);
/// ```
pub fn none_if_blank(value: &str) -> Option<&str> {
    none_if_empty(value.trim())
}

/// Converts line breaks (`\r\n`, `\n`, `\r`) into the two-character `\n` marker.
///
/// Used where a multi-line cell has to stay on a single script line,
/// e.g. after a `#` comment marker.
///
/// # Examples
///
/// ```
/// use scenescript_domain::common::collapse_line_breaks;
///
/// assert_eq!(collapse_line_breaks("a\r\nb\nc"), "a\\nb\\nc");
/// ```
pub fn collapse_line_breaks(value: &str) -> String {
    value
        .replace("\r\n", "\\n")
        .replace('\n', "\\n")
        .replace('\r', "\\n")
}

/// Converts literal two-character `\n` markers into real line breaks.
///
/// # Examples
///
/// ```
/// use scenescript_domain::common::expand_line_break_markers;
///
/// assert_eq!(expand_line_break_markers("a\\nb"), "a\nb");
/// ```
pub fn expand_line_break_markers(value: &str) -> String {
    value.replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank(" "));
        assert!(is_blank("\n\t"));
        assert!(!is_blank("x"));
    }

    #[test]
    fn test_none_if_empty_whitespace_is_not_empty() {
        assert_eq!(none_if_empty(" "), Some(" "));
        assert_eq!(none_if_empty("\t"), Some("\t"));
    }

    #[test]
    fn test_none_if_blank_trims() {
        assert_eq!(none_if_blank(" id "), Some("id"));
        assert_eq!(none_if_blank("\t"), None);
    }

    #[test]
    fn test_collapse_then_expand_restores_line_breaks() {
        let collapsed = collapse_line_breaks("line1\nline2");
        assert_eq!(collapsed, "line1\\nline2");
        assert!(!collapsed.contains('\n'));
        assert_eq!(expand_line_break_markers(&collapsed), "line1\nline2");
    }

    #[test]
    fn test_collapse_handles_carriage_returns() {
        assert_eq!(collapse_line_breaks("a\rb"), "a\\nb");
        assert_eq!(collapse_line_breaks("a\r\nb"), "a\\nb");
    }
}
