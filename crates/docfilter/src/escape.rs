//! Regex escaping for literal filter text.

/// Escapes every regex metacharacter in `literal`.
///
/// The result, used as a pattern, matches exactly the literal text. Applied
/// to every user-supplied string before it is interpolated into a `$regex`
/// pattern or into a dynamic key pattern.
///
/// ```
/// assert_eq!(docfilter::escape_regex("a.b"), r"a\.b");
/// assert_eq!(docfilter::escape_regex("(1+1)"), r"\(1\+1\)");
/// ```
pub fn escape_regex(literal: &str) -> String {
    regex::escape(literal)
}
