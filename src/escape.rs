//! Prompt-syntax escaping for committed tags
//!
//! Unescaped parentheses are weighting groups in the prompt syntax, so literal
//! parentheses in a tag name must be backslash-escaped.

/// Escape a canonical tag name for insertion into a prompt
///
/// Not idempotent: escaping an already-escaped name escapes it again. Only pass
/// canonical `TagEntry::name` values.
pub fn escape_tag(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if matches!(ch, '(' | ')') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_parentheses() {
        assert_eq!(
            escape_tag("uma_musume (umamusume)"),
            "uma_musume \\(umamusume\\)"
        );
        assert_eq!(escape_tag(":)"), ":\\)");
    }

    #[test]
    fn test_plain_names_unchanged() {
        assert_eq!(escape_tag("long_hair"), "long_hair");
        assert_eq!(escape_tag(""), "");
    }

    #[test]
    fn test_double_escape() {
        let once = escape_tag("a_(b)");
        assert_eq!(once, "a_\\(b\\)");
        assert_eq!(escape_tag(&once), "a_\\\\(b\\\\)");
    }
}
