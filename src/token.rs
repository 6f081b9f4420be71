//! Locating the tag being typed at the caret
//!
//! A token is a maximal run of tag characters (ASCII letters and digits, `_`,
//! `-`, `:`, `(`, `)`) around the caret. Weighting syntax is trimmed off both
//! ends, including a numeric `:weight` suffix, so typing inside `(partial:1.1)`
//! still completes `partial`. The suffix only counts as a weight when a `.` or a
//! closing `)` follows it; names such as `16:9` are left alone.

use crate::types::TokenSpan;

/// Whether a byte can be part of a token
pub fn is_token_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'-' | b':' | b'(' | b')')
}

/// Find the token around `cursor` (a byte offset into `text`)
///
/// Returns `None` when the caret is not touching a token, or when only
/// weighting delimiters are there. The returned offsets are positions in
/// `text`, ready for splicing a replacement over `start..end`. A cursor past
/// the end is treated as the end of the text, one inside a multi-byte
/// character as the start of that character.
pub fn get_current_token(text: &str, cursor: usize) -> Option<TokenSpan> {
    let bytes = text.as_bytes();
    let mut cursor = cursor.min(bytes.len());
    while !text.is_char_boundary(cursor) {
        cursor -= 1;
    }

    // Token bytes are ASCII, so these boundaries always fall on char boundaries
    let mut start = cursor;
    while start > 0 && is_token_byte(bytes[start - 1]) {
        start -= 1;
    }

    let mut end = cursor;
    while end < bytes.len() && is_token_byte(bytes[end]) {
        end += 1;
    }

    let raw_end = end;
    while start < end && matches!(bytes[start], b':' | b'(') {
        start += 1;
    }
    end = trim_trailing(bytes, start, end);

    // Numeric weight such as the ":1" of "(cat:1.2)" or "(cat:2)"
    let closes_weight =
        bytes.get(raw_end) == Some(&b'.') || bytes[end..raw_end].contains(&b')');
    if closes_weight {
        if let Some(colon) = text[start..end].rfind(':') {
            let weight = &bytes[start + colon + 1..end];
            if !weight.is_empty() && weight.iter().all(u8::is_ascii_digit) {
                end = trim_trailing(bytes, start, start + colon);
            }
        }
    }

    if start >= end {
        return None;
    }

    Some(TokenSpan {
        token: text[start..end].to_string(),
        start,
        end,
    })
}

fn trim_trailing(bytes: &[u8], start: usize, mut end: usize) -> usize {
    while end > start && matches!(bytes[end - 1], b')' | b':') {
        end -= 1;
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_inside_weight_group() {
        let text = "a (cat:1.2) dog";
        let cursor = text.find("cat").unwrap() + 1;

        let span = get_current_token(text, cursor).unwrap();
        assert_eq!(span.token, "cat");
        assert_eq!((span.start, span.end), (3, 6));
        assert_eq!(&text[span.start..span.end], span.token);
    }

    #[test]
    fn test_colon_inside_name_is_kept() {
        let text = "re:zero, (nier:automata:1.1)";
        assert_eq!(get_current_token(text, 2).unwrap().token, "re:zero");

        let cursor = text.find("automata").unwrap();
        assert_eq!(get_current_token(text, cursor).unwrap().token, "nier:automata");
    }

    #[test]
    fn test_closed_integer_weight() {
        let span = get_current_token("(cat:2), dog", 2).unwrap();
        assert_eq!(span.token, "cat");
        assert_eq!((span.start, span.end), (1, 4));
    }

    #[test]
    fn test_numeric_suffix_in_name_is_kept() {
        let span = get_current_token("16:9", 4).unwrap();
        assert_eq!(span.token, "16:9");
        assert_eq!((span.start, span.end), (0, 4));

        // Without a closing paren or decimal point the suffix is not a weight yet
        assert_eq!(get_current_token("(cat:1", 6).unwrap().token, "cat:1");
    }

    #[test]
    fn test_token_at_end_of_text() {
        let text = "masterpiece, bl";
        let span = get_current_token(text, text.len()).unwrap();
        assert_eq!(
            span,
            TokenSpan {
                token: "bl".to_string(),
                start: 13,
                end: 15
            }
        );
    }

    #[test]
    fn test_whitespace_only() {
        for cursor in 0..=3 {
            assert_eq!(get_current_token("   ", cursor), None);
        }
        assert_eq!(get_current_token("", 0), None);
    }

    #[test]
    fn test_delimiters_only() {
        assert_eq!(get_current_token("a (:) b", 3), None);
        assert_eq!(get_current_token("((", 1), None);
    }

    #[test]
    fn test_leading_paren_trimmed() {
        let span = get_current_token("(long_hai", 9).unwrap();
        assert_eq!(span.token, "long_hai");
        assert_eq!(span.start, 1);
        assert_eq!(span.end, 9);
    }

    #[test]
    fn test_cursor_between_tokens() {
        let text = "red, blue";
        // Caret right after the comma, before the space
        assert_eq!(get_current_token(text, 4), None);
        // Caret right after "red" still touches it
        assert_eq!(get_current_token(text, 3).unwrap().token, "red");
    }

    #[test]
    fn test_cursor_past_end_is_clamped() {
        let span = get_current_token("solo", 100).unwrap();
        assert_eq!(span.token, "solo");
        assert_eq!((span.start, span.end), (0, 4));
    }

    #[test]
    fn test_non_ascii_neighbours() {
        let text = "初音 miku";
        let span = get_current_token(text, text.len()).unwrap();
        assert_eq!(span.token, "miku");

        // Caret inside a multi-byte character touches nothing
        assert_eq!(get_current_token(text, 1), None);
    }
}
