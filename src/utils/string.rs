//! String helpers for displaying tags

/// Safely truncate a string at a character boundary, adding ellipsis if truncated.
///
/// Unlike naive byte slicing (`&s[..n]`), this never splits a multi-byte UTF-8
/// character. Alias lists routinely mix ASCII with CJK names, so the popup
/// truncates them with this.
///
/// # Examples
/// ```
/// use tagcomplete_core::utils::string::truncate_at_char_boundary;
///
/// assert_eq!(truncate_at_char_boundary("hello world", 5), "hello...");
/// assert_eq!(truncate_at_char_boundary("hello", 10), "hello");
/// assert_eq!(truncate_at_char_boundary("初音ミク", 2), "初音...");
/// ```
pub fn truncate_at_char_boundary(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();

    if char_count <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}

/// Compact usage count: values above 1000 are shown in rounded thousands
///
/// # Examples
/// ```
/// use tagcomplete_core::utils::string::format_count;
///
/// assert_eq!(format_count(999), "999");
/// assert_eq!(format_count(12_600), "13k");
/// ```
pub fn format_count(count: u64) -> String {
    if count > 1000 {
        format!("{}k", (count + 500) / 1000)
    } else {
        count.to_string()
    }
}
