//! Pure HTML text escaping utilities.
//!
//! Everything the transducer does not interpret as markup ends up here:
//! `&`, `<`, `>` and both quote characters become entity references, all
//! other characters pass through unchanged.

/// Append one character to `out`, escaped for HTML text content.
pub fn push_escaped(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        _ => out.push(c),
    }
}

/// Escape an entire string for HTML text content.
///
/// # Examples
///
/// ```
/// use blogify::markup::escape_html;
///
/// assert_eq!(escape_html("a < b & c"), "a &lt; b &amp; c");
/// assert_eq!(escape_html("\"quoted\""), "&quot;quoted&quot;");
/// ```
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 10);
    for c in text.chars() {
        push_escaped(&mut result, c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_angle_brackets() {
        assert_eq!(escape_html("<tag>"), "&lt;tag&gt;");
    }

    #[test]
    fn test_escape_ampersand() {
        assert_eq!(escape_html("a && b"), "a &amp;&amp; b");
    }

    #[test]
    fn test_escape_quotes() {
        assert_eq!(escape_html("\"a\" 'b'"), "&quot;a&quot; &#39;b&#39;");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(escape_html("hello, world\n"), "hello, world\n");
    }

    #[test]
    fn test_escape_already_escaped() {
        // Escaping is not idempotent; entities are re-escaped as text.
        assert_eq!(escape_html("&amp;"), "&amp;amp;");
    }
}
