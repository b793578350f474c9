//! Minimal HTML escaping for text interpolated into line fragments.

/// Escape the characters that are unsafe inside HTML text and attribute
/// values: `&`, `<`, `>`, `"`, `'`.
///
/// Returns the input unchanged (no allocation beyond the output String)
/// when nothing needs escaping.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_plain() {
        assert_eq!(escape_html("hello world"), "hello world");
    }

    #[test]
    fn test_escape_special() {
        assert_eq!(
            escape_html(r#"<a href="x">&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_escape_empty() {
        assert_eq!(escape_html(""), "");
    }
}
