/// Escape text for embedding in an HTML page
///
/// Replaces `&`, `<`, `"` and `'` with entities, in that order, then turns
/// newlines into `<br />`. `>` is left as is.
///
/// ```
/// use error_responder::common::html::escape;
///
/// assert_eq!(escape("a&b"), "a&amp;b");
/// assert_eq!(escape("<x>\n'y'"), "&lt;x><br />&#039;y&#039;");
/// ```
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            '\n' => escaped.push_str("<br />"),
            _ => escaped.push(c),
        }
    }
    escaped
}
