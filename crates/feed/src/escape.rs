//! XML text and attribute escaping.

use std::borrow::Cow;

/// Returns `true` for characters allowed in XML 1.0 documents.
#[must_use]
pub const fn is_xml_char(ch: char) -> bool {
    matches!(ch,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

/// Appends `text` to `out`, escaping markup characters and dropping
/// characters XML cannot represent.
pub fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            ch if is_xml_char(ch) => out.push(ch),
            _ => {}
        }
    }
}

/// Escapes `text` for use in XML content or a quoted attribute value.
#[must_use]
pub fn escape(text: &str) -> Cow<'_, str> {
    let clean = text
        .chars()
        .all(|ch| is_xml_char(ch) && !matches!(ch, '&' | '<' | '>' | '"' | '\''));
    if clean {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    escape_into(&mut out, text);
    Cow::Owned(out)
}

/// Appends ` name="value"` with the value escaped.
pub(crate) fn push_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    escape_into(out, value);
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_is_escaped() {
        assert_eq!(
            escape(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &apos;Jerry&apos;&lt;/a&gt;"
        );
    }

    #[test]
    fn clean_text_is_borrowed() {
        assert!(matches!(escape("plain text"), Cow::Borrowed(_)));
    }

    #[test]
    fn invalid_characters_are_dropped() {
        assert_eq!(escape("a\u{0}b\u{1b}c\u{FFFE}"), "abc");
        assert_eq!(escape("tab\tnew\nline"), "tab\tnew\nline");
    }

    #[test]
    fn attributes_are_quoted() {
        let mut out = String::new();
        push_attribute(&mut out, "url", "http://x/?a=1&b=2");
        assert_eq!(out, r#" url="http://x/?a=1&amp;b=2""#);
    }
}
