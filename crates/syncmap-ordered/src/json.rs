//! Compact JSON emission with optional HTML escaping.
//!
//! [`JsonFormatter`] is a `serde_json` formatter that writes no whitespace
//! and, when HTML escaping is on, replaces `<`, `>` and `&` inside strings
//! with `\u` escapes so the output can be embedded in HTML. The line and
//! paragraph separators U+2028 and U+2029 are escaped in both modes since
//! JavaScript treats them as line terminators.
//!
//! NaN and the infinities have no JSON form and are reported as encoding
//! errors rather than written as `null`.

use std::io;

use serde::Serialize;
use serde_json::ser::Formatter;

use crate::error::MapResult;
use crate::finite::Finite;

/// `serde_json` formatter producing compact output.
#[derive(Clone, Copy, Debug)]
pub struct JsonFormatter {
    escape_html: bool,
}

impl JsonFormatter {
    pub fn new(escape_html: bool) -> Self {
        Self { escape_html }
    }

    pub fn escape_html(&self) -> bool {
        self.escape_html
    }

    fn needs_escape(&self, ch: char) -> bool {
        match ch {
            '<' | '>' | '&' => self.escape_html,
            '\u{2028}' | '\u{2029}' => true,
            _ => false,
        }
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Formatter for JsonFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, ch) in fragment.char_indices() {
            if self.needs_escape(ch) {
                writer.write_all(fragment[start..i].as_bytes())?;
                write!(writer, "\\u{:04x}", ch as u32)?;
                start = i + ch.len_utf8();
            }
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Serialize `value` as compact JSON into `writer`.
///
/// Bytes already written stay written if serialization fails part way; use
/// [`to_vec`] for all-or-nothing output.
pub fn to_writer<W, T>(writer: W, value: &T, escape_html: bool) -> MapResult<()>
where
    W: io::Write,
    T: ?Sized + Serialize,
{
    let mut ser = serde_json::Serializer::with_formatter(writer, JsonFormatter::new(escape_html));
    Finite(value).serialize(&mut ser)?;
    Ok(())
}

/// Serialize `value` as compact JSON into a fresh buffer.
pub fn to_vec<T>(value: &T, escape_html: bool) -> MapResult<Vec<u8>>
where
    T: ?Sized + Serialize,
{
    let mut buf = Vec::with_capacity(128);
    to_writer(&mut buf, value, escape_html)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn escaped(code: u32) -> String {
        format!("\\u{code:04x}")
    }

    fn render(value: &str, escape_html: bool) -> String {
        String::from_utf8(to_vec(value, escape_html).unwrap()).unwrap()
    }

    #[test]
    fn html_characters_escaped_when_enabled() {
        let expected = format!(
            "\"{}b{} {} c\"",
            escaped(0x3c),
            escaped(0x3e),
            escaped(0x26)
        );
        assert_eq!(render("<b> & c", true), expected);
    }

    #[test]
    fn html_characters_kept_when_disabled() {
        assert_eq!(render("<b> & c", false), "\"<b> & c\"");
    }

    #[test]
    fn line_separators_always_escaped() {
        let input: String = ['a', '\u{2028}', 'b', '\u{2029}'].iter().collect();
        let expected = format!("\"a{}b{}\"", escaped(0x2028), escaped(0x2029));
        assert_eq!(render(&input, false), expected);
        assert_eq!(render(&input, true), expected);
    }

    #[test]
    fn standard_escapes_untouched() {
        assert_eq!(render("q\"\\\n", true), "\"q\\\"\\\\\\n\"");
    }

    #[test]
    fn output_is_compact() {
        let value = serde_json::json!({"a": [1, 2], "b": {"c": null}});
        let out = String::from_utf8(to_vec(&value, true).unwrap()).unwrap();
        assert!(!out.contains(' '));
        assert!(!out.ends_with('\n'));
    }

    #[test]
    fn default_formatter_escapes_html() {
        assert!(JsonFormatter::default().escape_html());
    }
}
