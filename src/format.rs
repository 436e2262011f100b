//! Presentation helpers shared by every renderer.
//!
//! Everything here is a pure function of its input. There are three output
//! contexts in a paper page and each has its own encoder:
//!
//! | Context | Encoder |
//! |---------|---------|
//! | HTML text and attribute values | [`escape_text`], or the [`Text`] wrapper inside `html!` |
//! | `<script type="application/ld+json">` | [`script_json`] |
//! | JavaScript string literal | [`script_json`] on a `&str` |
//!
//! Record text must reach the page through exactly one of these. Maud's own
//! interpolation escaper leaves `'` untouched, so renderers wrap record fields
//! in [`Text`] rather than interpolating `&str` directly.

use chrono::{Datelike, NaiveDate};
use maud::Render;
use serde::Serialize;

/// Marker appended by [`truncate`].
pub const ELLIPSIS: &str = "...";

/// Escape the five HTML-significant characters.
///
/// Safe for element content and for quoted attribute values. Apply once:
/// feeding the output back in turns `&amp;` into `&amp;amp;`.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + s.len() / 8);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Record text destined for HTML, escaped with [`escape_text`] when rendered.
///
/// ```text
/// html! { h1 { (Text(&paper.title)) } meta content=(Text(&summary)); }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Text<'a>(pub &'a str);

impl Render for Text<'_> {
    fn render_to(&self, buffer: &mut String) {
        buffer.push_str(&escape_text(self.0));
    }
}

/// Long human form, `5 March 2024`. Month names are always English so output
/// does not depend on the machine's locale.
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%-d %B %Y").to_string()
}

/// `YYYY/MM/DD`, the format `citation_publication_date` requires.
pub fn format_citation_date(date: NaiveDate) -> String {
    format!("{:04}/{:02}/{:02}", date.year(), date.month(), date.day())
}

/// First `n` characters of `text` followed by [`ELLIPSIS`].
///
/// The ellipsis is appended even when nothing was cut. Counting is by `char`
/// so multi-byte text never splits inside a code point.
pub fn truncate(text: &str, n: usize) -> String {
    let mut out: String = text.chars().take(n).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Serialize `value` as JSON that can sit inside a `<script>` element.
///
/// JSON string encoding handles quotes, backslashes and newlines. On top of
/// that every `<`, `>` and `&` becomes a `\u` escape, so no record text can
/// close the element or open a `<!--` comment inside it, and the two Unicode
/// line separators are escaped for older JavaScript parsers. These characters
/// only occur inside JSON strings, where the escapes decode to the same value.
pub fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string_pretty(value)?;
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(c),
        }
    }
    Ok(out)
}
