//! Plain-text helpers: text extraction and paste cleanup.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::fragment::Fragment;

/// Leading run of line breaks, empty blocks and whitespace that clipboard
/// sources like to prepend.
static LEADING_BLANK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:<br\s*/?>|<div>\s*</div>|<div><br\s*/?></div>|<p>\s*</p>|<p><br\s*/?></p>|\s)+",
    )
    .expect("leading blank pattern is valid")
});

/// Removes leading `<br>`, empty `<div>`/`<p>` blocks and whitespace.
///
/// ```rust
/// use plainpaste_markup::trim_leading_blank;
///
/// assert_eq!(trim_leading_blank("<br><p></p>\n <div><br/></div><p>x</p>"), "<p>x</p>");
/// ```
pub fn trim_leading_blank(markup: &str) -> &str {
    match LEADING_BLANK.find(markup) {
        Some(m) => &markup[m.end()..],
        None => markup,
    }
}

/// Concatenated text of every text node, entities decoded.
///
/// Mirrors `textContent`: no separators are inserted for line breaks or
/// block boundaries. Non-rendered elements (`script`, `style`, ...) are
/// skipped.
pub fn text_content(markup: &str) -> String {
    Fragment::parse(markup).text()
}

/// Escapes plain text for use as markup and turns newlines into `<br>`.
///
/// Used when a paste only carries plain text.
pub fn plain_to_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\n' => out.push_str("<br>"),
            '\r' => {}
            c => out.push(c),
        }
    }
    out
}

/// True when the text has nothing but whitespace.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}
