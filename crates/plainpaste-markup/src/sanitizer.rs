//! Allow-list sanitizer for pasted markup.
//!
//! The markup is parsed once and written back out in a single iterative
//! walk over the tree:
//!
//! - bold elements (`b`, `strong`) are unwrapped whatever their attributes;
//! - elements whose name is not on the allow-list are unwrapped;
//! - `style` and the other styling attributes (`class`, `id`, `color`,
//!   `bgcolor`, `face`, `size`, `align`, `width`, `height`, `data-*`) are
//!   removed, every other attribute is kept.
//!
//! Unwrapping keeps an element's content and drops only the tags. Elements
//! that never render (`script`, `style`, `head`, ...) are removed together
//! with their content, and comments are dropped.
//!
//! ```rust
//! use plainpaste_markup::sanitize;
//!
//! let out = sanitize(r#"<span style="color: rgb(255,0,0); font-weight: bold">Hi</span>"#);
//! assert_eq!(out, "<span>Hi</span>");
//!
//! assert_eq!(sanitize("<b>Hello</b>"), "Hello");
//! ```

use std::fmt::Write as _;

use scraper::Node;

use crate::fragment::{Element, Fragment, NON_RENDERED_TAGS, VOID_ELEMENTS};

/// Tags that survive sanitization.
pub const ALLOWED_TAGS: &[&str] = &["i", "em", "u", "br", "p", "div", "span"];

/// Tags removed unconditionally, before the allow-list is consulted.
pub const BOLD_TAGS: &[&str] = &["b", "strong"];

/// Attributes stripped alongside `style`.
pub const STYLING_ATTRIBUTES: &[&str] = &[
    "class", "id", "color", "bgcolor", "face", "size", "align", "width", "height",
];

/// Attribute name prefix stripped alongside `style`.
pub const DATA_ATTRIBUTE_PREFIX: &str = "data-";

/// Tag and attribute policy applied by [`Sanitizer::sanitize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitizer {
    allowed: Vec<String>,
    always_removed: Vec<String>,
    stripped_attributes: Vec<String>,
    stripped_prefixes: Vec<String>,
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sanitizer {
    /// Creates a sanitizer with the standard paste policy.
    pub fn new() -> Self {
        Self {
            allowed: ALLOWED_TAGS.iter().map(|t| t.to_string()).collect(),
            always_removed: BOLD_TAGS.iter().map(|t| t.to_string()).collect(),
            stripped_attributes: std::iter::once("style")
                .chain(STYLING_ATTRIBUTES.iter().copied())
                .map(str::to_string)
                .collect(),
            stripped_prefixes: vec![DATA_ATTRIBUTE_PREFIX.to_string()],
        }
    }

    /// Adds a tag to the allow-list.
    ///
    /// Tags in the always-removed set stay removed even when allowed.
    pub fn allow_tag(mut self, tag: &str) -> Self {
        let tag = tag.to_ascii_lowercase();
        if !self.allowed.contains(&tag) {
            self.allowed.push(tag);
        }
        self
    }

    /// Adds an attribute name to the stripped set.
    pub fn strip_attribute(mut self, name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        if !self.stripped_attributes.contains(&name) {
            self.stripped_attributes.push(name);
        }
        self
    }

    pub fn is_allowed(&self, tag: &str) -> bool {
        self.allowed.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    fn keeps(&self, tag: &str) -> bool {
        self.is_allowed(tag) && !self.always_removed.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    fn is_stripped_attribute(&self, name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        self.stripped_attributes.contains(&name)
            || self
                .stripped_prefixes
                .iter()
                .any(|p| name.starts_with(p.as_str()))
    }

    /// Sanitizes markup. Pure and deterministic; never fails.
    pub fn sanitize(&self, markup: &str) -> String {
        let fragment = Fragment::parse(markup);
        let mut out = String::with_capacity(markup.len());

        // (node, closing) pairs; children are pushed in reverse so they pop
        // in document order
        let mut stack: Vec<_> = fragment.root().children().rev().map(|n| (n, false)).collect();
        while let Some((node, closing)) = stack.pop() {
            match node.value() {
                Node::Text(text) => escape_text(text, &mut out),
                Node::Element(element) => {
                    let name = element.name();
                    if closing {
                        if self.keeps(name) && !VOID_ELEMENTS.contains(&name) {
                            let _ = write!(out, "</{}>", name);
                        }
                        continue;
                    }
                    if NON_RENDERED_TAGS.contains(&name) {
                        continue;
                    }
                    if self.keeps(name) {
                        self.write_open_tag(element, &mut out);
                    }
                    stack.push((node, true));
                    stack.extend(node.children().rev().map(|n| (n, false)));
                }
                _ => {}
            }
        }

        tracing::trace!(input_len = markup.len(), output_len = out.len(), "sanitized markup");
        out
    }

    /// Kept attributes are written in name order.
    fn write_open_tag(&self, element: &Element, out: &mut String) {
        let mut attributes: Vec<(&str, &str)> = element
            .attrs()
            .filter(|(name, _)| !self.is_stripped_attribute(name))
            .collect();
        attributes.sort_by(|a, b| a.0.cmp(b.0));

        out.push('<');
        out.push_str(element.name());
        for (name, value) in attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            escape_attribute(value, out);
            out.push('"');
        }
        out.push('>');
    }
}

/// Sanitizes markup with the standard paste policy.
pub fn sanitize(markup: &str) -> String {
    Sanitizer::new().sanitize(markup)
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn tag_name() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("b".to_string()),
            Just("strong".to_string()),
            Just("i".to_string()),
            Just("span".to_string()),
            Just("p".to_string()),
            Just("br".to_string()),
            Just("font".to_string()),
            Just("a".to_string()),
            Just("o:p".to_string()),
            Just("SPAN".to_string()),
        ]
    }

    fn attribute() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            Just(r#" style="color: red""#.to_string()),
            Just(" class=x".to_string()),
            Just(" data-id='7'".to_string()),
            Just(" lang=\"en\"".to_string()),
            Just(" title='a > b'".to_string()),
            Just(" face=\"Arial\" size=3".to_string()),
        ]
    }

    fn piece() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-zA-Z0-9 &;<>/\"'=!-]{0,8}",
            (tag_name(), attribute()).prop_map(|(t, a)| format!("<{}{}>", t, a)),
            tag_name().prop_map(|t| format!("</{}>", t)),
            Just("<!-- c -->".to_string()),
            Just("<br/>".to_string()),
        ]
    }

    fn markup() -> impl Strategy<Value = String> {
        prop::collection::vec(piece(), 0..12).prop_map(|pieces| pieces.concat())
    }

    /// Long runs of open tags with only some of them closed.
    fn deep_markup() -> impl Strategy<Value = String> {
        (
            prop::collection::vec((tag_name(), attribute()), 1..8),
            500usize..3_000,
            0usize..3_000,
        )
            .prop_map(|(tags, depth, closed)| {
                let mut out = String::new();
                for level in 0..depth {
                    let (name, attribute) = &tags[level % tags.len()];
                    out.push_str(&format!("<{}{}>", name, attribute));
                }
                out.push_str("deep");
                for level in (0..depth).rev().take(closed) {
                    out.push_str(&format!("</{}>", tags[level % tags.len()].0));
                }
                out
            })
    }

    fn survivors(markup: &str) -> (Vec<String>, Vec<String>) {
        let fragment = Fragment::parse(markup);
        let mut names = Vec::new();
        let mut attributes = Vec::new();
        for element in fragment.elements().iter().skip(1) {
            names.push(element.element.name().to_string());
            attributes.extend(element.element.attrs().map(|(name, _)| name.to_string()));
        }
        (names, attributes)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn sanitize_is_idempotent(input in markup()) {
            let once = sanitize(&input);
            prop_assert_eq!(sanitize(&once), once);
        }

        #[test]
        fn only_allowed_tags_survive(input in markup()) {
            let (names, _) = survivors(&sanitize(&input));
            for name in names {
                prop_assert!(ALLOWED_TAGS.contains(&name.as_str()), "tag {} survived", name);
            }
        }

        #[test]
        fn no_styling_attribute_survives(input in markup()) {
            let (_, attributes) = survivors(&sanitize(&input));
            for name in attributes {
                prop_assert!(name != "style");
                prop_assert!(!STYLING_ATTRIBUTES.contains(&name.as_str()));
                prop_assert!(!name.starts_with(DATA_ATTRIBUTE_PREFIX));
            }
        }

        #[test]
        fn plain_text_without_markup_characters_unchanged(text in "[a-zA-Z0-9 .,!?;]{0,40}") {
            prop_assert_eq!(sanitize(&text), text);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn deep_nesting_is_sanitized(input in deep_markup()) {
            let once = sanitize(&input);
            prop_assert!(once.contains("deep"));
            let (names, _) = survivors(&once);
            for name in names {
                prop_assert!(ALLOWED_TAGS.contains(&name.as_str()), "tag {} survived", name);
            }
        }
    }
}
