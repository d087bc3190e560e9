//! HTML5 fragment parsing and allow-list sanitizing for pasted rich text.
//!
//! This crate turns the markup a clipboard hands over (word processors, web
//! pages, mail clients) into a browser-shaped tree, and reduces that tree to a fixed
//! set of structural and inline tags with every styling attribute removed.
//!
//! # Example
//!
//! ```rust
//! use plainpaste_markup::{sanitize, text_content, Fragment};
//!
//! let pasted = r#"<p class="MsoNormal"><b>Dear</b> <span style="color:red">team</span></p>"#;
//!
//! assert_eq!(sanitize(pasted), "<p>Dear <span>team</span></p>");
//! assert_eq!(text_content(pasted), "Dear team");
//!
//! // The tree is available for callers that need to walk it
//! let fragment = Fragment::parse(pasted);
//! let names: Vec<_> = fragment.elements().iter().map(|e| e.element.name()).collect();
//! assert_eq!(names, ["html", "p", "b", "span"]);
//! ```
//!
//! # Parsing Model
//!
//! Fragments are parsed by html5ever (through `scraper`) in body context,
//! so the tree matches what a browser builds for pasted content. Parsing
//! never fails: unclosed elements are closed, misnested formatting tags
//! are repaired, document wrappers are dropped and entities are decoded.
//! The sanitizer re-serializes the tree, escaping text and attribute
//! values on the way out.
//!
//! The sanitizer is presentation-oriented, not a security boundary.

mod fragment;
mod sanitizer;
mod text;

pub use fragment::{
    Element, ElementId, ElementRef, Fragment, NON_RENDERED_TAGS, ROOT_NAME, VOID_ELEMENTS,
};
pub use sanitizer::{
    sanitize, Sanitizer, ALLOWED_TAGS, BOLD_TAGS, DATA_ATTRIBUTE_PREFIX, STYLING_ATTRIBUTES,
};
pub use text::{is_blank, plain_to_markup, text_content, trim_leading_blank};
