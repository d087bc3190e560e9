//! Fragment tree built by the HTML5 parser.
//!
//! Markup is parsed with `scraper` (html5ever) in body context, so the
//! tree is the one a browser builds for pasted content: unclosed tags are
//! closed, misnested formatting tags are repaired, `<html>`/`<head>`/`<body>`
//! wrappers disappear and entities are decoded in text and attribute values.
//! Every walk over the tree is iterative; nesting depth is unbounded.

use std::collections::HashMap;

use scraper::{Html, Node};

pub use scraper::node::Element;

/// Elements that never have content or a close tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Name of the container element every fragment is parsed into.
pub const ROOT_NAME: &str = "html";

/// Elements whose content is never rendered.
pub const NON_RENDERED_TAGS: &[&str] = &["head", "script", "style", "template", "title"];

/// Position of an element in a fragment's pre-order traversal.
///
/// The root container is always `ElementId(0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub usize);

/// An element visited during a pre-order walk.
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    pub id: ElementId,
    /// `None` only for the root container.
    pub parent: Option<ElementId>,
    pub element: &'a Element,
}

/// A parsed markup fragment.
#[derive(Debug, Clone)]
pub struct Fragment {
    html: Html,
}

impl Fragment {
    /// Parses markup into a fragment. Never fails.
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_fragment(markup),
        }
    }

    /// The underlying document.
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// The root container; its children are the pasted content.
    pub fn root(&self) -> scraper::ElementRef<'_> {
        self.html.root_element()
    }

    /// Every element in pre-order, the root container first.
    pub fn elements(&self) -> Vec<ElementRef<'_>> {
        let mut ids = HashMap::new();
        let mut out = Vec::new();
        for node in self.root().descendants() {
            let Node::Element(element) = node.value() else {
                continue;
            };
            let id = ElementId(out.len());
            let parent = node.parent().and_then(|p| ids.get(&p.id()).copied());
            ids.insert(node.id(), id);
            out.push(ElementRef {
                id,
                parent,
                element,
            });
        }
        out
    }

    /// Concatenated text of the fragment, as `textContent` would report it
    /// but without the content of non-rendered elements.
    pub fn text(&self) -> String {
        let mut out = String::new();
        let mut stack: Vec<_> = self.root().children().rev().collect();
        while let Some(node) = stack.pop() {
            match node.value() {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) if NON_RENDERED_TAGS.contains(&element.name()) => {}
                Node::Element(_) => stack.extend(node.children().rev()),
                _ => {}
            }
        }
        out
    }

    /// Serializes the content of the root container.
    pub fn to_markup(&self) -> String {
        self.root().inner_html()
    }
}
