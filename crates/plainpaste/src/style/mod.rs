//! Style resolution for pasted fragments.
//!
//! The diff engine does not compute styles itself. It asks a
//! [`StyleResolver`] for each element's [`StyleSnapshot`], the way a browser
//! hands out computed styles once a node is attached to a document. The
//! bundled [`CascadeResolver`] evaluates inline `style` declarations and the
//! presentational tags and attributes clipboard markup relies on.

mod cascade;
mod css;

use serde::Serialize;

use plainpaste_markup::{ElementId, Fragment};

use crate::error::ResolveError;

pub use cascade::CascadeResolver;
pub use css::{parse_declarations, Declaration};

/// The six observed properties of one element, as resolved strings.
///
/// An empty string means the resolver has no value for that property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StyleSnapshot {
    pub color: String,
    pub background_color: String,
    pub font_family: String,
    pub font_size: String,
    pub font_weight: String,
    pub text_decoration: String,
}

/// Resolves computed styles for the elements of an attached fragment.
///
/// `attach` must be called before `resolve`; `detach` releases whatever the
/// adapter acquired and is always called by the diff engine, even after a
/// failed `resolve`.
pub trait StyleResolver {
    fn attach(&mut self, fragment: &Fragment) -> Result<(), ResolveError>;

    /// Resolves one element of the attached fragment by pre-order id.
    fn resolve(&mut self, id: ElementId) -> Result<StyleSnapshot, ResolveError>;

    fn detach(&mut self);
}

impl<R: StyleResolver + ?Sized> StyleResolver for &mut R {
    fn attach(&mut self, fragment: &Fragment) -> Result<(), ResolveError> {
        (**self).attach(fragment)
    }

    fn resolve(&mut self, id: ElementId) -> Result<StyleSnapshot, ResolveError> {
        (**self).resolve(id)
    }

    fn detach(&mut self) {
        (**self).detach()
    }
}

impl<R: StyleResolver + ?Sized> StyleResolver for Box<R> {
    fn attach(&mut self, fragment: &Fragment) -> Result<(), ResolveError> {
        (**self).attach(fragment)
    }

    fn resolve(&mut self, id: ElementId) -> Result<StyleSnapshot, ResolveError> {
        (**self).resolve(id)
    }

    fn detach(&mut self) {
        (**self).detach()
    }
}
