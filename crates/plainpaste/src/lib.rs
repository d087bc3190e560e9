//! Format stripping for pasted rich text.
//!
//! Paste something from a word processor, a web page or a mail client and
//! `plainpaste` tells you what formatting it carried and hands back the
//! same content reduced to a handful of structural tags.
//!
//! # Quick Start
//!
//! ```rust
//! use plainpaste::{ClipboardPayload, ColorMode, PasteSession};
//!
//! let mut session = PasteSession::for_mode(ColorMode::Light);
//! let outcome = session.paste(&ClipboardPayload::new(
//!     Some(r#"<p><font face="Georgia" color="navy">Quarterly <b>results</b></font></p>"#),
//!     Some("Quarterly results"),
//! ));
//!
//! assert_eq!(outcome.output_markup, "<p>Quarterly results</p>");
//! assert_eq!(
//!     outcome.changes,
//!     ["Removed navy text color", "Removed Georgia font", "Removed bold text"]
//! );
//! ```
//!
//! # Parts
//!
//! - [`color`]: CSS color parsing and human-readable color names.
//! - [`theme`]: light/dark detection and the [`Baseline`] presentation that
//!   is never reported.
//! - [`style`]: the [`StyleResolver`] seam and the bundled
//!   [`CascadeResolver`].
//! - [`diff`]: the [`StyleDiffEngine`] and its [`ChangeList`].
//! - [`paste`]: the [`PasteSession`] paste and edit flows.
//!
//! Markup parsing and sanitization live in `plainpaste-markup` and are
//! re-exported here.

pub mod color;
pub mod diff;
mod error;
pub mod paste;
pub mod style;
pub mod theme;

pub use diff::{diff, ChangeList, StyleDiffEngine, NO_FORMATTING, REMOVED_PREFIX};
pub use error::{Error, ResolveError, Result};
pub use paste::{CaseTransform, ClipboardPayload, PasteOutcome, PasteSession};
pub use style::{CascadeResolver, StyleResolver, StyleSnapshot};
pub use theme::{detect_color_mode, set_theme_detector, Baseline, BaselineConfig, ColorMode};

pub use plainpaste_markup::{
    plain_to_markup, sanitize, text_content, trim_leading_blank, ElementId, Fragment, Sanitizer,
};
