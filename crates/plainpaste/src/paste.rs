//! The paste and edit flows.
//!
//! A paste hands over a [`ClipboardPayload`]: markup and plain text, either
//! of which may be missing. [`PasteSession::paste`] trims the leading blank
//! lines clipboard sources like to prepend, diffs the markup's formatting
//! against the session's baseline and sanitizes it for the output surface.
//! Later edits of the pasted content only go through
//! [`PasteSession::edit`], which sanitizes without diffing.
//!
//! ```rust
//! use plainpaste::{Baseline, ClipboardPayload, PasteSession};
//!
//! let mut session = PasteSession::new(Baseline::default());
//! let outcome = session.paste(&ClipboardPayload::new(
//!     Some(r#"<span style="color: rgb(255,0,0); font-weight: bold">Hi</span>"#),
//!     Some("Hi"),
//! ));
//!
//! assert_eq!(outcome.output_markup, "<span>Hi</span>");
//! assert_eq!(outcome.changes, ["Removed red text color", "Removed bold text"]);
//! assert!(outcome.show_changes());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use plainpaste_markup::{is_blank, plain_to_markup, text_content, trim_leading_blank, Fragment, Sanitizer};

use crate::diff::{ChangeList, StyleDiffEngine};
use crate::style::{CascadeResolver, StyleResolver};
use crate::theme::{detect_color_mode, Baseline, ColorMode};

/// What the clipboard offered for one paste.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardPayload {
    /// The `text/html` flavor, if any.
    #[serde(default)]
    pub html: Option<String>,
    /// The `text/plain` flavor, if any.
    #[serde(default)]
    pub text: Option<String>,
}

impl ClipboardPayload {
    pub fn new(html: Option<impl Into<String>>, text: Option<impl Into<String>>) -> Self {
        Self {
            html: html.map(Into::into),
            text: text.map(Into::into),
        }
    }

    pub fn html(html: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
            text: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            html: None,
            text: Some(text.into()),
        }
    }

    fn markup(&self) -> Option<&str> {
        self.html.as_deref().filter(|html| !html.is_empty())
    }
}

/// Result of one paste.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PasteOutcome {
    /// Markup inserted into the input surface, leading blanks trimmed.
    pub input_markup: String,
    /// Text of the input surface.
    pub input_text: String,
    /// Sanitized markup for the output surface.
    pub output_markup: String,
    /// Text of the output surface.
    pub output_text: String,
    /// Finalized change descriptions.
    pub changes: Vec<String>,
}

impl PasteOutcome {
    /// Changes are shown only when there is text on both sides and
    /// something to say.
    pub fn show_changes(&self) -> bool {
        !is_blank(&self.input_text) && !is_blank(&self.output_text) && !self.changes.is_empty()
    }
}

/// Holds the baseline and resolver used across pastes and edits.
#[derive(Debug, Clone)]
pub struct PasteSession<R = CascadeResolver> {
    engine: StyleDiffEngine,
    resolver: R,
    sanitizer: Sanitizer,
}

impl PasteSession<CascadeResolver> {
    /// A session diffing with the bundled [`CascadeResolver`].
    pub fn new(baseline: Baseline) -> Self {
        let resolver = CascadeResolver::new(baseline.clone());
        Self::with_resolver(baseline, resolver)
    }

    /// A session using the built-in baseline for `mode`.
    pub fn for_mode(mode: ColorMode) -> Self {
        Self::new(Baseline::for_mode(mode))
    }

    /// A session for the color mode the OS reports.
    pub fn detect() -> Self {
        Self::for_mode(detect_color_mode())
    }
}

impl<R: StyleResolver> PasteSession<R> {
    pub fn with_resolver(baseline: Baseline, resolver: R) -> Self {
        Self {
            engine: StyleDiffEngine::new(baseline),
            resolver,
            sanitizer: Sanitizer::new(),
        }
    }

    /// Replaces the sanitizer used for output markup.
    pub fn with_sanitizer(mut self, sanitizer: Sanitizer) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    pub fn baseline(&self) -> &Baseline {
        self.engine.baseline()
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Runs the paste flow.
    ///
    /// Without markup the plain text passes through untouched and the diff
    /// is skipped. Changes are only reported when the payload also carries
    /// a non-blank text/plain flavor; an HTML-only payload reports none. A failing resolver is logged and treated as a walk that
    /// found nothing.
    pub fn paste(&mut self, payload: &ClipboardPayload) -> PasteOutcome {
        let Some(html) = payload.markup() else {
            let text = payload.text.clone().unwrap_or_default();
            tracing::debug!(text_len = text.len(), "plain text paste");
            return PasteOutcome {
                input_markup: plain_to_markup(&text),
                input_text: text.clone(),
                output_markup: plain_to_markup(&text),
                output_text: text.clone(),
                changes: ChangeList::new().finalize(&text),
            };
        };

        let cleaned = trim_leading_blank(html);
        let fragment = Fragment::parse(cleaned);
        let changes = match self.engine.diff(&fragment, &mut self.resolver) {
            Ok(changes) => changes,
            Err(err) => {
                tracing::warn!(error = %err, "style resolution failed; reporting no changes");
                ChangeList::new()
            }
        };

        // Only the text/plain flavor decides whether changes are reported.
        let input_text = text_content(cleaned);
        let changes = changes.finalize(payload.text.as_deref().unwrap_or(""));
        let output_markup = self.sanitizer.sanitize(cleaned);
        let output_text = text_content(&output_markup);

        tracing::debug!(
            html_len = html.len(),
            output_len = output_markup.len(),
            changes = changes.len(),
            "markup paste"
        );
        PasteOutcome {
            input_markup: cleaned.to_string(),
            input_text,
            output_markup,
            output_text,
            changes,
        }
    }

    /// Runs the edit flow: sanitizes the live markup of the input surface.
    pub fn edit(&self, live_markup: &str) -> String {
        self.sanitizer.sanitize(live_markup)
    }
}

/// Case changes offered for the output text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseTransform {
    Lower,
    Upper,
    /// Lowercase, then capitalize the first letter after every single space.
    Title,
}

impl CaseTransform {
    pub fn apply(self, text: &str) -> String {
        match self {
            CaseTransform::Lower => text.to_lowercase(),
            CaseTransform::Upper => text.to_uppercase(),
            CaseTransform::Title => text
                .to_lowercase()
                .split(' ')
                .map(capitalize)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl fmt::Display for CaseTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CaseTransform::Lower => "lower",
            CaseTransform::Upper => "upper",
            CaseTransform::Title => "title",
        };
        f.write_str(name)
    }
}

impl FromStr for CaseTransform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lower" | "lowercase" => Ok(CaseTransform::Lower),
            "upper" | "uppercase" => Ok(CaseTransform::Upper),
            "title" | "titlecase" => Ok(CaseTransform::Title),
            other => Err(format!("Unknown case transform: {}", other)),
        }
    }
}
