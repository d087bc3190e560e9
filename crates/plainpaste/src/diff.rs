//! Formatting diff: what a paste carried beyond the baseline presentation.
//!
//! [`StyleDiffEngine`] walks every element of a fragment (root included, in
//! document order), asks a [`StyleResolver`] for its computed style and
//! compares six properties against the [`Baseline`]. Each difference becomes
//! a short description such as `red text color` or `bold text`, collected in
//! a [`ChangeList`] that keeps only the first occurrence of each entry.
//!
//! ```rust
//! use plainpaste::{Baseline, CascadeResolver, StyleDiffEngine};
//! use plainpaste_markup::Fragment;
//!
//! let fragment = Fragment::parse(r#"<span style="color: rgb(255,0,0); font-weight: bold">Hi</span>"#);
//! let engine = StyleDiffEngine::new(Baseline::default());
//! let mut resolver = CascadeResolver::new(Baseline::default());
//!
//! let changes = engine.diff(&fragment, &mut resolver).unwrap();
//! assert_eq!(changes.finalize("Hi"), ["Removed red text color", "Removed bold text"]);
//! ```

use std::collections::HashSet;

use serde::Serialize;

use plainpaste_markup::{is_blank, Fragment};

use crate::color;
use crate::error::ResolveError;
use crate::style::{StyleResolver, StyleSnapshot};
use crate::theme::{Baseline, BLACK_SPELLINGS, NORMAL_WEIGHTS, NO_DECORATION, TRANSPARENT_SPELLINGS};

/// Shown when a non-blank paste carried no formatting at all.
pub const NO_FORMATTING: &str = "No formatting detected";

/// Prefix of every reported change.
pub const REMOVED_PREFIX: &str = "Removed ";

/// Ordered change descriptions without duplicates.
///
/// Equality is exact string equality and the first occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ChangeList {
    entries: Vec<String>,
    #[serde(skip)]
    seen: HashSet<String>,
}

impl ChangeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry unless it is already present. Returns whether it
    /// was added.
    pub fn push(&mut self, entry: impl Into<String>) -> bool {
        let entry = entry.into();
        if self.seen.contains(&entry) {
            return false;
        }
        self.seen.insert(entry.clone());
        self.entries.push(entry);
        true
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.seen.contains(entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.entries
    }

    pub fn into_vec(self) -> Vec<String> {
        self.entries
    }

    /// Turns the raw entries into what the user sees.
    ///
    /// - Entries present: each one as `Removed <entry>`.
    /// - No entries, non-blank pasted text: [`NO_FORMATTING`].
    /// - Blank pasted text: nothing.
    pub fn finalize(self, plain_text: &str) -> Vec<String> {
        if is_blank(plain_text) {
            return Vec::new();
        }
        if self.entries.is_empty() {
            return vec![NO_FORMATTING.to_string()];
        }
        self.entries
            .into_iter()
            .map(|entry| format!("{}{}", REMOVED_PREFIX, entry))
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for ChangeList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut list = ChangeList::new();
        for entry in iter {
            list.push(entry);
        }
        list
    }
}

/// Keeps a fragment attached to a resolver and detaches it when dropped.
struct Attached<'r, R: StyleResolver + ?Sized> {
    resolver: &'r mut R,
}

impl<'r, R: StyleResolver + ?Sized> Attached<'r, R> {
    fn new(resolver: &'r mut R, fragment: &Fragment) -> Result<Self, ResolveError> {
        if let Err(err) = resolver.attach(fragment) {
            resolver.detach();
            return Err(err);
        }
        Ok(Self { resolver })
    }

    fn resolver(&mut self) -> &mut R {
        &mut *self.resolver
    }
}

impl<R: StyleResolver + ?Sized> Drop for Attached<'_, R> {
    fn drop(&mut self) {
        self.resolver.detach();
    }
}

/// Compares resolved element styles against a baseline.
#[derive(Debug, Clone)]
pub struct StyleDiffEngine {
    baseline: Baseline,
}

impl StyleDiffEngine {
    pub fn new(baseline: Baseline) -> Self {
        Self { baseline }
    }

    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    /// Walks the fragment and collects the changes of every element.
    ///
    /// The fragment is attached to `resolver` for the duration of the walk
    /// and detached on every exit path, including a failed `resolve`.
    pub fn diff<R: StyleResolver + ?Sized>(
        &self,
        fragment: &Fragment,
        resolver: &mut R,
    ) -> Result<ChangeList, ResolveError> {
        let mut attached = Attached::new(resolver, fragment)?;
        let elements = fragment.elements();
        let mut changes = ChangeList::new();

        for element in &elements {
            let snapshot = attached.resolver().resolve(element.id)?;
            tracing::trace!(
                id = element.id.0,
                tag = element.element.name(),
                ?snapshot,
                "resolved element"
            );
            self.collect(&snapshot, &mut changes);
        }

        tracing::debug!(
            elements = elements.len(),
            changes = changes.len(),
            "diffed fragment"
        );
        Ok(changes)
    }

    /// Adds the changes one snapshot shows against the baseline.
    pub fn collect(&self, snapshot: &StyleSnapshot, changes: &mut ChangeList) {
        let color = snapshot.color.as_str();
        if !color.is_empty()
            && color != self.baseline.text_color
            && !BLACK_SPELLINGS
                .iter()
                .any(|black| black.eq_ignore_ascii_case(color))
        {
            changes.push(format!("{} text color", color::name(color)));
        }

        let background = snapshot.background_color.as_str();
        if !background.is_empty() && !TRANSPARENT_SPELLINGS.contains(&background) {
            changes.push(format!("{} background", color::name(background)));
        }

        let family: String = snapshot
            .font_family
            .chars()
            .filter(|c| *c != '\'' && *c != '"')
            .collect();
        if !family.is_empty() && !self.baseline.is_monospace(&family) {
            changes.push(format!("{} font", family));
        }

        let size = snapshot.font_size.as_str();
        if !size.is_empty() && size != self.baseline.font_size {
            changes.push(format!("{} font size", size));
        }

        let weight = snapshot.font_weight.as_str();
        if !weight.is_empty() && !NORMAL_WEIGHTS.contains(&weight) {
            changes.push("bold text");
        }

        let decoration = snapshot.text_decoration.as_str();
        if !decoration.is_empty() && !decoration.contains(NO_DECORATION) {
            changes.push(decoration);
        }
    }
}

/// Diffs a fragment against a baseline with the given resolver.
pub fn diff<R: StyleResolver + ?Sized>(
    fragment: &Fragment,
    resolver: &mut R,
    baseline: &Baseline,
) -> Result<ChangeList, ResolveError> {
    StyleDiffEngine::new(baseline.clone()).diff(fragment, resolver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::CascadeResolver;
    use crate::theme::ColorMode;
    use plainpaste_markup::ElementId;

    fn changes(markup: &str, mode: ColorMode) -> Vec<String> {
        let baseline = Baseline::for_mode(mode);
        let mut resolver = CascadeResolver::new(baseline.clone());
        diff(&Fragment::parse(markup), &mut resolver, &baseline)
            .unwrap()
            .into_vec()
    }

    fn light(markup: &str) -> Vec<String> {
        changes(markup, ColorMode::Light)
    }

    fn snapshot() -> StyleSnapshot {
        StyleSnapshot {
            color: "rgb(31, 41, 55)".into(),
            background_color: "rgba(0, 0, 0, 0)".into(),
            font_family: "\"Courier New\", monospace".into(),
            font_size: "14px".into(),
            font_weight: "400".into(),
            text_decoration: "none".into(),
        }
    }

    fn collected(snapshot: &StyleSnapshot) -> Vec<String> {
        let mut list = ChangeList::new();
        StyleDiffEngine::new(Baseline::default()).collect(snapshot, &mut list);
        list.into_vec()
    }

    /// Resolver that records its lifecycle and can fail on one element.
    #[derive(Default)]
    struct Recording {
        attached: usize,
        detached: usize,
        fail_attach: bool,
        fail_on: Option<usize>,
    }

    impl StyleResolver for Recording {
        fn attach(&mut self, _fragment: &Fragment) -> Result<(), ResolveError> {
            self.attached += 1;
            if self.fail_attach {
                return Err(ResolveError::Failed("no document".into()));
            }
            Ok(())
        }

        fn resolve(&mut self, id: ElementId) -> Result<StyleSnapshot, ResolveError> {
            if self.fail_on == Some(id.0) {
                return Err(ResolveError::Failed("boom".into()));
            }
            Ok(StyleSnapshot::default())
        }

        fn detach(&mut self) {
            self.detached += 1;
        }
    }

    // ==================== Change List ====================

    mod change_list {
        use super::*;

        #[test]
        fn first_occurrence_wins() {
            let list: ChangeList = ["a", "b", "a", "c", "b"].into_iter().collect();
            assert_eq!(list.as_slice(), ["a", "b", "c"]);
            assert!(list.contains("c"));
        }

        #[test]
        fn finalize_prefixes_entries() {
            let list: ChangeList = ["bold text"].into_iter().collect();
            assert_eq!(list.finalize("x"), ["Removed bold text"]);
        }

        #[test]
        fn finalize_sentinel_for_plain_paste() {
            assert_eq!(ChangeList::new().finalize("hello"), [NO_FORMATTING]);
        }

        #[test]
        fn finalize_blank_text_is_empty() {
            assert!(ChangeList::new().finalize("  \n").is_empty());
            let list: ChangeList = ["bold text"].into_iter().collect();
            assert!(list.finalize("").is_empty());
        }

        #[test]
        fn serializes_as_array() {
            let list: ChangeList = ["a", "b"].into_iter().collect();
            assert_eq!(serde_json::to_string(&list).unwrap(), r#"["a","b"]"#);
        }
    }

    // ==================== Property Rules ====================

    mod rules {
        use super::*;

        #[test]
        fn baseline_snapshot_has_no_changes() {
            assert!(collected(&snapshot()).is_empty());
        }

        #[test]
        fn black_spellings_ignored() {
            for black in ["rgb(0, 0, 0)", "#000000", "#000", "BLACK"] {
                let s = StyleSnapshot {
                    color: black.into(),
                    ..snapshot()
                };
                assert!(collected(&s).is_empty(), "{} reported", black);
            }
        }

        #[test]
        fn unknown_color_reported_as_hex() {
            let s = StyleSnapshot {
                color: "rgb(18, 52, 86)".into(),
                ..snapshot()
            };
            assert_eq!(collected(&s), ["#123456 text color"]);
        }

        #[test]
        fn background_named() {
            let s = StyleSnapshot {
                background_color: "rgb(255, 255, 0)".into(),
                ..snapshot()
            };
            assert_eq!(collected(&s), ["yellow background"]);
            let s = StyleSnapshot {
                background_color: "transparent".into(),
                ..snapshot()
            };
            assert!(collected(&s).is_empty());
        }

        #[test]
        fn font_family_quotes_stripped() {
            let s = StyleSnapshot {
                font_family: "\"Times New Roman\", serif".into(),
                ..snapshot()
            };
            assert_eq!(collected(&s), ["Times New Roman, serif font"]);
        }

        #[test]
        fn monospace_family_ignored() {
            let s = StyleSnapshot {
                font_family: "Consolas, monospace".into(),
                ..snapshot()
            };
            assert!(collected(&s).is_empty());
        }

        #[test]
        fn size_and_weight() {
            let s = StyleSnapshot {
                font_size: "18px".into(),
                font_weight: "600".into(),
                ..snapshot()
            };
            assert_eq!(collected(&s), ["18px font size", "bold text"]);
        }

        #[test]
        fn normal_weight_keyword_ignored() {
            let s = StyleSnapshot {
                font_weight: "normal".into(),
                ..snapshot()
            };
            assert!(collected(&s).is_empty());
        }

        #[test]
        fn decoration_verbatim_unless_none() {
            let s = StyleSnapshot {
                text_decoration: "underline".into(),
                ..snapshot()
            };
            assert_eq!(collected(&s), ["underline"]);
            let s = StyleSnapshot {
                text_decoration: "none solid rgb(0, 0, 0)".into(),
                ..snapshot()
            };
            assert!(collected(&s).is_empty());
        }

        #[test]
        fn empty_values_skipped() {
            assert!(collected(&StyleSnapshot::default()).is_empty());
        }

        #[test]
        fn rule_order() {
            let s = StyleSnapshot {
                color: "rgb(255, 0, 0)".into(),
                background_color: "rgb(255, 255, 0)".into(),
                font_family: "Arial".into(),
                font_size: "20px".into(),
                font_weight: "700".into(),
                text_decoration: "line-through".into(),
            };
            assert_eq!(
                collected(&s),
                [
                    "red text color",
                    "yellow background",
                    "Arial font",
                    "20px font size",
                    "bold text",
                    "line-through"
                ]
            );
        }
    }

    // ==================== Walk ====================

    mod walk {
        use super::*;

        #[test]
        fn span_scenario() {
            assert_eq!(
                light(r#"<span style="color: rgb(255,0,0); font-weight: bold">Hi</span>"#),
                ["red text color", "bold text"]
            );
        }

        #[test]
        fn duplicates_across_elements() {
            assert_eq!(
                light("<b>a</b><p><b>b</b><strong>c</strong></p>"),
                ["bold text"]
            );
        }

        #[test]
        fn inherited_color_reported_once() {
            assert_eq!(
                light(r#"<font color="red"><span>a</span><i>b</i></font>"#),
                ["red text color"]
            );
        }

        #[test]
        fn theme_text_color_suppressed() {
            assert!(light(r#"<span style="color: #1f2937">x</span>"#).is_empty());
            assert_eq!(
                changes(r#"<span style="color: #1f2937">x</span>"#, ColorMode::Dark),
                ["#1f2937 text color"]
            );
            assert!(changes(
                r#"<span style="color: rgb(74, 222, 128)">x</span>"#,
                ColorMode::Dark
            )
            .is_empty());
        }

        #[test]
        fn plain_markup_has_no_changes() {
            assert!(light("<p>Hello <i>there</i></p><br>").is_empty());
        }

        #[test]
        fn word_document_paste() {
            let word = concat!(
                r#"<p class="MsoNormal" style="margin:0in;font-size:11.0pt;font-family:&quot;Calibri&quot;,sans-serif">"#,
                r#"<b><span style="color:#c00000">Important</span></b> notes</p>"#
            );
            assert_eq!(
                light(word),
                [
                    "Calibri, sans-serif font",
                    "14.6667px font size",
                    "bold text",
                    "#c00000 text color"
                ]
            );
        }
    }

    // ==================== Resolver Lifecycle ====================

    mod lifecycle {
        use super::*;

        #[test]
        fn detached_after_success() {
            let mut resolver = Recording::default();
            let engine = StyleDiffEngine::new(Baseline::default());
            engine.diff(&Fragment::parse("<p>x</p>"), &mut resolver).unwrap();
            assert_eq!((resolver.attached, resolver.detached), (1, 1));
        }

        #[test]
        fn detached_after_resolve_error() {
            let mut resolver = Recording {
                fail_on: Some(1),
                ..Default::default()
            };
            let engine = StyleDiffEngine::new(Baseline::default());
            let err = engine
                .diff(&Fragment::parse("<p><b>x</b></p>"), &mut resolver)
                .unwrap_err();
            assert_eq!(err, ResolveError::Failed("boom".into()));
            assert_eq!((resolver.attached, resolver.detached), (1, 1));
        }

        #[test]
        fn detached_after_attach_error() {
            let mut resolver = Recording {
                fail_attach: true,
                ..Default::default()
            };
            let engine = StyleDiffEngine::new(Baseline::default());
            assert!(engine.diff(&Fragment::parse("x"), &mut resolver).is_err());
            assert_eq!((resolver.attached, resolver.detached), (1, 1));
        }

        #[test]
        fn cascade_resolver_reusable() {
            let baseline = Baseline::default();
            let mut resolver = CascadeResolver::new(baseline.clone());
            let engine = StyleDiffEngine::new(baseline);
            engine.diff(&Fragment::parse("<b>x</b>"), &mut resolver).unwrap();
            let second = engine.diff(&Fragment::parse("<u>y</u>"), &mut resolver).unwrap();
            assert_eq!(second.into_vec(), ["underline"]);
            assert!(!resolver.is_attached());
        }
    }
}
