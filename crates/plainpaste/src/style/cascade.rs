//! A minimal cascade for clipboard markup.
//!
//! Clipboard HTML carries its presentation in three places: inline `style`
//! attributes, presentational tags (`<b>`, `<u>`, `<font>`, ...) and legacy
//! attributes (`color`, `bgcolor`, `face`, `size`). [`CascadeResolver`]
//! evaluates those in the browser's order (tag defaults, then presentational
//! attributes, then inline declarations, then `!important` ones) and applies
//! inheritance for color, font family, font size and font weight. Background
//! and text decoration are not inherited.
//!
//! Resolved values use the spelling a browser reports: colors as
//! `rgb(r, g, b)`, sizes in `px`, weights as numbers.

use plainpaste_markup::{Element, ElementId, Fragment};

use super::css::{parse_declarations, Declaration};
use super::{StyleResolver, StyleSnapshot};
use crate::color::Rgba;
use crate::error::ResolveError;
use crate::theme::{Baseline, NO_DECORATION};

/// Font sizes for `<font size="1">` through `<font size="7">`.
const FONT_SIZE_STEPS: [f32; 7] = [10.0, 13.0, 16.0, 18.0, 24.0, 32.0, 48.0];

/// Scale factor for `smaller`/`larger` and `<small>`/`<big>`.
const SIZE_RATIO: f32 = 1.2;

const BOLD: u16 = 700;
const NORMAL: u16 = 400;

/// Text decoration lines, in the order they are reported.
const DECORATION_LINES: &[&str] = &["underline", "overline", "line-through", "blink"];

#[derive(Debug, Clone, PartialEq)]
struct Computed {
    color: Rgba,
    background: Rgba,
    font_family: String,
    font_size: f32,
    font_weight: u16,
    decoration: Vec<&'static str>,
}

impl Computed {
    fn inherit(parent: &Computed) -> Self {
        Self {
            color: parent.color,
            background: Rgba::TRANSPARENT,
            font_family: parent.font_family.clone(),
            font_size: parent.font_size,
            font_weight: parent.font_weight,
            decoration: Vec::new(),
        }
    }

    fn snapshot(&self) -> StyleSnapshot {
        StyleSnapshot {
            color: self.color.to_css(),
            background_color: self.background.to_css(),
            font_family: self.font_family.clone(),
            font_size: format_px(self.font_size),
            font_weight: self.font_weight.to_string(),
            text_decoration: if self.decoration.is_empty() {
                NO_DECORATION.to_string()
            } else {
                self.decoration.join(" ")
            },
        }
    }

    fn add_decoration(&mut self, line: &'static str) {
        if !self.decoration.contains(&line) {
            self.decoration.push(line);
            self.decoration
                .sort_by_key(|l| DECORATION_LINES.iter().position(|d| d == l));
        }
    }
}

/// Resolves styles from inline declarations, presentational tags and
/// attributes, on top of a [`Baseline`] output surface.
///
/// Snapshots for the whole fragment are computed on
/// [`attach`](StyleResolver::attach) and dropped on
/// [`detach`](StyleResolver::detach).
#[derive(Debug, Clone)]
pub struct CascadeResolver {
    baseline: Baseline,
    attached: Option<Vec<StyleSnapshot>>,
}

impl CascadeResolver {
    pub fn new(baseline: Baseline) -> Self {
        Self {
            baseline,
            attached: None,
        }
    }

    pub fn baseline(&self) -> &Baseline {
        &self.baseline
    }

    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }

    /// The computed style of the output surface the fragment is attached to.
    fn surface(&self) -> Result<Computed, ResolveError> {
        let color = Rgba::parse(&self.baseline.text_color)
            .map_err(|e| ResolveError::Failed(format!("baseline text color: {}", e)))?;
        let font_size = parse_px(&self.baseline.font_size).ok_or_else(|| {
            ResolveError::Failed(format!(
                "baseline font size '{}' is not a px size",
                self.baseline.font_size
            ))
        })?;
        Ok(Computed {
            color,
            background: Rgba::TRANSPARENT,
            font_family: self.baseline.font_family.clone(),
            font_size,
            font_weight: NORMAL,
            decoration: Vec::new(),
        })
    }
}

impl StyleResolver for CascadeResolver {
    fn attach(&mut self, fragment: &Fragment) -> Result<(), ResolveError> {
        if self.attached.is_some() {
            return Err(ResolveError::AlreadyAttached);
        }

        let surface = self.surface()?;
        let elements = fragment.elements();
        let mut computed: Vec<Computed> = Vec::with_capacity(elements.len());
        for element in &elements {
            // The root stands for the surface; attributes merged onto it from
            // a pasted `<html>` tag are not rendered.
            let style = match element.parent {
                Some(parent) => cascade(
                    element.element,
                    Computed::inherit(&computed[parent.0]),
                    surface.font_size,
                ),
                None => Computed::inherit(&surface),
            };
            computed.push(style);
        }

        tracing::trace!(elements = computed.len(), "attached fragment");
        self.attached = Some(computed.iter().map(Computed::snapshot).collect());
        Ok(())
    }

    fn resolve(&mut self, id: ElementId) -> Result<StyleSnapshot, ResolveError> {
        let snapshots = self.attached.as_ref().ok_or(ResolveError::NotAttached)?;
        snapshots
            .get(id.0)
            .cloned()
            .ok_or(ResolveError::UnknownElement(id.0))
    }

    fn detach(&mut self) {
        self.attached = None;
    }
}

fn cascade(element: &Element, mut style: Computed, root_size: f32) -> Computed {
    let parent_size = style.font_size;
    let parent_weight = style.font_weight;

    apply_tag_defaults(element.name(), &mut style, parent_size, parent_weight);
    apply_presentational_attributes(element, &mut style);

    if let Some(inline) = element.attr("style") {
        let declarations = parse_declarations(inline);
        let (important, normal): (Vec<&Declaration>, Vec<&Declaration>) =
            declarations.iter().partition(|d| d.important);
        let context = Context {
            parent_size,
            parent_weight,
            root_size,
        };
        for declaration in normal.into_iter().chain(important) {
            apply_declaration(declaration, &mut style, &context);
        }
    }
    style
}

/// The user agent stylesheet, restricted to what clipboard markup uses.
fn apply_tag_defaults(name: &str, style: &mut Computed, parent_size: f32, parent_weight: u16) {
    match name {
        "b" | "strong" => style.font_weight = bolder(parent_weight),
        "u" | "ins" => style.add_decoration("underline"),
        "s" | "strike" | "del" => style.add_decoration("line-through"),
        "code" | "pre" | "tt" | "kbd" | "samp" => style.font_family = "monospace".to_string(),
        "small" => style.font_size = parent_size / SIZE_RATIO,
        "big" => style.font_size = parent_size * SIZE_RATIO,
        "mark" => {
            style.background = Rgba::rgb(255, 255, 0);
            style.color = Rgba::rgb(0, 0, 0);
        }
        heading if heading.len() == 2 && heading.starts_with('h') => {
            let scale = match &heading[1..] {
                "1" => 2.0,
                "2" => 1.5,
                "3" => 1.17,
                "4" => 1.0,
                "5" => 0.83,
                "6" => 0.67,
                _ => return,
            };
            style.font_size = parent_size * scale;
            style.font_weight = BOLD;
        }
        _ => {}
    }
}

/// Legacy attributes: `bgcolor` anywhere, `color`/`face`/`size` on `<font>`.
fn apply_presentational_attributes(element: &Element, style: &mut Computed) {
    if let Some(color) = element.attr("bgcolor").and_then(parse_legacy_color) {
        style.background = color;
    }
    if element.name() != "font" {
        return;
    }
    if let Some(color) = element.attr("color").and_then(parse_legacy_color) {
        style.color = color;
    }
    if let Some(face) = element.attr("face") {
        let face = normalize_family(face);
        if !face.is_empty() {
            style.font_family = face;
        }
    }
    if let Some(size) = element.attr("size").and_then(font_size_step) {
        style.font_size = size;
    }
}

/// Legacy color attributes also accept hex digits without the `#`.
fn parse_legacy_color(value: &str) -> Option<Rgba> {
    let value = value.trim();
    Rgba::parse(value).ok().or_else(|| {
        if matches!(value.len(), 3 | 6) && value.chars().all(|c| c.is_ascii_hexdigit()) {
            Rgba::parse(&format!("#{}", value)).ok()
        } else {
            None
        }
    })
}

/// `<font size>`: absolute `1`..`7` or relative `+n`/`-n` from 3.
fn font_size_step(value: &str) -> Option<f32> {
    let value = value.trim();
    let step: i64 = if let Some(rest) = value.strip_prefix('+') {
        3i64.saturating_add(rest.parse().ok()?)
    } else if let Some(rest) = value.strip_prefix('-') {
        3i64.saturating_sub(rest.parse().ok()?)
    } else {
        value.parse().ok()?
    };
    let index = step.clamp(1, 7) as usize - 1;
    Some(FONT_SIZE_STEPS[index])
}

struct Context {
    parent_size: f32,
    parent_weight: u16,
    root_size: f32,
}

fn apply_declaration(declaration: &Declaration, style: &mut Computed, context: &Context) {
    let value = declaration.value.as_str();
    let keyword = value.to_ascii_lowercase();
    let inherit = matches!(keyword.as_str(), "inherit" | "unset");

    match declaration.name.as_str() {
        "color" => {
            if inherit || keyword == "currentcolor" {
                return;
            }
            if keyword == "initial" {
                style.color = Rgba::rgb(0, 0, 0);
            } else if let Ok(color) = Rgba::parse(value) {
                style.color = color;
            }
        }
        "background-color" => {
            if let Ok(color) = Rgba::parse(value) {
                style.background = color;
            } else if matches!(keyword.as_str(), "initial" | "unset" | "none") {
                style.background = Rgba::TRANSPARENT;
            }
        }
        "background" => {
            style.background = split_top_level(value, char::is_whitespace)
                .into_iter()
                .find_map(|token| Rgba::parse(token).ok())
                .unwrap_or(Rgba::TRANSPARENT);
        }
        "font-family" => {
            if inherit {
                return;
            }
            let family = normalize_family(value);
            if !family.is_empty() {
                style.font_family = family;
            }
        }
        "font-size" => {
            if let Some(size) = parse_font_size(&keyword, context) {
                style.font_size = size;
            }
        }
        "font-weight" => {
            if let Some(weight) = parse_font_weight(&keyword, context.parent_weight) {
                style.font_weight = weight;
            }
        }
        "font" => apply_font_shorthand(value, style, context),
        "text-decoration" | "text-decoration-line" => {
            if keyword.split_whitespace().any(|t| t == "none") {
                style.decoration.clear();
                return;
            }
            let lines: Vec<&'static str> = DECORATION_LINES
                .iter()
                .copied()
                .filter(|line| keyword.split_whitespace().any(|t| t == *line))
                .collect();
            if !lines.is_empty() {
                style.decoration = lines;
            }
        }
        _ => {}
    }
}

/// `font: [style] [weight] size[/line-height] family`.
fn apply_font_shorthand(value: &str, style: &mut Computed, context: &Context) {
    let tokens = split_top_level(value, char::is_whitespace);
    let Some(size_at) = tokens.iter().position(|token| {
        let size = token.split('/').next().unwrap_or(token).to_ascii_lowercase();
        parse_font_size(&size, context).is_some()
    }) else {
        return;
    };

    let mut weight = NORMAL;
    for token in &tokens[..size_at] {
        if let Some(w) = parse_font_weight(&token.to_ascii_lowercase(), context.parent_weight) {
            weight = w;
        }
    }

    let size_token = tokens[size_at].split('/').next().unwrap_or(tokens[size_at]);
    let Some(size) = parse_font_size(&size_token.to_ascii_lowercase(), context) else {
        return;
    };
    let family = normalize_family(&tokens[size_at + 1..].join(" "));
    if family.is_empty() {
        return;
    }

    style.font_weight = weight;
    style.font_size = size;
    style.font_family = family;
}

fn parse_font_size(keyword: &str, context: &Context) -> Option<f32> {
    let absolute = match keyword {
        "inherit" | "unset" => return Some(context.parent_size),
        "xx-small" => 9.0,
        "x-small" => 10.0,
        "small" => 13.0,
        "medium" | "initial" => 16.0,
        "large" => 18.0,
        "x-large" => 24.0,
        "xx-large" => 32.0,
        "xxx-large" => 48.0,
        "smaller" => context.parent_size / SIZE_RATIO,
        "larger" => context.parent_size * SIZE_RATIO,
        _ => return parse_length(keyword, context),
    };
    Some(absolute)
}

fn parse_length(value: &str, context: &Context) -> Option<f32> {
    let units: &[(&str, f32)] = &[
        ("rem", context.root_size),
        ("em", context.parent_size),
        ("px", 1.0),
        ("pt", 4.0 / 3.0),
        ("pc", 16.0),
        ("in", 96.0),
        ("cm", 96.0 / 2.54),
        ("mm", 96.0 / 25.4),
        ("%", context.parent_size / 100.0),
    ];
    let (number, factor) = units
        .iter()
        .find_map(|(unit, factor)| value.strip_suffix(unit).map(|n| (n, *factor)))?;
    let number: f32 = number.trim().parse().ok()?;
    if !number.is_finite() || number < 0.0 {
        return None;
    }
    Some(number * factor)
}

fn parse_font_weight(keyword: &str, parent: u16) -> Option<u16> {
    match keyword {
        "normal" | "initial" => Some(NORMAL),
        "bold" => Some(BOLD),
        "bolder" => Some(bolder(parent)),
        "lighter" => Some(lighter(parent)),
        "inherit" | "unset" => Some(parent),
        _ => keyword
            .parse::<f32>()
            .ok()
            .filter(|w| (1.0..=1000.0).contains(w))
            .map(|w| w.round() as u16),
    }
}

fn bolder(parent: u16) -> u16 {
    match parent {
        0..=349 => NORMAL,
        350..=549 => BOLD,
        550..=899 => 900,
        _ => parent,
    }
}

fn lighter(parent: u16) -> u16 {
    match parent {
        0..=99 => parent,
        100..=549 => 100,
        550..=749 => NORMAL,
        _ => BOLD,
    }
}

/// Trims each family in a comma separated list and rejoins with `", "`.
fn normalize_family(value: &str) -> String {
    split_top_level(value, |c| c == ',')
        .into_iter()
        .map(str::trim)
        .filter(|family| !family.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Splits outside of parentheses and quotes.
fn split_top_level(value: &str, is_separator: impl Fn(char) -> bool) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;
    for (i, c) in value.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '(') => depth += 1,
            (None, ')') => depth = depth.saturating_sub(1),
            (None, c) if depth == 0 && is_separator(c) => {
                if start < i {
                    parts.push(&value[start..i]);
                }
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    if start < value.len() {
        parts.push(&value[start..]);
    }
    parts
}

fn parse_px(size: &str) -> Option<f32> {
    let size = size.trim();
    let value: f32 = size.strip_suffix("px").unwrap_or(size).trim().parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

/// `16px`, `14.6667px`: at most four decimals, no trailing zeros.
fn format_px(size: f32) -> String {
    let rounded = (size * 10_000.0).round() / 10_000.0;
    format!("{}px", rounded)
}
