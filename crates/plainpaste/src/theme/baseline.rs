//! The "default, therefore unreported" presentation.
//!
//! Every property a pasted element shares with the [`Baseline`] is left out
//! of the change list. Only four values vary: the text color (per theme), the
//! output surface's font family and size, and the family names that mark a
//! font as monospace. The rest are fixed CSS initial values.
//!
//! Baselines can be tuned from YAML. Shared keys apply to both modes and a
//! `light:` or `dark:` section overrides them for one mode:
//!
//! ```yaml
//! font_size: 16px
//! monospace_markers: [Courier New, monospace, Menlo]
//! light:
//!   text_color: "#1f2937"
//! dark:
//!   text_color: "rgb(74, 222, 128)"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::adaptive::ColorMode;
use crate::color::Rgba;
use crate::error::{Error, Result};

/// Resolved spelling of a fully transparent background.
pub const TRANSPARENT_BACKGROUND: &str = "rgba(0, 0, 0, 0)";

/// Background spellings that count as "no background".
pub const TRANSPARENT_SPELLINGS: &[&str] = &["transparent", TRANSPARENT_BACKGROUND];

/// Text color spellings that count as black and are never reported.
pub const BLACK_SPELLINGS: &[&str] = &["rgb(0, 0, 0)", "#000000", "#000", "black"];

/// Font weights that count as regular.
pub const NORMAL_WEIGHTS: &[&str] = &["normal", "400"];

/// Resolved weight of regular text.
pub const NORMAL_WEIGHT: &str = "400";

/// Resolved weight of bold text.
pub const BOLD_WEIGHT: &str = "700";

/// Text decoration marker meaning "no decoration".
pub const NO_DECORATION: &str = "none";

const LIGHT_TEXT_COLOR: &str = "rgb(31, 41, 55)";
const DARK_TEXT_COLOR: &str = "rgb(74, 222, 128)";
const DEFAULT_FONT_FAMILY: &str = "\"Courier New\", monospace";
const DEFAULT_FONT_SIZE: &str = "14px";
const DEFAULT_MONOSPACE_MARKERS: &[&str] = &["Courier New", "monospace"];

/// Baseline presentation for one color mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Baseline {
    pub mode: ColorMode,
    /// Resolved `rgb(r, g, b)` text color of the output surface.
    pub text_color: String,
    /// Font family of the output surface, inherited by unstyled elements.
    pub font_family: String,
    /// Substrings that mark a font family as monospace.
    pub monospace_markers: Vec<String>,
    /// Font size of the output surface, in `px`.
    pub font_size: String,
}

impl Baseline {
    /// The built-in baseline for a color mode.
    pub fn for_mode(mode: ColorMode) -> Self {
        let text_color = match mode {
            ColorMode::Light => LIGHT_TEXT_COLOR,
            ColorMode::Dark => DARK_TEXT_COLOR,
        };
        Self {
            mode,
            text_color: text_color.to_string(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            monospace_markers: DEFAULT_MONOSPACE_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            font_size: DEFAULT_FONT_SIZE.to_string(),
        }
    }

    /// True when an unquoted font family list names a monospace font.
    pub fn is_monospace(&self, family: &str) -> bool {
        self.monospace_markers
            .iter()
            .any(|marker| family.contains(marker.as_str()))
    }
}

impl Default for Baseline {
    fn default() -> Self {
        Self::for_mode(ColorMode::Light)
    }
}

/// Optional baseline values, as written in a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monospace_markers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
}

impl BaselineOverrides {
    /// Values set here replace the ones in `base`.
    fn merge(&self, base: &BaselineOverrides) -> BaselineOverrides {
        BaselineOverrides {
            text_color: self.text_color.clone().or_else(|| base.text_color.clone()),
            font_family: self.font_family.clone().or_else(|| base.font_family.clone()),
            monospace_markers: self
                .monospace_markers
                .clone()
                .or_else(|| base.monospace_markers.clone()),
            font_size: self.font_size.clone().or_else(|| base.font_size.clone()),
        }
    }
}

/// Baseline configuration file: shared values plus per-mode overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineConfig {
    #[serde(flatten)]
    pub base: BaselineOverrides,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light: Option<BaselineOverrides>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark: Option<BaselineOverrides>,
}

impl BaselineConfig {
    /// Parses a YAML baseline definition.
    pub fn parse(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|source| Error::Yaml { path: None, source })
    }

    /// Reads and parses a YAML baseline file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|err| match err {
            Error::Yaml { source, .. } => Error::Yaml {
                path: Some(path.to_path_buf()),
                source,
            },
            other => other,
        })
    }

    /// Builds the baseline for a mode: built-in defaults, then shared keys,
    /// then the mode's section.
    pub fn resolve(&self, mode: ColorMode) -> Result<Baseline> {
        let section = match mode {
            ColorMode::Light => self.light.as_ref(),
            ColorMode::Dark => self.dark.as_ref(),
        };
        let merged = match section {
            Some(section) => section.merge(&self.base),
            None => self.base.clone(),
        };

        let mut baseline = Baseline::for_mode(mode);
        if let Some(color) = merged.text_color {
            let parsed = Rgba::parse(&color)
                .map_err(|reason| Error::invalid_baseline("text_color", reason))?;
            baseline.text_color = parsed.to_css();
        }
        if let Some(family) = merged.font_family {
            if family.trim().is_empty() {
                return Err(Error::invalid_baseline("font_family", "must not be empty"));
            }
            baseline.font_family = family.trim().to_string();
        }
        if let Some(markers) = merged.monospace_markers {
            if markers.iter().any(|m| m.trim().is_empty()) {
                return Err(Error::invalid_baseline(
                    "monospace_markers",
                    "markers must not be empty",
                ));
            }
            baseline.monospace_markers = markers;
        }
        if let Some(size) = merged.font_size {
            baseline.font_size = normalize_px(&size)
                .ok_or_else(|| Error::invalid_baseline("font_size", format!("'{}' is not a px size", size)))?;
        }
        Ok(baseline)
    }
}

/// `"16px"`, `" 16.0px "` and `"16"` all become `"16px"`.
fn normalize_px(size: &str) -> Option<String> {
    let size = size.trim();
    let number = size.strip_suffix("px").unwrap_or(size).trim();
    let value: f32 = number.parse().ok()?;
    if !value.is_finite() || value <= 0.0 {
        return None;
    }
    Some(format!("{}px", value))
}
