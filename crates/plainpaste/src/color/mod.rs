//! Color naming and CSS color values.
//!
//! [`name`] turns a resolved color such as `rgb(255, 0, 0)` into something a
//! person can read (`red`), falling back to the normalized `#rrggbb` form when
//! the color is not in the [catalog](catalog::CATALOG).
//!
//! ```rust
//! use plainpaste::color;
//!
//! assert_eq!(color::name("rgb(0, 0, 0)"), "black");
//! assert_eq!(color::name("rgb(240, 248, 255)"), "alice blue");
//! assert_eq!(color::name("rgb(18, 52, 86)"), "#123456");
//! assert_eq!(color::name("hsl(0, 100%, 50%)"), "hsl(0, 100%, 50%)");
//! ```
//!
//! [`Rgba`] is the parsed form used by the cascade resolver. It accepts the
//! spellings found in pasted markup (keywords, `#rgb`, `#rrggbb`, functional
//! `rgb()`/`rgba()`) and prints them back the way a browser reports a
//! resolved color.

pub mod catalog;

use once_cell::sync::Lazy;
use regex::Regex;

pub use catalog::{catalog_name, hex_for_name, CATALOG, SYNONYMS};

/// Functional `rgb()`/`rgba()` with integer channels and an optional alpha.
static FUNCTIONAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*([\d.]+%?)\s*)?\)$")
        .expect("functional color pattern is valid")
});

/// Spellings answered directly, compared with all whitespace removed.
const QUICK_NAMES: &[(&str, &str)] = &[
    ("rgb(0,0,0)", "black"),
    ("rgb(255,255,255)", "white"),
    ("rgba(0,0,0,0)", "transparent"),
    ("rgb(255,0,0)", "red"),
    ("rgb(0,0,255)", "blue"),
    ("rgb(255,255,0)", "yellow"),
    ("rgb(128,128,128)", "gray"),
    ("rgb(128,0,128)", "purple"),
    ("rgb(255,165,0)", "orange"),
];

/// Returns a human-readable name for a color.
///
/// Unknown colors come back as lowercase `#rrggbb`; anything that is not a
/// functional or hex color comes back unchanged.
pub fn name(color: &str) -> String {
    let compact: String = color
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    if let Some((_, quick)) = QUICK_NAMES.iter().find(|(spelling, _)| *spelling == compact) {
        return quick.to_string();
    }

    let hex = match to_hex(color) {
        Some(hex) => hex,
        None if is_hex6(&compact) => compact,
        None => return color.to_string(),
    };
    match catalog_name(&hex) {
        Some(known) => known.to_string(),
        None => hex,
    }
}

/// Normalizes a functional color to lowercase `#rrggbb`, ignoring alpha.
///
/// Returns `None` when the input is not `rgb()`/`rgba()` with integer
/// channels in range.
pub fn to_hex(color: &str) -> Option<String> {
    let caps = FUNCTIONAL.captures(color.trim())?;
    let channel = |i: usize| caps.get(i)?.as_str().parse::<u8>().ok();
    Some(format!(
        "#{:02x}{:02x}{:02x}",
        channel(1)?,
        channel(2)?,
        channel(3)?
    ))
}

fn is_hex6(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

/// A parsed CSS color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `0.0..=1.0`.
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 0.0,
    };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parses a color as written in markup or a `style` attribute.
    ///
    /// Supports:
    /// - Keywords: `red`, `AliceBlue`, `grey`, `transparent`
    /// - Hex codes: `#f00` or `#ff0000`
    /// - Functional: `rgb(255, 0, 0)`, `rgba(255, 0, 0, 0.5)`, `rgb(100% 0% 0%)`
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        let lower = s.to_ascii_lowercase();

        if lower == "transparent" {
            return Ok(Self::TRANSPARENT);
        }

        if let Some(hex) = lower.strip_prefix('#') {
            return Self::parse_hex(hex);
        }

        if lower.starts_with("rgb") {
            return Self::parse_functional(&lower);
        }

        match hex_for_name(&lower) {
            Some(hex) => Self::parse_hex(&hex[1..]),
            None => Err(format!("Unknown color: {}", s)),
        }
    }

    /// Parses a hex color code (without the # prefix).
    fn parse_hex(hex: &str) -> Result<Self, String> {
        if !hex.is_ascii() {
            return Err(format!("Invalid hex: #{}", hex));
        }
        let digit = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| format!("Invalid hex: #{}", hex))
        };
        match hex.len() {
            // #rgb -> #rrggbb
            3 => Ok(Self::rgb(digit(0..1)? * 17, digit(1..2)? * 17, digit(2..3)? * 17)),
            6 => Ok(Self::rgb(digit(0..2)?, digit(2..4)?, digit(4..6)?)),
            _ => Err(format!("Invalid hex color: #{} (must be 3 or 6 digits)", hex)),
        }
    }

    /// Parses `rgb(...)`/`rgba(...)` with comma or space separated channels.
    fn parse_functional(s: &str) -> Result<Self, String> {
        let inner = s
            .strip_prefix("rgba(")
            .or_else(|| s.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| format!("Invalid color function: {}", s))?;
        let parts: Vec<&str> = inner
            .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .collect();
        if !(3..=4).contains(&parts.len()) {
            return Err(format!(
                "rgb() requires 3 or 4 components, got {}",
                parts.len()
            ));
        }

        let channel = |part: &str| -> Result<u8, String> {
            let value = match part.strip_suffix('%') {
                Some(pct) => parse_number(pct)? * 2.55,
                None => parse_number(part)?,
            };
            Ok(value.round().clamp(0.0, 255.0) as u8)
        };
        let alpha = match parts.get(3) {
            Some(part) => match part.strip_suffix('%') {
                Some(pct) => parse_number(pct)? / 100.0,
                None => parse_number(part)?,
            }
            .clamp(0.0, 1.0),
            None => 1.0,
        };

        Ok(Self {
            r: channel(parts[0])?,
            g: channel(parts[1])?,
            b: channel(parts[2])?,
            a: alpha,
        })
    }

    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }

    /// Lowercase `#rrggbb`, alpha ignored.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// The resolved-value spelling: `rgb(r, g, b)` or `rgba(r, g, b, a)`.
    pub fn to_css(&self) -> String {
        if self.is_opaque() {
            format!("rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

fn parse_number(s: &str) -> Result<f32, String> {
    s.parse::<f32>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| format!("Invalid color component '{}': expected a number", s))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn triple_names_match_catalog_or_hex(r: u8, g: u8, b: u8, spaced in any::<bool>()) {
            let input = if spaced {
                format!("rgb({}, {}, {})", r, g, b)
            } else {
                format!("rgb({},{},{})", r, g, b)
            };
            let hex = format!("#{:02x}{:02x}{:02x}", r, g, b);
            let expected = catalog_name(&hex).map(str::to_string).unwrap_or(hex);
            prop_assert_eq!(name(&input), expected);
        }

        #[test]
        fn parse_then_print_is_stable(r: u8, g: u8, b: u8) {
            let printed = Rgba::rgb(r, g, b).to_css();
            prop_assert_eq!(Rgba::parse(&printed).unwrap().to_css(), printed);
        }
    }
}
