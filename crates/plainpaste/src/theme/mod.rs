//! Theme handling: light/dark detection and the baseline presentation.

mod adaptive;
mod baseline;

pub use adaptive::{detect_color_mode, set_theme_detector, ColorMode};
pub use baseline::{
    Baseline, BaselineConfig, BaselineOverrides, BLACK_SPELLINGS, BOLD_WEIGHT, NORMAL_WEIGHT,
    NORMAL_WEIGHTS, NO_DECORATION, TRANSPARENT_BACKGROUND, TRANSPARENT_SPELLINGS,
};
