//! Error types for baseline configuration and style resolution.

use std::io;
use std::path::PathBuf;

/// Errors from loading configuration or resolving styles.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to read a baseline file.
    #[error("Failed to read baseline file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Baseline YAML could not be parsed.
    #[error("Invalid baseline YAML{}: {source}", path_suffix(.path))]
    Yaml {
        path: Option<PathBuf>,
        #[source]
        source: serde_yaml::Error,
    },

    /// A baseline value is unusable.
    #[error("Invalid baseline value for '{key}': {reason}")]
    InvalidBaseline { key: String, reason: String },

    /// Style resolution failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl Error {
    /// Create an invalid-baseline error.
    pub fn invalid_baseline(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBaseline {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

fn path_suffix(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => format!(" in {}", path.display()),
        None => String::new(),
    }
}

/// Errors raised by a [`StyleResolver`](crate::style::StyleResolver).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// `resolve` was called with no fragment attached.
    #[error("No fragment is attached to the resolver.")]
    NotAttached,

    /// `attach` was called while another fragment is still attached.
    #[error("A fragment is already attached to the resolver.")]
    AlreadyAttached,

    /// The element id does not belong to the attached fragment.
    #[error("Element {0} is not part of the attached fragment.")]
    UnknownElement(usize),

    /// Adapter-specific failure.
    #[error("Style resolution failed: {0}")]
    Failed(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
