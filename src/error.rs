//! Error types for hexpaper.
//!
//! Only the outer layer can fail: loading configuration, applying
//! overrides, encoding exports and writing files. Geometry, ranking,
//! labeling and rendering onto a surface are infallible.

use thiserror::Error;

/// Result type for hexpaper operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur outside the rendering core.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration file could not be parsed
    #[error("Failed to parse {format} config: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },

    /// Unknown preset, override key or file format
    #[error("Invalid config: {0}")]
    Config(String),

    /// SVG could not be rasterized or converted
    #[error("Export error: {0}")]
    Export(String),

    /// Output extension not handled
    #[error("Unsupported output format: .{0} (use .svg, .png or .pdf)")]
    UnsupportedFormat(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Parse {
            format: "TOML",
            message: e.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Parse {
            format: "YAML",
            message: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Parse {
            format: "JSON",
            message: e.to_string(),
        }
    }
}
