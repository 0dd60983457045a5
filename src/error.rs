//! Error types for tfkit.
//!
//! Only failures with no sane default cross a component boundary as an error.
//! Out-of-range control points, bad presets, malformed record fields and the
//! like are logged and corrected where they are detected, and never show up here.

use thiserror::Error;

/// The main error type for tfkit operations.
#[derive(Error, Debug)]
pub enum TfError {
    /// JSON text that could not be parsed at all
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// PNG encoding errors
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A mapping looked up by name that was never registered
    #[error("{kind} not registered: {name}")]
    NotRegistered { kind: &'static str, name: String },
}

/// Convenience type alias for Results with TfError
pub type Result<T> = std::result::Result<T, TfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = TfError::NotRegistered {
            kind: "colormap",
            name: "terrain".to_string(),
        };
        assert_eq!(err.to_string(), "colormap not registered: terrain");

        let err = TfError::Config {
            message: "texture width must be positive".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Configuration error: texture width must be positive"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: TfError = parse.unwrap_err().into();
        assert!(matches!(err, TfError::Json(_)));
    }
}
