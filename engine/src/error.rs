//! Error Types
//!
//! Errors surface only at load/save boundaries. Per-frame code paths never
//! fail: they skip the offending entry and log it instead.

use thiserror::Error;

/// Errors from reading or writing data trees.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("missing child node '{0}'")]
    MissingChild(String),

    #[error("node '{name}' has value '{value}', which is not a valid {expected}")]
    BadValue {
        name: String,
        value: String,
        expected: &'static str,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from the controls layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ControlsError {
    #[error("unrecognized input source '{0}'")]
    UnknownInputSource(String),

    #[error("unknown player action '{0}'")]
    UnknownAction(String),
}

/// Errors from loading or saving the engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let e = ControlsError::UnknownInputSource("zz_9".into());
        assert_eq!(e.to_string(), "unrecognized input source 'zz_9'");

        let e = DataError::BadValue {
            name: "number".into(),
            value: "lots".into(),
            expected: "integer",
        };
        assert!(e.to_string().contains("'lots'"));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let e: ConfigError = io.into();
        assert!(matches!(e, ConfigError::Io(_)));
    }
}
