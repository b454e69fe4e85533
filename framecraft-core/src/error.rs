//! Error types for framecraft

use thiserror::Error;

/// Result type alias for framecraft operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for framecraft
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while writing frames
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Header template layout rejected at definition time
    #[error("Invalid layout for header '{header}': {reason}")]
    InvalidLayout { header: String, reason: String },

    /// Field name not present in the header
    #[error("Header '{header}' has no field '{field}'")]
    UnknownField { header: String, field: String },

    /// Text that cannot be encoded into the field
    #[error("Invalid value '{value}' for field '{field}': {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// Field still unset when the header is serialized
    #[error("Missing value for field '{field}' in header '{header}'")]
    MissingFieldValue { header: String, field: String },

    /// Write or read outside the buffer
    #[error("Buffer access out of bounds: offset {offset} + {len} exceeds size {size}")]
    BufferBounds {
        offset: usize,
        len: usize,
        size: usize,
    },

    /// Input too short to decode a header
    #[error("Truncated '{header}' header: need {needed} bytes, have {available}")]
    Truncated {
        header: String,
        needed: usize,
        available: usize,
    },

    /// Protocol name not known to the registry
    #[error("Unknown protocol: {0}")]
    UnknownProtocol(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Resource already exists
    #[error("Resource already exists: {0}")]
    AlreadyExists(String),
}

impl Error {
    /// Create a layout error for a header template
    pub fn invalid_layout<S: Into<String>, R: Into<String>>(header: S, reason: R) -> Self {
        Error::InvalidLayout {
            header: header.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown field error
    pub fn unknown_field<S: Into<String>, F: Into<String>>(header: S, field: F) -> Self {
        Error::UnknownField {
            header: header.into(),
            field: field.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value<F, V, R>(field: F, value: V, reason: R) -> Self
    where
        F: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        Error::InvalidValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing field value error
    pub fn missing_field<S: Into<String>, F: Into<String>>(header: S, field: F) -> Self {
        Error::MissingFieldValue {
            header: header.into(),
            field: field.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message_names_header_and_field() {
        let err = Error::missing_field("udp", "sport");
        assert_eq!(
            err.to_string(),
            "Missing value for field 'sport' in header 'udp'"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
