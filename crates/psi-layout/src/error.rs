//! Error types for layout state decoding.

use thiserror::Error;

/// Errors that can occur when decoding a layout state blob.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Input was not valid base64.
    #[error("invalid base64 input: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Header marker did not match the state sentinel.
    #[error("invalid state marker: expected {expected:#x}, found {found:#x}")]
    InvalidMagic { expected: u32, found: u32 },

    /// Header version is not one this reader understands.
    #[error("unsupported state version {found} (expected {expected})")]
    UnsupportedVersion { expected: u32, found: u32 },

    /// Input ended in the middle of a field.
    #[error("unexpected end of data at offset {offset}: need {needed} bytes, {remaining} left")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// A length-prefixed string could not be decoded.
    #[error("invalid string at offset {offset}: {message}")]
    InvalidString { offset: usize, message: String },

    /// Dock area position code outside 0..=3.
    #[error("invalid dock area code {code} at offset {offset}")]
    InvalidDockArea { code: i32, offset: usize },

    /// Dock widget record with docked widgets, which this reader does not decode.
    #[error("dock widget layout with {count} docked area(s) at offset {offset} is not supported")]
    UnsupportedDockLayout { count: i32, offset: usize },

    /// Negative element count.
    #[error("invalid {what} count {count} at offset {offset}")]
    InvalidCount {
        what: &'static str,
        count: i32,
        offset: usize,
    },

    /// I/O error while writing a dump.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for layout operations.
pub type Result<T> = std::result::Result<T, LayoutError>;

impl LayoutError {
    /// Create an InvalidString error.
    pub fn invalid_string(offset: usize, message: impl Into<String>) -> Self {
        Self::InvalidString {
            offset,
            message: message.into(),
        }
    }

    /// Create an InvalidCount error.
    pub fn invalid_count(what: &'static str, count: i32, offset: usize) -> Self {
        Self::InvalidCount {
            what,
            count,
            offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LayoutError::InvalidMagic {
            expected: 0xff,
            found: 0x12,
        };
        assert_eq!(
            format!("{err}"),
            "invalid state marker: expected 0xff, found 0x12"
        );

        let err = LayoutError::UnexpectedEof {
            offset: 8,
            needed: 4,
            remaining: 1,
        };
        assert_eq!(
            format!("{err}"),
            "unexpected end of data at offset 8: need 4 bytes, 1 left"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "test");
        let err: LayoutError = io_err.into();
        assert!(matches!(err, LayoutError::Io(_)));
    }
}
