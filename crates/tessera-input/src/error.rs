//! Error types for agent input decoding and validation.

use thiserror::Error;

/// Errors raised while decoding, constructing, or validating agent input.
#[derive(Error, Debug)]
pub enum InputError {
    /// A semantic validation rule was violated.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// An unrecognized input-kind discriminator was encountered.
    #[error("Invalid input type '{found}'. Supported types: TEXT, CONTENT_BLOCKS, MESSAGES")]
    InvalidInputType { found: String },

    /// A structural or field-level failure while decoding document form.
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// A structural failure while decoding the binary wire form.
    #[error("Wire decode error: {message}")]
    Wire { message: String },

    /// An I/O failure on the caller-supplied stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl InputError {
    /// Create a new validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new wire decode error.
    pub fn wire(message: impl Into<String>) -> Self {
        Self::Wire {
            message: message.into(),
        }
    }

    /// The bare message, without the variant prefix added by `Display`.
    ///
    /// Used when an error is wrapped into an outer error that cites the
    /// index of the offending element.
    pub fn message(&self) -> String {
        match self {
            Self::Validation { message } => message.clone(),
            Self::Parse { message } => message.clone(),
            Self::Wire { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type for agent input operations.
pub type Result<T> = std::result::Result<T, InputError>;
