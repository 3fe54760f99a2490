//! Error types for dialogue synthesis

use thiserror::Error;

/// Result type alias for TTS operations
pub type Result<T> = std::result::Result<T, TtsError>;

/// Boxed underlying cause of a failed remote call
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur during TTS operations
#[derive(Error, Debug)]
pub enum TtsError {
    /// Missing or invalid configuration, such as the API key
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed request shape, rejected before any network I/O
    #[error("Validation error: {0}")]
    Validation(String),

    /// Remote synthesis call failed
    #[error("Synthesis failed: {message}")]
    Synthesis {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Dialogue lookup miss
    #[error("Dialogue not found: {0}")]
    NotFound(String),

    /// WAV encoding error that is not an I/O failure
    #[error("Audio processing error: {0}")]
    AudioProcessing(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TtsError {
    /// Synthesis failure without an underlying error value
    pub fn synthesis(message: impl Into<String>) -> Self {
        TtsError::Synthesis {
            message: message.into(),
            source: None,
        }
    }

    /// Synthesis failure wrapping its cause
    pub fn synthesis_with(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        TtsError::Synthesis {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

impl From<reqwest::Error> for TtsError {
    fn from(err: reqwest::Error) -> Self {
        TtsError::synthesis_with(format!("request to TTS provider failed: {}", err), err)
    }
}

impl From<base64::DecodeError> for TtsError {
    fn from(err: base64::DecodeError) -> Self {
        TtsError::synthesis_with(format!("audio payload is not valid base64: {}", err), err)
    }
}

impl From<hound::Error> for TtsError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(e) => TtsError::Io(e),
            other => TtsError::AudioProcessing(other.to_string()),
        }
    }
}
