//! Error types for the toolwise domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all toolwise operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Decision errors ---
    #[error("Decision error: {0}")]
    Decision(#[from] DecisionError),

    // --- Collaborator errors ---
    #[error("Inference error: {0}")]
    Inference(#[from] InferenceError),

    #[error("Tokenizer error: {0}")]
    Tokenizer(#[from] TokenizerError),

    #[error("Chooser error: {0}")]
    Chooser(#[from] ChooserError),

    // --- Caller-supplied inputs ---
    #[error("Invalid input {source_name}: {reason}")]
    Input { source_name: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// A conversation, catalog or schema that could not be read or parsed.
    pub fn input(source_name: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Input {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures surfaced by the decision components themselves.
#[derive(Debug, Error)]
pub enum DecisionError {
    #[error("Model not supported: {0}")]
    ModelNotSupported(String),

    #[error("Inference failed during {stage}: {reason}")]
    InferenceFailed { stage: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Tokenizer failed: {0}")]
    Tokenizer(#[from] TokenizerError),

    #[error("Chooser failed: {0}")]
    Chooser(#[from] ChooserError),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failures reported by a classification, generation or search backend.
#[derive(Debug, Clone, Error)]
pub enum InferenceError {
    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Error)]
pub enum TokenizerError {
    #[error("No encoding available for model {model}: {reason}")]
    EncodingUnavailable { model: String, reason: String },

    #[error("Encoding failed: {0}")]
    EncodeFailed(String),
}

#[derive(Debug, Error)]
pub enum ChooserError {
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("No options to choose from")]
    NoOptions,
}
