//! Error types for the kindred service.

use std::path::PathBuf;

/// Top-level error type for the chatbot backend.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    /// A startup artifact (classifier model, FAQ table) could not be loaded.
    ///
    /// Callers at startup log this and continue in degraded mode.
    #[error("failed to load {artifact} from {}: {reason}", path.display())]
    ArtifactLoad {
        /// Which artifact failed (`"classifier model"`, `"FAQ table"`).
        artifact: &'static str,
        /// Where it was loaded from.
        path: PathBuf,
        /// Underlying cause.
        reason: String,
    },

    /// The classifier raised or timed out while handling a request.
    #[error("inference error: {0}")]
    Inference(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// HTTP server bind/serve error.
    #[error("server error: {0}")]
    Server(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BotError {
    /// Shorthand for an [`BotError::ArtifactLoad`] error.
    pub fn artifact_load(
        artifact: &'static str,
        path: impl Into<PathBuf>,
        reason: impl ToString,
    ) -> Self {
        Self::ArtifactLoad {
            artifact,
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, BotError>;
