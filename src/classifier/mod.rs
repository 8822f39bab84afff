//! Emotion classifier adapter.
//!
//! The classifier is an opaque capability: given text, return one emotion
//! label. Backends implement [`EmotionClassifier`]; [`load`] builds the one
//! selected in [`ClassifierConfig`] once at startup.

pub mod linear;
pub mod remote;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{ClassifierBackend, ClassifierConfig};
use crate::error::{BotError, Result};

pub use linear::LinearClassifier;
pub use remote::RemoteClassifier;

/// Text → emotion label.
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    /// Short backend identifier used in logs (e.g. `linear`, `remote`).
    fn name(&self) -> &'static str;

    /// Predict the emotion label for `text`.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Inference`] if the model fails on this input.
    async fn predict(&self, text: &str) -> Result<String>;
}

/// Request-level classification failure, as surfaced to HTTP clients.
///
/// The messages are fixed; internal error detail never reaches the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ClassificationError {
    /// No classifier could be loaded at startup.
    #[error("Model is not loaded. Please ensure the model file is available.")]
    ModelUnavailable,
    /// The classifier failed or timed out on this request.
    #[error("Prediction failed. Please try again.")]
    PredictionFailed,
}

/// Build the configured classifier backend.
///
/// # Errors
///
/// Returns [`BotError::ArtifactLoad`] if the linear model artifact cannot be
/// read or validated, or if the remote backend has no endpoint.
pub fn load(config: &ClassifierConfig) -> Result<Arc<dyn EmotionClassifier>> {
    match config.backend {
        ClassifierBackend::Linear => {
            let model = LinearClassifier::from_file(&config.model_path)?;
            Ok(Arc::new(model))
        }
        ClassifierBackend::Remote => {
            let endpoint = config.endpoint.as_deref().ok_or_else(|| {
                BotError::artifact_load(
                    "classifier model",
                    "<remote>",
                    "remote backend selected but classifier.endpoint is not set",
                )
            })?;
            Ok(Arc::new(RemoteClassifier::new(endpoint)?))
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn error_messages_are_fixed() {
        assert_eq!(
            ClassificationError::ModelUnavailable.to_string(),
            "Model is not loaded. Please ensure the model file is available."
        );
        assert_eq!(
            ClassificationError::PredictionFailed.to_string(),
            "Prediction failed. Please try again."
        );
    }

    #[test]
    fn load_missing_linear_artifact_fails() {
        let config = ClassifierConfig {
            model_path: "/nonexistent/model.json".into(),
            ..Default::default()
        };
        assert!(matches!(load(&config), Err(BotError::ArtifactLoad { .. })));
    }

    #[test]
    fn load_remote_without_endpoint_fails() {
        let config = ClassifierConfig {
            backend: ClassifierBackend::Remote,
            endpoint: None,
            ..Default::default()
        };
        assert!(matches!(load(&config), Err(BotError::ArtifactLoad { .. })));
    }

    #[test]
    fn load_remote_with_endpoint_succeeds() {
        let config = ClassifierConfig {
            backend: ClassifierBackend::Remote,
            endpoint: Some("http://127.0.0.1:9/classify".to_owned()),
            ..Default::default()
        };
        let classifier = load(&config).unwrap();
        assert_eq!(classifier.name(), "remote");
    }
}
