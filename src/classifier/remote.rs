//! Classifier backed by an external HTTP inference service.
//!
//! Wire format: `POST {endpoint}` with `{"text": "..."}`; the service answers
//! `{"label": "..."}` (`emotion` is accepted as an alias).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::EmotionClassifier;
use crate::error::{BotError, Result};

/// Request body sent to the inference service.
#[derive(Debug, Clone, Serialize)]
pub struct RemoteRequest<'a> {
    /// Text to classify.
    pub text: &'a str,
}

/// Response body returned by the inference service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteResponse {
    /// Predicted emotion label.
    #[serde(alias = "emotion")]
    pub label: String,
}

/// [`EmotionClassifier`] that delegates to a remote service.
pub struct RemoteClassifier {
    endpoint: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for RemoteClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteClassifier")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl RemoteClassifier {
    /// Create a classifier for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::Config`] if `endpoint` is not an `http(s)` URL.
    pub fn new(endpoint: &str) -> Result<Self> {
        let endpoint = endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(BotError::Config(format!(
                "classifier endpoint must be an http(s) URL, got `{endpoint}`"
            )));
        }
        Ok(Self {
            endpoint: endpoint.to_owned(),
            client: reqwest::Client::new(),
        })
    }

    /// The configured endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl EmotionClassifier for RemoteClassifier {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn predict(&self, text: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&RemoteRequest { text })
            .send()
            .await
            .map_err(|e| BotError::Inference(format!("classifier request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BotError::Inference(format!(
                "classifier HTTP {}: {body}",
                status.as_u16()
            )));
        }

        let parsed: RemoteResponse = response
            .json()
            .await
            .map_err(|e| BotError::Inference(format!("invalid classifier response: {e}")))?;
        Ok(parsed.label)
    }
}
