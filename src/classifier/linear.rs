//! In-process linear classifier loaded from an exported model artifact.
//!
//! The artifact is the JSON export of a trained one-vs-rest linear model
//! (for example a linear SVM over a bag-of-words vectoriser):
//!
//! ```json
//! {
//!   "labels": ["joy", "sadness"],
//!   "intercepts": [0.1, -0.2],
//!   "vocabulary": { "happy": { "coef": [1.2, -0.4], "idf": 1.0 } },
//!   "l2_normalize": false
//! }
//! ```
//!
//! Scoring: term counts, weighted by `idf`, optionally L2-normalised, dotted
//! with each label's coefficients plus its intercept. The highest score wins;
//! ties go to the label listed first.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

use super::EmotionClassifier;
use crate::error::{BotError, Result};

const ARTIFACT: &str = "classifier model";

/// Path reported for models built with [`LinearClassifier::new`].
const IN_MEMORY: &str = "<in-memory>";

/// Per-term weights in the artifact.
#[derive(Debug, Clone, Deserialize)]
pub struct TermWeights {
    /// One coefficient per label, in `labels` order.
    pub coef: Vec<f64>,
    /// Inverse document frequency applied to the term count.
    #[serde(default = "default_idf")]
    pub idf: f64,
}

fn default_idf() -> f64 {
    1.0
}

/// Deserialized model artifact.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    /// Output labels.
    pub labels: Vec<String>,
    /// One intercept per label.
    pub intercepts: Vec<f64>,
    /// Known terms and their weights.
    pub vocabulary: HashMap<String, TermWeights>,
    /// Whether the feature vector is L2-normalised before scoring.
    #[serde(default)]
    pub l2_normalize: bool,
}

impl LinearModel {
    /// Checks that every weight vector lines up with `labels`.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.labels.is_empty() {
            return Err("model has no labels".into());
        }
        if self.intercepts.len() != self.labels.len() {
            return Err(format!(
                "expected {} intercepts, found {}",
                self.labels.len(),
                self.intercepts.len()
            ));
        }
        for (term, weights) in &self.vocabulary {
            if weights.coef.len() != self.labels.len() {
                return Err(format!(
                    "term `{term}` has {} coefficients, expected {}",
                    weights.coef.len(),
                    self.labels.len()
                ));
            }
        }
        Ok(())
    }

    /// Score `text` and return the winning label.
    ///
    /// Shape mismatches in an unvalidated model surface as
    /// [`BotError::Inference`].
    pub fn predict(&self, text: &str) -> Result<&str> {
        let lower = text.to_lowercase();
        let mut by_term: HashMap<&str, (&TermWeights, f64)> = HashMap::new();
        for token in tokenize(&lower) {
            if let Some((term, weights)) = self.vocabulary.get_key_value(token) {
                by_term.entry(term.as_str()).or_insert((weights, 0.0)).1 += weights.idf;
            }
        }
        let mut features: Vec<(&TermWeights, f64)> = by_term.into_values().collect();

        if self.l2_normalize {
            let norm = features.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
            if norm > 0.0 {
                for (_, value) in &mut features {
                    *value /= norm;
                }
            }
        }

        let mut best: Option<(&str, f64)> = None;
        for (idx, intercept) in self.intercepts.iter().enumerate() {
            let label = self.labels.get(idx).ok_or_else(|| {
                BotError::Inference(format!("no label for intercept {idx}"))
            })?;
            let mut score = *intercept;
            for (weights, value) in &features {
                let coef = weights.coef.get(idx).ok_or_else(|| {
                    BotError::Inference(format!("missing coefficient for label `{label}`"))
                })?;
                score += coef * value;
            }
            if !score.is_finite() {
                return Err(BotError::Inference(format!(
                    "non-finite score for label `{label}`"
                )));
            }
            if best.is_none_or(|(_, top)| score > top) {
                best = Some((label.as_str(), score));
            }
        }

        best.map(|(label, _)| label)
            .ok_or_else(|| BotError::Inference("model has no labels".into()))
    }
}

/// Lowercased input → tokens of two or more word characters.
fn tokenize(lower: &str) -> impl Iterator<Item = &str> {
    lower
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
}

/// [`EmotionClassifier`] backed by a [`LinearModel`].
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    model: LinearModel,
}

impl LinearClassifier {
    /// Validate an in-memory model and wrap it.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::ArtifactLoad`] if the model fails validation, the
    /// same as [`LinearClassifier::from_file`].
    pub fn new(model: LinearModel) -> Result<Self> {
        model
            .validate()
            .map_err(|e| BotError::artifact_load(ARTIFACT, IN_MEMORY, e))?;
        Ok(Self { model })
    }

    /// Load and validate a model artifact from disk.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::ArtifactLoad`] if the file is missing, is not valid
    /// JSON, or fails validation.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| BotError::artifact_load(ARTIFACT, path, e))?;
        let model: LinearModel = serde_json::from_str(&content)
            .map_err(|e| BotError::artifact_load(ARTIFACT, path, e))?;
        model
            .validate()
            .map_err(|e| BotError::artifact_load(ARTIFACT, path, e))?;
        debug!(
            path = %path.display(),
            labels = model.labels.len(),
            terms = model.vocabulary.len(),
            "linear classifier loaded"
        );
        Ok(Self { model })
    }

    /// Labels this model can emit.
    pub fn labels(&self) -> &[String] {
        &self.model.labels
    }
}

#[async_trait]
impl EmotionClassifier for LinearClassifier {
    fn name(&self) -> &'static str {
        "linear"
    }

    async fn predict(&self, text: &str) -> Result<String> {
        self.model.predict(text).map(str::to_owned)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    const MODEL_JSON: &str = r#"{
        "labels": ["joy", "sadness", "anger"],
        "intercepts": [0.0, 0.1, -0.1],
        "vocabulary": {
            "happy": { "coef": [2.0, -1.0, -1.0] },
            "great": { "coef": [1.0, -0.5, -0.5] },
            "sad":   { "coef": [-1.0, 2.0, -1.0] },
            "cry":   { "coef": [-0.5, 1.5, 0.0], "idf": 2.0 },
            "angry": { "coef": [-1.0, -1.0, 2.5] }
        }
    }"#;

    fn model() -> LinearModel {
        serde_json::from_str(MODEL_JSON).unwrap()
    }

    #[test]
    fn predicts_highest_scoring_label() {
        let m = model();
        assert_eq!(m.predict("I am so happy today").unwrap(), "joy");
        assert_eq!(m.predict("I feel sad and want to cry").unwrap(), "sadness");
        assert_eq!(m.predict("ANGRY!!").unwrap(), "anger");
    }

    #[test]
    fn empty_text_scores_intercepts_only() {
        assert_eq!(model().predict("").unwrap(), "sadness");
    }

    #[test]
    fn ties_go_to_first_label() {
        let m: LinearModel = serde_json::from_str(
            r#"{"labels":["a","b"],"intercepts":[0.5,0.5],"vocabulary":{}}"#,
        )
        .unwrap();
        assert_eq!(m.predict("anything").unwrap(), "a");
    }

    #[test]
    fn repeated_terms_accumulate() {
        // One "sad" vs two "happy": joy wins on counts.
        assert_eq!(model().predict("happy happy sad").unwrap(), "joy");
    }

    #[test]
    fn l2_normalisation_keeps_ranking_for_single_term() {
        let mut m = model();
        m.l2_normalize = true;
        assert_eq!(m.predict("happy happy happy").unwrap(), "joy");
    }

    #[test]
    fn single_character_tokens_are_ignored() {
        let m: LinearModel = serde_json::from_str(
            r#"{"labels":["a","b"],"intercepts":[1.0,0.0],"vocabulary":{"x":{"coef":[0.0,9.0]}}}"#,
        )
        .unwrap();
        assert_eq!(m.predict("x x x").unwrap(), "a");
    }

    #[test]
    fn non_finite_score_is_inference_error() {
        let m: LinearModel = serde_json::from_str(
            r#"{"labels":["a"],"intercepts":[0.0],"vocabulary":{"boom":{"coef":[1e308],"idf":1e308}}}"#,
        )
        .unwrap();
        assert!(matches!(m.predict("boom"), Err(BotError::Inference(_))));
    }

    #[test]
    fn validation_rejects_mismatched_shapes() {
        let mut m = model();
        m.intercepts.pop();
        assert!(m.validate().is_err());

        let mut m = model();
        m.vocabulary.get_mut("happy").unwrap().coef.push(0.0);
        assert!(m.validate().is_err());

        let m: LinearModel =
            serde_json::from_str(r#"{"labels":[],"intercepts":[],"vocabulary":{}}"#).unwrap();
        assert!(m.validate().is_err());
    }

    #[test]
    fn unvalidated_short_coef_is_inference_error() {
        let mut m = model();
        m.vocabulary.get_mut("happy").unwrap().coef.truncate(1);
        assert!(matches!(m.predict("happy"), Err(BotError::Inference(_))));
    }

    #[test]
    fn unvalidated_extra_intercept_is_inference_error() {
        let mut m = model();
        m.intercepts.push(0.0);
        assert!(matches!(m.predict("happy"), Err(BotError::Inference(_))));
    }

    #[test]
    fn new_rejects_invalid_model_as_artifact_error() {
        let mut m = model();
        m.intercepts.pop();
        let err = LinearClassifier::new(m).unwrap_err();
        assert!(matches!(err, BotError::ArtifactLoad { artifact: "classifier model", .. }));
    }

    #[test]
    fn from_file_loads_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, MODEL_JSON).unwrap();
        let classifier = LinearClassifier::from_file(&path).unwrap();
        assert_eq!(classifier.labels().len(), 3);
    }

    #[test]
    fn from_file_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            LinearClassifier::from_file(&path),
            Err(BotError::ArtifactLoad { .. })
        ));
    }

    #[tokio::test]
    async fn trait_predict_returns_owned_label() {
        let classifier = LinearClassifier::new(model()).unwrap();
        assert_eq!(classifier.name(), "linear");
        assert_eq!(classifier.predict("great and happy").await.unwrap(), "joy");
    }
}
