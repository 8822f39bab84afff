//! Request decision pipeline.
//!
//! Each request runs one pass through the stages below; the first stage that
//! answers wins and later stages never run:
//!
//! 0. **Model gate**: no classifier loaded → [`ClassificationError::ModelUnavailable`]
//!    for every request, greetings included.
//! 1. **Greeting** → fixed greeting reply.
//! 2. **FAQ** → stored answer of the first matching entry.
//! 3. **Crisis** → fixed crisis-support reply; the classifier is not called.
//! 4. **Classifier** → label resolved through the lexicon.
//!
//! The pipeline holds only read-only tables and is shared across requests.

pub mod compose;

use std::sync::Arc;
use std::time::Duration;
use tracing::error;

use crate::classifier::{ClassificationError, EmotionClassifier};
use crate::faq::FaqTable;
use crate::greeting::match_greeting;
use crate::lexicon::EmotionLexicon;
use crate::sensitivity::is_crisis;

pub use compose::Reply;

/// Default upper bound on a classifier call.
pub const DEFAULT_CLASSIFY_TIMEOUT: Duration = Duration::from_secs(5);

/// Which stage produced a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Greeting matcher.
    Greeting,
    /// FAQ matcher.
    Faq,
    /// Sensitivity override.
    Crisis,
    /// Classifier + composer.
    Classifier,
}

impl Route {
    /// Stable name for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Greeting => "greeting",
            Self::Faq => "faq",
            Self::Crisis => "crisis",
            Self::Classifier => "classifier",
        }
    }
}

/// A reply plus the stage that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Answering stage.
    pub route: Route,
    /// Reply to send.
    pub reply: Reply,
}

/// Shared, immutable request handler context.
pub struct ChatPipeline {
    classifier: Option<Arc<dyn EmotionClassifier>>,
    faq: FaqTable,
    lexicon: EmotionLexicon,
    classify_timeout: Duration,
}

impl ChatPipeline {
    /// Build a pipeline. `classifier` is `None` when the model failed to load.
    pub fn new(classifier: Option<Arc<dyn EmotionClassifier>>, faq: FaqTable) -> Self {
        Self {
            classifier,
            faq,
            lexicon: EmotionLexicon::builtin(),
            classify_timeout: DEFAULT_CLASSIFY_TIMEOUT,
        }
    }

    /// Override the classifier timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.classify_timeout = timeout;
        self
    }

    /// Whether a classifier is available.
    pub fn is_model_loaded(&self) -> bool {
        self.classifier.is_some()
    }

    /// The loaded FAQ table.
    pub fn faq(&self) -> &FaqTable {
        &self.faq
    }

    /// Run `text` through the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`ClassificationError::ModelUnavailable`] when no classifier is
    /// loaded, and [`ClassificationError::PredictionFailed`] when the
    /// classifier errors or exceeds the timeout.
    pub async fn respond(&self, text: &str) -> Result<Decision, ClassificationError> {
        let Some(classifier) = &self.classifier else {
            return Err(ClassificationError::ModelUnavailable);
        };

        if match_greeting(text).is_some() {
            return Ok(Decision {
                route: Route::Greeting,
                reply: compose::greeting(),
            });
        }

        if let Some(answer) = self.faq.find_answer(text) {
            return Ok(Decision {
                route: Route::Faq,
                reply: compose::faq(answer),
            });
        }

        if is_crisis(text) {
            return Ok(Decision {
                route: Route::Crisis,
                reply: compose::crisis(&self.lexicon),
            });
        }

        let label = match tokio::time::timeout(self.classify_timeout, classifier.predict(text)).await
        {
            Ok(Ok(label)) => label,
            Ok(Err(e)) => {
                error!(classifier = classifier.name(), error = %e, "prediction failed");
                return Err(ClassificationError::PredictionFailed);
            }
            Err(_) => {
                error!(
                    classifier = classifier.name(),
                    timeout_ms = self.classify_timeout.as_millis() as u64,
                    "prediction timed out"
                );
                return Err(ClassificationError::PredictionFailed);
            }
        };

        Ok(Decision {
            route: Route::Classifier,
            reply: compose::from_label(&self.lexicon, label),
        })
    }
}
