//! Startup: load the classifier and FAQ table once and build the pipeline.
//!
//! Load failures never abort startup. A missing model leaves the service in
//! degraded mode (every `/predict` answers with a 500); a missing FAQ table
//! is replaced by an empty one.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

use crate::classifier::{self, EmotionClassifier};
use crate::config::BotConfig;
use crate::faq::FaqTable;
use crate::pipeline::ChatPipeline;

/// Load the configured classifier, logging and returning `None` on failure.
pub fn load_classifier(config: &BotConfig) -> Option<Arc<dyn EmotionClassifier>> {
    match classifier::load(&config.classifier) {
        Ok(classifier) => {
            info!(backend = classifier.name(), "emotion classifier ready");
            Some(classifier)
        }
        Err(e) => {
            error!(error = %e, "classifier unavailable; /predict will return 500 until restart");
            None
        }
    }
}

/// Load the FAQ table, falling back to an empty table on failure.
pub fn load_faq(config: &BotConfig) -> FaqTable {
    match FaqTable::load(&config.faq.path, config.faq.encoding) {
        Ok(table) => {
            info!(entries = table.len(), "FAQ table ready");
            table
        }
        Err(e) => {
            warn!(error = %e, "FAQ table unavailable; continuing without FAQ answers");
            FaqTable::default()
        }
    }
}

/// Build the shared request pipeline from `config`.
pub fn build_pipeline(config: &BotConfig) -> ChatPipeline {
    let started = Instant::now();
    let classifier = load_classifier(config);
    let faq = load_faq(config);
    let pipeline = ChatPipeline::new(classifier, faq)
        .with_timeout(Duration::from_millis(config.classifier.timeout_ms));
    info!(
        model_loaded = pipeline.is_model_loaded(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "startup complete"
    );
    pipeline
}
