//! Kindred: emotion-aware support chatbot backend.
//!
//! A single HTTP endpoint accepts free text and answers with a supportive
//! reply and an emoji. Each request takes one pass through a decision
//! pipeline:
//!
//! Model gate → Greeting → FAQ → Crisis override → Classifier → Composer
//!
//! # Architecture
//!
//! - **Lexicon**: static label → response / emoji tables
//! - **Greeting / FAQ / Sensitivity**: short-circuit matchers
//! - **Classifier**: opaque text → label capability (`linear` artifact or `remote` service)
//! - **Pipeline**: precedence and fallback rules
//! - **Server**: axum router around the pipeline
//!
//! Artifacts are loaded once by [`startup::build_pipeline`]; load failures
//! degrade the service instead of stopping it.

pub mod classifier;
pub mod config;
pub mod error;
pub mod faq;
pub mod greeting;
pub mod lexicon;
pub mod pipeline;
pub mod sensitivity;
pub mod server;
pub mod startup;

pub use classifier::{ClassificationError, EmotionClassifier};
pub use config::BotConfig;
pub use error::{BotError, Result};
pub use pipeline::{ChatPipeline, Decision, Reply, Route};
pub use server::ChatServer;
