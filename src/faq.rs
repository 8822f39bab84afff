//! FAQ table: ordered question/answer pairs loaded once at startup.
//!
//! The source is a CSV with a header row naming `Questions` and `Answers`
//! columns. It is usually written in ISO-8859-1, so UTF-8 punctuation such as
//! non-breaking spaces shows up as `Â` + U+00A0 after decoding; answers are
//! cleaned of those artefacts at load time.
//!
//! # Matching
//!
//! The stored question is the haystack and the user text is the needle: an
//! entry matches when its lowercased question contains the lowercased input.
//! The first matching entry in file order wins.

use serde::Deserialize;
use std::path::Path;
use tracing::debug;

use crate::config::FaqEncoding;
use crate::error::{BotError, Result};

/// Emoji sent with FAQ answers.
pub const FAQ_EMOJI: &str = "🤔";

const ARTIFACT: &str = "FAQ table";

const REQUIRED_COLUMNS: [&str; 2] = ["Questions", "Answers"];

/// A single stored question pattern and its answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaqEntry {
    /// Question pattern as stored in the source.
    pub question: String,
    /// Cleaned answer text.
    pub answer: String,
    question_lower: String,
}

impl FaqEntry {
    /// Build an entry, cleaning the answer text.
    pub fn new(question: impl Into<String>, answer: &str) -> Self {
        let question = question.into();
        let question_lower = question.to_lowercase();
        Self {
            question,
            answer: clean_answer(answer),
            question_lower,
        }
    }
}

/// Raw CSV row. Missing cells deserialize as `None`.
#[derive(Debug, Deserialize)]
struct FaqRecord {
    #[serde(rename = "Questions")]
    question: Option<String>,
    #[serde(rename = "Answers")]
    answer: Option<String>,
}

/// Immutable, ordered FAQ table.
#[derive(Debug, Clone, Default)]
pub struct FaqTable {
    entries: Vec<FaqEntry>,
}

impl FaqTable {
    /// Build a table from entries, preserving their order.
    pub fn from_entries(entries: Vec<FaqEntry>) -> Self {
        Self { entries }
    }

    /// Load the table from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns [`BotError::ArtifactLoad`] if the file is missing, cannot be
    /// decoded with `encoding`, or is not a CSV with the expected columns.
    pub fn load(path: &Path, encoding: FaqEncoding) -> Result<Self> {
        let load_err = |e: String| BotError::artifact_load(ARTIFACT, path, e);
        let bytes = std::fs::read(path).map_err(|e| load_err(e.to_string()))?;
        let text = decode(&bytes, encoding).map_err(load_err)?;
        let table = Self::parse_csv(&text).map_err(load_err)?;
        debug!(path = %path.display(), entries = table.len(), "FAQ table loaded");
        Ok(table)
    }

    /// Parse already-decoded CSV text.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem if a required column is missing
    /// or a row is malformed.
    pub fn parse_csv(text: &str) -> std::result::Result<Self, String> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers = reader.headers().map_err(|e| e.to_string())?;
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(format!("missing `{column}` column"));
            }
        }

        let mut entries = Vec::new();
        for record in reader.deserialize::<FaqRecord>() {
            let record = record.map_err(|e| e.to_string())?;
            entries.push(FaqEntry::new(
                record.question.unwrap_or_default(),
                record.answer.as_deref().unwrap_or_default(),
            ));
        }
        Ok(Self { entries })
    }

    /// Answer of the first entry whose question contains `text`.
    ///
    /// Blank input never matches. A first match with an empty answer yields
    /// `None` rather than falling through to later entries.
    pub fn find_answer(&self, text: &str) -> Option<&str> {
        if text.trim().is_empty() {
            return None;
        }
        let needle = text.to_lowercase();
        self.entries
            .iter()
            .find(|entry| entry.question_lower.contains(&needle))
            .map(|entry| entry.answer.as_str())
            .filter(|answer| !answer.is_empty())
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in load order.
    pub fn entries(&self) -> &[FaqEntry] {
        &self.entries
    }
}

/// Strip legacy mis-encoding artefacts from an answer.
pub fn clean_answer(answer: &str) -> String {
    answer.replace('Â', "").replace('\u{00A0}', " ")
}

fn decode(bytes: &[u8], encoding: FaqEncoding) -> std::result::Result<String, String> {
    match encoding {
        FaqEncoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        FaqEncoding::Utf8 => String::from_utf8(bytes.to_vec()).map_err(|e| e.to_string()),
    }
}
