//! Emotion lexicon: canned supportive responses and emoji per emotion label.
//!
//! Lookups are total: a label missing from the knowledge base resolves to the
//! `default` entry, and a label missing from the emoji table resolves to
//! [`DEFAULT_EMOJI`]. The tables are built once and shared read-only.

use std::collections::HashMap;

/// Knowledge-base key used when a label has no entry of its own.
pub const DEFAULT_LABEL: &str = "default";

/// Knowledge-base key for the crisis-support override.
pub const SUICIDAL_LABEL: &str = "suicidal";

/// Emoji returned for labels absent from the emoji table.
pub const DEFAULT_EMOJI: &str = "😊";

// ── Tables ──────────────────────────────────────────────────────────────

/// (label, response)
const KNOWLEDGE_BASE: &[(&str, &str)] = &[
    (
        "joy",
        "It's wonderful to hear that you're feeling joyful! 😊 Consider sharing your happiness with others!",
    ),
    (
        "sadness",
        "I'm really sorry you're feeling this way. 😔 It's important to talk about your feelings; I'm here to listen.",
    ),
    (
        "neutral",
        "It sounds like you’re in a neutral state. 😊 Sometimes it's nice to just take a moment to breathe and reflect.",
    ),
    (
        "anxiety",
        "It seems like you might be feeling anxious. 😟 Have you tried any relaxation techniques? I'm here to help.",
    ),
    (
        "anger",
        "It sounds like you’re feeling frustrated or angry. 😠 It's okay to express that; what do you think triggered this feeling?",
    ),
    (
        DEFAULT_LABEL,
        "I'm here to help with anything you need. 😊 How can I assist you further?",
    ),
    (
        SUICIDAL_LABEL,
        "I'm really sorry you're feeling this way. It's important to talk to someone who can provide the right support.",
    ),
    (
        "worry",
        "It sounds like you might be feeling worried. 😟 Would you like to share what's on your mind?",
    ),
    (
        "love",
        "It sounds like you’re feeling affectionate or loving. ❤️ It's great to express those feelings!",
    ),
    (
        "hate",
        "It seems like you might be feeling frustrated or angry. 😡 It's important to address those feelings positively.",
    ),
    (
        "fun",
        "It sounds like you’re having fun! 😄 What’s making you feel good today?",
    ),
    (
        "relief",
        "It sounds like you're feeling relieved. 😌 I'm glad you feel better now!",
    ),
    (
        "empty",
        "It seems like you’re feeling empty or disconnected. 😶 I'm here if you want to talk.",
    ),
    (
        "enthusiasm",
        "You're feeling enthusiastic! 😃 That's awesome! What are you excited about?",
    ),
    (
        "boredom",
        "It seems like you're feeling bored. 😴 Maybe trying something new could help!",
    ),
];

/// (label, emoji)
const EMOJI_TABLE: &[(&str, &str)] = &[
    ("anger", "😠"),
    ("disgust", "🤮"),
    ("fear", "😨😱"),
    ("happy", "🤗"),
    ("joy", "😂"),
    ("neutral", "😐"),
    ("sad", "😔"),
    ("sadness", "😔"),
    ("shame", "😳"),
    ("surprise", "😮"),
    ("worry", "😟"),
    ("love", "❤️"),
    ("hate", "😡"),
    ("fun", "😄"),
    ("relief", "😌"),
    ("empty", "😶"),
    ("enthusiasm", "😃"),
    ("boredom", "😴"),
];

/// Immutable label → response / emoji lookup.
#[derive(Debug, Clone)]
pub struct EmotionLexicon {
    responses: HashMap<&'static str, &'static str>,
    emojis: HashMap<&'static str, &'static str>,
}

impl Default for EmotionLexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

impl EmotionLexicon {
    /// Build the lexicon from the built-in tables.
    pub fn builtin() -> Self {
        Self {
            responses: KNOWLEDGE_BASE.iter().copied().collect(),
            emojis: EMOJI_TABLE.iter().copied().collect(),
        }
    }

    /// Response text for `label`, or the `default` entry when unknown.
    pub fn response_for(&self, label: &str) -> &'static str {
        self.responses
            .get(label)
            .or_else(|| self.responses.get(DEFAULT_LABEL))
            .copied()
            .unwrap_or_default()
    }

    /// Emoji for `label`, or [`DEFAULT_EMOJI`] when unknown.
    pub fn emoji_for(&self, label: &str) -> &'static str {
        self.emojis.get(label).copied().unwrap_or(DEFAULT_EMOJI)
    }

    /// Whether `label` has its own knowledge-base entry.
    pub fn knows(&self, label: &str) -> bool {
        self.responses.contains_key(label)
    }
}
