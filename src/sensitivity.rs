//! Sensitivity override for self-harm indicators.
//!
//! A hit replaces normal classification with a fixed crisis-support reply.

/// Lowercased substrings that trigger the override.
pub const CRISIS_KEYWORDS: &[&str] = &["suicidal"];

/// Emoji sent with the crisis-support reply.
pub const CRISIS_EMOJI: &str = "😔";

/// Whether `text` contains a self-harm indicator (case-insensitive).
pub fn is_crisis(text: &str) -> bool {
    let lower = text.to_lowercase();
    CRISIS_KEYWORDS.iter().any(|kw| lower.contains(kw))
}
