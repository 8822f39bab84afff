//! Greeting matcher.
//!
//! Matching is case-insensitive substring containment with no word-boundary
//! check, so any text containing `"hi"` (including `"this"` or `"while"`)
//! counts as a greeting.

/// Phrases that mark a message as a greeting.
pub const GREETINGS: &[&str] = &[
    "hi",
    "hello",
    "hey",
    "good morning",
    "good afternoon",
    "good evening",
];

/// Fixed reply for greetings.
pub const GREETING_REPLY: &str = "Hello! How can I assist you today? 😊";

/// Emoji sent with [`GREETING_REPLY`].
pub const GREETING_EMOJI: &str = "😊";

/// Returns [`GREETING_REPLY`] if `text` contains any greeting phrase.
pub fn match_greeting(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    GREETINGS
        .iter()
        .any(|greeting| lower.contains(greeting))
        .then_some(GREETING_REPLY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_greetings_match() {
        for &greeting in GREETINGS {
            assert_eq!(match_greeting(greeting), Some(GREETING_REPLY), "{greeting}");
        }
    }

    #[test]
    fn case_insensitive() {
        assert!(match_greeting("HELLO there").is_some());
        assert!(match_greeting("Good Evening, bot").is_some());
    }

    #[test]
    fn embedded_substring_matches() {
        // No word boundaries: "this" contains "hi", "they" contains "hey".
        assert!(match_greeting("this is hard").is_some());
        assert!(match_greeting("they left").is_some());
    }

    #[test]
    fn unrelated_text_does_not_match() {
        assert!(match_greeting("I feel sad today").is_none());
        assert!(match_greeting("").is_none());
    }
}
