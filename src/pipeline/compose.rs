//! Response composer: turns a label or a short-circuit hit into a [`Reply`].

use serde::{Deserialize, Serialize};

use crate::faq::FAQ_EMOJI;
use crate::greeting::{GREETING_EMOJI, GREETING_REPLY};
use crate::lexicon::{EmotionLexicon, SUICIDAL_LABEL};
use crate::sensitivity::CRISIS_EMOJI;

/// Emotion reported for greeting and FAQ replies.
pub const SHORT_CIRCUIT_EMOTION: &str = "neutral";

/// Body of a successful `/predict` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    /// Emotion label, verbatim from the classifier when it ran.
    pub emotion: String,
    /// Response text shown to the user.
    pub response: String,
    /// Emoji shown next to the response.
    pub emoji: String,
}

/// Resolve a classifier label through the lexicon.
///
/// Unknown labels get the default response and emoji; `emotion` keeps the
/// label as given.
pub fn from_label(lexicon: &EmotionLexicon, label: String) -> Reply {
    Reply {
        response: lexicon.response_for(&label).to_owned(),
        emoji: lexicon.emoji_for(&label).to_owned(),
        emotion: label,
    }
}

/// Fixed greeting reply.
pub fn greeting() -> Reply {
    Reply {
        emotion: SHORT_CIRCUIT_EMOTION.to_owned(),
        response: GREETING_REPLY.to_owned(),
        emoji: GREETING_EMOJI.to_owned(),
    }
}

/// FAQ answer reply.
pub fn faq(answer: &str) -> Reply {
    Reply {
        emotion: SHORT_CIRCUIT_EMOTION.to_owned(),
        response: answer.to_owned(),
        emoji: FAQ_EMOJI.to_owned(),
    }
}

/// Crisis-support reply.
pub fn crisis(lexicon: &EmotionLexicon) -> Reply {
    Reply {
        emotion: SUICIDAL_LABEL.to_owned(),
        response: lexicon.response_for(SUICIDAL_LABEL).to_owned(),
        emoji: CRISIS_EMOJI.to_owned(),
    }
}
