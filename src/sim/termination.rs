//! Session termination detection.
//!
//! Substring sentinel matching is brittle (any role uttering the phrase
//! incidentally ends the session) but is the observed contract; it stays
//! the default behind a pluggable predicate so a structured signal can
//! replace it without touching the loop.

/// Decides whether an accepted utterance ends the session.
pub trait TerminationDetector: Send {
    /// `Some(reason)` if the session should end after this utterance.
    fn check(&self, text: &str) -> Option<String>;
}

/// Default detector: fixed literal phrase, substring match anywhere in the
/// utterance.
pub struct SentinelDetector {
    phrase: String,
}

impl SentinelDetector {
    pub fn new(phrase: impl Into<String>) -> Self {
        Self {
            phrase: phrase.into(),
        }
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }
}

impl TerminationDetector for SentinelDetector {
    fn check(&self, text: &str) -> Option<String> {
        text.contains(&self.phrase)
            .then(|| format!("sentinel matched: {}", self.phrase))
    }
}
