//! Session-scoped mutable state, threaded explicitly through the loop,
//! the selector, and the gateway. No module-level globals.

use super::ownership::OwnershipRegistry;
use super::roles::SkillLevel;
use std::collections::HashSet;

/// Everything the session mutates between turns: the ownership registry,
/// the current skill level, and the duplicate-detection set. Touched only
/// on the single control thread, between turns.
#[derive(Debug, Default)]
pub struct SessionState {
    pub registry: OwnershipRegistry,
    pub skill: SkillLevel,
    seen: HashSet<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this exact text has already been accepted this session.
    pub fn already_seen(&self, text: &str) -> bool {
        self.seen.contains(text)
    }

    /// Record text as seen. Returns false if it was already present.
    pub fn mark_seen(&mut self, text: &str) -> bool {
        self.seen.insert(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seen_set_detects_repeats() {
        let mut state = SessionState::new();
        assert!(!state.already_seen("water on the fire"));
        assert!(state.mark_seen("water on the fire"));
        assert!(state.already_seen("water on the fire"));
        assert!(!state.mark_seen("water on the fire"));
    }
}
