//! The session transcript: an append-only sequence of utterances.

use super::actors::ActorId;
use super::roles::Role;

/// One accepted (or absorbed-duplicate) entry in the transcript. Never
/// mutated after creation.
#[derive(Debug, Clone)]
pub struct Utterance {
    pub speaker: ActorId,
    /// The role this utterance counts as: the role itself for automated
    /// actors, the human-owned role for the operator (captured at append
    /// time), none for the dispatch briefing or an unassigned operator.
    pub acting_role: Option<Role>,
    /// Text as produced, footer lines included.
    pub raw: String,
    /// Text with footer lines stripped; what evaluation and printing see.
    pub cleaned: String,
}

/// Ordered, append-only sequence of utterances.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<Utterance>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, utterance: Utterance) {
        self.entries.push(utterance);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&Utterance> {
        self.entries.last()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Utterance> {
        self.entries.iter()
    }

    /// Number of participant turns taken (the dispatch briefing is not a
    /// turn).
    pub fn participant_turns(&self) -> usize {
        self.entries
            .iter()
            .filter(|u| u.speaker != ActorId::Dispatch)
            .count()
    }

    /// The most recent participant utterance, if any.
    pub fn last_participant(&self) -> Option<&Utterance> {
        self.entries
            .iter()
            .rev()
            .find(|u| u.speaker != ActorId::Dispatch)
    }

    /// Acting roles of the last `window` participant turns, most recent
    /// first.
    pub fn recent_acting_roles(&self, window: usize) -> Vec<Option<Role>> {
        self.entries
            .iter()
            .rev()
            .filter(|u| u.speaker != ActorId::Dispatch)
            .take(window)
            .map(|u| u.acting_role)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utter(speaker: ActorId, acting_role: Option<Role>, text: &str) -> Utterance {
        Utterance {
            speaker,
            acting_role,
            raw: text.to_string(),
            cleaned: text.to_string(),
        }
    }

    #[test]
    fn briefing_is_not_a_participant_turn() {
        let mut history = History::new();
        history.push(utter(ActorId::Dispatch, None, "Structure fire, 15th floor."));
        assert_eq!(history.participant_turns(), 0);
        assert!(history.last_participant().is_none());

        history.push(utter(ActorId::Agent(Role::Chief), Some(Role::Chief), "Copy."));
        assert_eq!(history.participant_turns(), 1);
        assert_eq!(
            history.last_participant().unwrap().speaker,
            ActorId::Agent(Role::Chief)
        );
    }

    #[test]
    fn recent_acting_roles_are_most_recent_first() {
        let mut history = History::new();
        history.push(utter(ActorId::Dispatch, None, "briefing"));
        history.push(utter(ActorId::Agent(Role::Chief), Some(Role::Chief), "a"));
        history.push(utter(ActorId::Agent(Role::Captain), Some(Role::Captain), "b"));
        history.push(utter(ActorId::Human, Some(Role::Jack), "c"));

        let recent = history.recent_acting_roles(2);
        assert_eq!(recent, vec![Some(Role::Jack), Some(Role::Captain)]);
    }
}
