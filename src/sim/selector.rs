//! Deterministic next-actor selection.
//!
//! Pure decision function over (history, state, roster). Precedence,
//! highest first: named-reference override from the previous utterance,
//! fairness (liveness guarantee), chain-of-command continuation, and a
//! no-immediate-repeat filter. A human-owned role is never surfaced as its
//! automated identity; it resolves to the operator proxy.

use super::actors::ActorId;
use super::footer;
use super::history::History;
use super::ownership::OwnershipSnapshot;
use super::roles::{Rank, Role};
use super::state::SessionState;
use super::SimError;

pub struct TurnSelector {
    /// Fairness window K: a roster member silent for K participant turns
    /// is preferred over chain continuation.
    pub fairness_window: usize,
}

impl Default for TurnSelector {
    fn default() -> Self {
        Self { fairness_window: 7 }
    }
}

impl TurnSelector {
    pub fn new(fairness_window: usize) -> Self {
        Self { fairness_window }
    }

    /// Choose who acts next.
    pub fn select(
        &self,
        history: &History,
        state: &SessionState,
        roster: &[Role],
    ) -> Result<ActorId, SimError> {
        if roster.is_empty() {
            return Err(SimError::EmptyRoster);
        }

        // The latest footer found scanning backward is authoritative; the
        // live registry is its fallback mirror when no footer exists yet.
        let snapshot = latest_footer_snapshot(history)
            .unwrap_or_else(|| state.registry.snapshot());
        let resolve = |role: Role| -> ActorId {
            if snapshot.is_human(role) {
                ActorId::Human
            } else {
                ActorId::Agent(role)
            }
        };

        // Session opening is forced: operator first (to declare a role),
        // then the top of the chain.
        match history.participant_turns() {
            0 => return Ok(ActorId::Human),
            1 => return Ok(resolve(top_of_chain(roster))),
            _ => {}
        }

        let candidate = self
            .named_reference(history, roster)
            .or_else(|| self.overdue_role(history, roster))
            .or_else(|| chain_continuation(history, roster))
            .unwrap_or_else(|| top_of_chain(roster));

        Ok(self.avoid_repeat(resolve(candidate), history, roster, &snapshot))
    }

    /// Precedence (a): the previous utterance names an addressee.
    ///
    /// Works on cleaned text: footers contain every role name and must
    /// not trigger the override. The speaker's own role is not an
    /// addressee.
    fn named_reference(&self, history: &History, roster: &[Role]) -> Option<Role> {
        let last = history.last()?;
        Role::mentions(&last.cleaned)
            .into_iter()
            .find(|&role| roster.contains(&role) && last.acting_role != Some(role))
    }

    /// Precedence (c): a roster member silent for the whole fairness
    /// window. Only meaningful once the window is full.
    fn overdue_role(&self, history: &History, roster: &[Role]) -> Option<Role> {
        if history.participant_turns() < self.fairness_window {
            return None;
        }
        let recent = history.recent_acting_roles(self.fairness_window);
        roster
            .iter()
            .copied()
            .find(|role| !recent.contains(&Some(*role)))
    }

    /// Precedence (d): no actor twice in direct succession, unless it is
    /// the sole eligible actor. The substitute is the least recently heard
    /// eligible identity.
    fn avoid_repeat(
        &self,
        candidate: ActorId,
        history: &History,
        roster: &[Role],
        snapshot: &OwnershipSnapshot,
    ) -> ActorId {
        let last_actor = match history.last_participant() {
            Some(u) => u.speaker,
            None => return candidate,
        };
        if candidate != last_actor {
            return candidate;
        }

        let recent: Vec<Option<Role>> = history.recent_acting_roles(history.len());
        let mut alternatives: Vec<(usize, ActorId)> = roster
            .iter()
            .filter_map(|&role| {
                let id = if snapshot.is_human(role) {
                    ActorId::Human
                } else {
                    ActorId::Agent(role)
                };
                if id == last_actor {
                    return None;
                }
                // Turns since this role last spoke; never spoken sorts last.
                let age = recent
                    .iter()
                    .position(|&r| r == Some(role))
                    .unwrap_or(usize::MAX);
                Some((age, id))
            })
            .collect();
        alternatives.sort_by_key(|&(age, _)| std::cmp::Reverse(age));
        alternatives
            .first()
            .map(|&(_, id)| id)
            .unwrap_or(candidate)
    }
}

/// Scan history backward for the most recent embedded ownership footer.
fn latest_footer_snapshot(history: &History) -> Option<OwnershipSnapshot> {
    history
        .iter()
        .rev()
        .find_map(|u| footer::parse(&u.raw))
        .map(|f| f.owners)
}

fn top_of_chain(roster: &[Role]) -> Role {
    roster
        .iter()
        .copied()
        .find(|r| r.rank() == Rank::Strategic)
        .unwrap_or(roster[0])
}

/// Precedence (b): chain-of-command continuation.
/// Strategy flows down (Chief→Captain), tasking flows to the front line
/// (Captain→Jack/Tom, least recently heard first), reports flow back up
/// (front line→Captain). An utterance with no acting role falls to the
/// top of the chain.
fn chain_continuation(history: &History, roster: &[Role]) -> Option<Role> {
    let last = history.last_participant()?;
    let next = match last.acting_role {
        Some(Role::Chief) => Role::Captain,
        Some(Role::Captain) => least_recent_front_line(history, roster)?,
        Some(Role::Jack) | Some(Role::Tom) => Role::Captain,
        None => top_of_chain(roster),
    };
    roster.contains(&next).then_some(next)
}

fn least_recent_front_line(history: &History, roster: &[Role]) -> Option<Role> {
    let recent = history.recent_acting_roles(history.len());
    roster
        .iter()
        .copied()
        .filter(|r| r.rank() == Rank::FrontLine)
        .max_by_key(|&role| {
            recent
                .iter()
                .position(|&r| r == Some(role))
                .unwrap_or(usize::MAX)
        })
}
