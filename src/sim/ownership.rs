//! Role ownership: who controls each role right now.
//!
//! Mutated only by operator commands through the input gateway. Invariant:
//! at most one role is human-owned at any time; switching to a new role
//! atomically releases every other role back to automation.

use super::roles::Role;
use std::collections::BTreeMap;

/// Whether a role is driven by an automated actor or the live operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Controller {
    #[default]
    Automated,
    Human,
}

/// Authoritative mapping of role → controller.
#[derive(Debug, Clone)]
pub struct OwnershipRegistry {
    owners: BTreeMap<Role, Controller>,
}

impl Default for OwnershipRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl OwnershipRegistry {
    /// Fresh registry: every role automated.
    pub fn new() -> Self {
        Self {
            owners: Role::ALL
                .iter()
                .map(|&r| (r, Controller::Automated))
                .collect(),
        }
    }

    /// Atomically reset every role to automated, then hand `role` to the
    /// human. Idempotent: repeating the same call is a no-op transition.
    pub fn set_human_owner(&mut self, role: Role) {
        for controller in self.owners.values_mut() {
            *controller = Controller::Automated;
        }
        self.owners.insert(role, Controller::Human);
    }

    /// Release every role back to automation.
    pub fn release_all(&mut self) {
        for controller in self.owners.values_mut() {
            *controller = Controller::Automated;
        }
    }

    pub fn controller(&self, role: Role) -> Controller {
        self.owners.get(&role).copied().unwrap_or_default()
    }

    /// The role the human currently owns, if any.
    pub fn human_owned(&self) -> Option<Role> {
        self.owners
            .iter()
            .find(|(_, &c)| c == Controller::Human)
            .map(|(&r, _)| r)
    }

    /// Immutable copy for embedding in an utterance footer or for the
    /// turn selector.
    pub fn snapshot(&self) -> OwnershipSnapshot {
        OwnershipSnapshot {
            owners: self.owners.clone(),
        }
    }
}

/// Point-in-time copy of the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnershipSnapshot {
    owners: BTreeMap<Role, Controller>,
}

impl OwnershipSnapshot {
    pub fn controller(&self, role: Role) -> Controller {
        self.owners.get(&role).copied().unwrap_or_default()
    }

    pub fn is_human(&self, role: Role) -> bool {
        self.controller(role) == Controller::Human
    }

    pub fn human_owned(&self) -> Option<Role> {
        self.owners
            .iter()
            .find(|(_, &c)| c == Controller::Human)
            .map(|(&r, _)| r)
    }

    /// Roles whose automated identity is blocked from selection. Identical
    /// to the human-owned set; kept as one concept.
    pub fn blocked(&self) -> Vec<Role> {
        self.owners
            .iter()
            .filter(|(_, &c)| c == Controller::Human)
            .map(|(&r, _)| r)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, Controller)> + '_ {
        self.owners.iter().map(|(&r, &c)| (r, c))
    }

    /// Rebuild a snapshot from `(role, controller)` pairs, for footer
    /// parsing. Missing roles default to automated.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Role, Controller)>) -> Self {
        let mut owners: BTreeMap<Role, Controller> = Role::ALL
            .iter()
            .map(|&r| (r, Controller::Automated))
            .collect();
        for (role, controller) in pairs {
            owners.insert(role, controller);
        }
        Self { owners }
    }
}
