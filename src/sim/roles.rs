//! The crew roster and skill levels.
//!
//! Both enums carry closed synonym tables so operator input is resolved by
//! one auditable case-insensitive matcher instead of ad hoc string probing.

/// A fixed identity in the simulation roster. Immutable for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    /// Bob, strategic incident commander.
    Chief,
    /// Steve, tactical commander who turns strategy into orders.
    Captain,
    /// Jack, front-line attack specialist.
    Jack,
    /// Tom, front-line technical specialist.
    Tom,
}

/// Position in the chain of command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rank {
    Strategic,
    Tactical,
    FrontLine,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Chief, Role::Captain, Role::Jack, Role::Tom];

    /// Canonical name, used in transcripts, footers, and acknowledgments.
    pub fn name(&self) -> &'static str {
        match self {
            Role::Chief => "Bob",
            Role::Captain => "Steve",
            Role::Jack => "Jack",
            Role::Tom => "Tom",
        }
    }

    /// Job title shown alongside the name.
    pub fn title(&self) -> &'static str {
        match self {
            Role::Chief => "Fire Chief",
            Role::Captain => "Captain",
            Role::Jack => "Firefighter",
            Role::Tom => "Firefighter",
        }
    }

    pub fn rank(&self) -> Rank {
        match self {
            Role::Chief => Rank::Strategic,
            Role::Captain => Rank::Tactical,
            Role::Jack | Role::Tom => Rank::FrontLine,
        }
    }

    /// Accepted aliases, lowercase. Canonical names are included.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Role::Chief => &["bob", "chief", "commander"],
            Role::Captain => &["steve", "captain", "team leader"],
            Role::Jack => &["jack"],
            Role::Tom => &["tom"],
        }
    }

    /// Resolve free text to a role via the synonym table.
    ///
    /// Case-insensitive substring match, so "the captain, please" and
    /// "Steve" both resolve to `Captain`.
    pub fn resolve(input: &str) -> Option<Role> {
        let lower = input.to_lowercase();
        Role::ALL
            .iter()
            .copied()
            .find(|role| role.aliases().iter().any(|alias| lower.contains(alias)))
    }

    /// All roles mentioned in `text`, in order of first occurrence.
    ///
    /// Aliases only count on word boundaries, so "bottom" never reads as
    /// a mention of Tom. `resolve` stays a substring match: there the
    /// input is a command argument, not free-running prose.
    pub fn mentions(text: &str) -> Vec<Role> {
        let lower = text.to_lowercase();
        let mut found: Vec<(usize, Role)> = Vec::new();
        for role in Role::ALL {
            if let Some(pos) = role
                .aliases()
                .iter()
                .filter_map(|alias| find_word(&lower, alias))
                .min()
            {
                found.push((pos, role));
            }
        }
        found.sort_by_key(|(pos, _)| *pos);
        found.into_iter().map(|(_, role)| role).collect()
    }
}

/// First occurrence of `needle` in `haystack` with non-alphanumeric (or
/// string-edge) characters on both sides.
fn find_word(haystack: &str, needle: &str) -> Option<usize> {
    let bounded = |c: Option<char>| c.map_or(true, |c| !c.is_alphanumeric());
    haystack.match_indices(needle).find_map(|(pos, _)| {
        let before = haystack[..pos].chars().next_back();
        let after = haystack[pos + needle.len()..].chars().next();
        (bounded(before) && bounded(after)).then_some(pos)
    })
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Operator proficiency level; every automated actor adapts its
/// communication style to the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SkillLevel {
    Novice,
    #[default]
    Intermediate,
    Expert,
}

impl SkillLevel {
    pub fn name(&self) -> &'static str {
        match self {
            SkillLevel::Novice => "novice",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Expert => "expert",
        }
    }

    /// Accepted aliases, lowercase. "medium" collapses to intermediate.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            SkillLevel::Novice => &["novice", "beginner", "rookie"],
            SkillLevel::Intermediate => &["intermediate", "medium", "standard"],
            SkillLevel::Expert => &["expert", "pro", "advanced"],
        }
    }

    /// Resolve free text to a level via the synonym table.
    pub fn resolve(input: &str) -> Option<SkillLevel> {
        let lower = input.to_lowercase();
        [
            SkillLevel::Novice,
            SkillLevel::Intermediate,
            SkillLevel::Expert,
        ]
        .into_iter()
        .find(|level| level.aliases().iter().any(|alias| lower.contains(alias)))
    }
}

impl std::fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
