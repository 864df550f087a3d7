//! Machine-readable state footers embedded in operator pass-through text.
//!
//! Every annotated operator message carries three trailing lines mirroring
//! the session state at send time, so any downstream consumer can
//! reconstruct the latest state by scanning history backward:
//!
//! ```text
//! [State: Owners: Bob=automated Steve=human Jack=automated Tom=automated]
//! [State: Skill: intermediate]
//! [State: Blocked: Steve]
//! ```
//!
//! The blocked set is the human-owned set, one concept serialized twice
//! for the selector's convenience.

use super::ownership::{Controller, OwnershipSnapshot};
use super::roles::{Role, SkillLevel};

const LINE_PREFIX: &str = "[State:";
const OWNERS_PREFIX: &str = "[State: Owners:";
const SKILL_PREFIX: &str = "[State: Skill:";
const BLOCKED_PREFIX: &str = "[State: Blocked:";

/// Parsed footer contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Footer {
    pub owners: OwnershipSnapshot,
    pub skill: SkillLevel,
    pub blocked: Vec<Role>,
}

/// Render the footer lines for the given state.
pub fn render(owners: &OwnershipSnapshot, skill: SkillLevel) -> String {
    let owner_pairs = owners
        .iter()
        .map(|(role, controller)| {
            let c = match controller {
                Controller::Automated => "automated",
                Controller::Human => "human",
            };
            format!("{}={}", role.name(), c)
        })
        .collect::<Vec<_>>()
        .join(" ");

    let blocked = owners
        .blocked()
        .iter()
        .map(|r| r.name())
        .collect::<Vec<_>>()
        .join(", ");
    let blocked = if blocked.is_empty() {
        "-".to_string()
    } else {
        blocked
    };

    format!(
        "{OWNERS_PREFIX} {owner_pairs}]\n{SKILL_PREFIX} {skill}]\n{BLOCKED_PREFIX} {blocked}]"
    )
}

/// Strip all footer lines from `text`, returning the conversational content.
pub fn strip(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with(LINE_PREFIX))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Parse a footer out of a single utterance's raw text, if present.
pub fn parse(text: &str) -> Option<Footer> {
    let mut owners = None;
    let mut skill = None;
    let mut blocked = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if let Some(body) = field(line, OWNERS_PREFIX) {
            owners = Some(parse_owners(body));
        } else if let Some(body) = field(line, SKILL_PREFIX) {
            skill = SkillLevel::resolve(body);
        } else if let Some(body) = field(line, BLOCKED_PREFIX) {
            blocked = body
                .split(',')
                .filter_map(|part| Role::resolve(part.trim()))
                .collect();
        }
    }

    Some(Footer {
        owners: owners?,
        skill: skill.unwrap_or_default(),
        blocked,
    })
}

fn field<'a>(line: &'a str, prefix: &str) -> Option<&'a str> {
    line.strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(']'))
        .map(str::trim)
}

fn parse_owners(body: &str) -> OwnershipSnapshot {
    let pairs = body.split_whitespace().filter_map(|token| {
        let (name, controller) = token.split_once('=')?;
        let role = Role::ALL
            .iter()
            .copied()
            .find(|r| r.name().eq_ignore_ascii_case(name))?;
        let controller = if controller.eq_ignore_ascii_case("human") {
            Controller::Human
        } else {
            Controller::Automated
        };
        Some((role, controller))
    });
    OwnershipSnapshot::from_pairs(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ownership::OwnershipRegistry;

    fn snapshot_with_human(role: Role) -> OwnershipSnapshot {
        let mut registry = OwnershipRegistry::new();
        registry.set_human_owner(role);
        registry.snapshot()
    }

    #[test]
    fn render_parse_round_trip() {
        let snapshot = snapshot_with_human(Role::Captain);
        let rendered = render(&snapshot, SkillLevel::Expert);
        let footer = parse(&rendered).unwrap();

        assert_eq!(footer.owners, snapshot);
        assert_eq!(footer.skill, SkillLevel::Expert);
        assert_eq!(footer.blocked, vec![Role::Captain]);
    }

    #[test]
    fn render_marks_empty_blocked_set() {
        let rendered = render(&OwnershipRegistry::new().snapshot(), SkillLevel::Intermediate);
        assert!(rendered.contains("[State: Blocked: -]"));
        let footer = parse(&rendered).unwrap();
        assert!(footer.blocked.is_empty());
    }

    #[test]
    fn strip_removes_only_footer_lines() {
        let snapshot = snapshot_with_human(Role::Jack);
        let text = format!(
            "Entry team, report status.\n\n{}",
            render(&snapshot, SkillLevel::Novice)
        );
        assert_eq!(strip(&text), "Entry team, report status.");
    }

    #[test]
    fn strip_is_noop_without_footer() {
        assert_eq!(strip("Ladder 3 in position."), "Ladder 3 in position.");
    }

    #[test]
    fn parse_returns_none_without_owners_line() {
        assert_eq!(parse("Just a normal message"), None);
        assert_eq!(parse("[State: Skill: expert]"), None);
    }

    #[test]
    fn parse_tolerates_reordered_lines() {
        let text = "[State: Skill: novice]\n[State: Owners: Bob=human Steve=automated Jack=automated Tom=automated]";
        let footer = parse(text).unwrap();
        assert!(footer.owners.is_human(Role::Chief));
        assert_eq!(footer.skill, SkillLevel::Novice);
    }
}
