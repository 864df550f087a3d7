//! Operator input gateway.
//!
//! Reads operator text, intercepts the two control-command families
//! (role switch, skill switch), and otherwise returns the text annotated
//! with the state footer. Commands never become turns: they mutate state,
//! print an acknowledgment, and re-prompt.

use super::footer;
use super::roles::{Role, SkillLevel};
use super::state::SessionState;
use super::SimError;
use std::io::{BufRead, Write};

const ROLE_COMMAND: &str = "switch role";
const SKILL_COMMAND: &str = "switch skill";

/// Line-oriented operator channel. Implemented by real stdin/stdout and by
/// a scripted console in tests.
pub trait Console: Send {
    /// Print `prompt` and read one line. `None` on EOF.
    fn read_line(&mut self, prompt: &str) -> std::io::Result<Option<String>>;

    /// Print a system-side message to the operator.
    fn print(&mut self, text: &str);
}

/// Real console over the process standard streams.
#[derive(Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn read_line(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        let mut stdout = std::io::stdout().lock();
        write!(stdout, "{prompt}")?;
        stdout.flush()?;

        let mut line = String::new();
        let read = std::io::stdin().lock().read_line(&mut line)?;
        if read == 0 {
            Ok(None)
        } else {
            Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
        }
    }

    fn print(&mut self, text: &str) {
        println!("{text}");
    }
}

/// A command parsed from operator input.
#[derive(Debug, PartialEq)]
enum Command<'a> {
    SwitchRole(&'a str),
    SwitchSkill(&'a str),
    /// Recognized command prefix, missing/empty argument.
    Malformed(&'static str),
}

fn parse_command(line: &str) -> Option<Command<'_>> {
    let lower = line.to_lowercase();
    for (prefix, kind) in [(ROLE_COMMAND, 0u8), (SKILL_COMMAND, 1u8)] {
        if lower.starts_with(prefix) {
            let rest = line[prefix.len()..].trim_start();
            let arg = rest.strip_prefix(':').map(str::trim);
            return Some(match arg {
                Some(arg) if !arg.is_empty() => {
                    if kind == 0 {
                        Command::SwitchRole(arg)
                    } else {
                        Command::SwitchSkill(arg)
                    }
                }
                _ => Command::Malformed(prefix),
            });
        }
    }
    None
}

/// Reads operator input and applies control commands to the session state.
pub struct HumanInputGateway<C: Console> {
    console: C,
}

impl<C: Console> HumanInputGateway<C> {
    pub fn new(console: C) -> Self {
        Self { console }
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    /// Read one conversational message from the operator.
    ///
    /// Loops over control commands and local errors; only pass-through text
    /// returns, annotated with the state footer. This call blocks until the
    /// operator submits text; the loop's sole suspension point.
    pub fn read(&mut self, initial_prompt: &str, state: &mut SessionState) -> Result<String, SimError> {
        let mut prompt = initial_prompt.to_string();

        loop {
            let line = self
                .console
                .read_line(&prompt)?
                .ok_or(SimError::InputClosed)?;
            let line = line.trim();

            match parse_command(line) {
                Some(Command::SwitchRole(target)) => match Role::resolve(target) {
                    Some(role) => {
                        state.registry.set_human_owner(role);
                        self.console.print(&format!(
                            "[System] You now control {} ({}); the previous role is back under AI control.",
                            role.name(),
                            role.title()
                        ));
                        tracing::info!("Operator took over role {}", role.name());
                        prompt = format!("Speak as {}: ", role.name());
                    }
                    None => {
                        self.console.print(&format!(
                            "[System Error] Unknown role '{target}'. Known roles: Bob, Steve, Jack, Tom."
                        ));
                    }
                },
                Some(Command::SwitchSkill(target)) => match SkillLevel::resolve(target) {
                    Some(level) => {
                        state.skill = level;
                        self.console
                            .print(&format!("[System] Skill level set to {level}."));
                        tracing::info!("Operator set skill level to {}", level);
                        prompt = "Enter your message: ".to_string();
                    }
                    None => {
                        self.console.print(
                            "[System Error] Unknown skill level. Use novice, intermediate, or expert.",
                        );
                    }
                },
                Some(Command::Malformed(prefix)) => {
                    self.console.print(&format!(
                        "[System Error] Malformed command. Use '{prefix}: <target>'."
                    ));
                }
                None => {
                    let footer = footer::render(&state.registry.snapshot(), state.skill);
                    return Ok(format!("{line}\n\n{footer}"));
                }
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::ScriptedConsole;
    use super::*;
    use crate::sim::ownership::Controller;

    fn read_with(lines: &[&str], state: &mut SessionState) -> (Result<String, SimError>, Vec<String>) {
        let mut gateway = HumanInputGateway::new(ScriptedConsole::with_lines(lines));
        let result = gateway.read("> ", state);
        let printed = gateway.console.printed;
        (result, printed)
    }

    #[test]
    fn passthrough_text_gets_a_footer() {
        let mut state = SessionState::new();
        let (result, _) = read_with(&["All units hold position."], &mut state);
        let message = result.unwrap();
        assert!(message.starts_with("All units hold position."));
        assert!(message.contains("[State: Owners:"));
        assert!(message.contains("[State: Skill: intermediate]"));
        assert!(message.contains("[State: Blocked: -]"));
    }

    #[test]
    fn role_switch_by_colloquial_alias_takes_over_tactical_command() {
        // Scenario A: alias "team leader" resolves to Steve.
        let mut state = SessionState::new();
        let (result, printed) =
            read_with(&["switch role: team leader", "Crew, report in."], &mut state);

        assert_eq!(state.registry.human_owned(), Some(Role::Captain));
        for role in Role::ALL {
            let expected = if role == Role::Captain {
                Controller::Human
            } else {
                Controller::Automated
            };
            assert_eq!(state.registry.controller(role), expected);
        }
        // Acknowledgment names the canonical role.
        assert!(printed.iter().any(|p| p.contains("Steve")));
        // The command itself never became the returned turn.
        assert!(result.unwrap().starts_with("Crew, report in."));
    }

    #[test]
    fn repeated_role_switch_is_idempotent() {
        let mut state = SessionState::new();
        let (_, _) = read_with(
            &["switch role: steve", "switch role: steve", "ok"],
            &mut state,
        );
        assert_eq!(state.registry.human_owned(), Some(Role::Captain));
    }

    #[test]
    fn skill_switch_via_colloquial_synonym() {
        // Scenario B: "medium" collapses onto intermediate.
        let mut state = SessionState::new();
        state.skill = SkillLevel::Expert;
        let (_, printed) = read_with(&["switch skill: medium", "ready"], &mut state);

        assert_eq!(state.skill, SkillLevel::Intermediate);
        assert!(printed.iter().any(|p| p.contains("intermediate")));
    }

    #[test]
    fn unknown_role_target_reports_error_without_mutating_state() {
        // Scenario E: unrecognized alias, local error, no state change.
        let mut state = SessionState::new();
        let (result, printed) =
            read_with(&["switch role: dispatcher", "still here"], &mut state);

        assert_eq!(state.registry.human_owned(), None);
        assert_eq!(state.skill, SkillLevel::Intermediate);
        assert!(printed.iter().any(|p| p.contains("Unknown role")));
        assert!(result.unwrap().starts_with("still here"));
    }

    #[test]
    fn malformed_command_reprompts() {
        let mut state = SessionState::new();
        let (result, printed) = read_with(&["switch role", "hello"], &mut state);
        assert!(printed.iter().any(|p| p.contains("Malformed command")));
        assert!(result.unwrap().starts_with("hello"));
    }

    #[test]
    fn passthrough_footer_lists_blocked_role() {
        let mut state = SessionState::new();
        let (result, _) = read_with(&["switch role: jack", "entry team going in"], &mut state);
        let message = result.unwrap();
        assert!(message.contains("Jack=human"));
        assert!(message.contains("[State: Blocked: Jack]"));
    }

    #[test]
    fn eof_surfaces_input_closed() {
        let mut state = SessionState::new();
        let (result, _) = read_with(&[], &mut state);
        assert!(matches!(result, Err(SimError::InputClosed)));
    }
}
