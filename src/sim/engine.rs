//! The conversation loop: the state machine that drives turns.
//!
//! Running → Terminated, nothing else. Each iteration selects an actor,
//! collects its utterance, strips footers, absorbs duplicates, forwards the
//! accepted text to the instructor, and checks termination. Whichever stop
//! condition fires first wins; termination is final.

use super::actors::{Actor, ActorId, AutomatedActor, HumanProxyActor};
use super::evaluator::Evaluator;
use super::footer;
use super::gateway::Console;
use super::history::{History, Utterance};
use super::report::Report;
use super::roles::Role;
use super::selector::TurnSelector;
use super::state::SessionState;
use super::termination::TerminationDetector;
use super::SimError;
use std::collections::BTreeMap;

/// Why the session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The termination detector matched an accepted utterance.
    SentinelMatched(String),
    /// The configured turn cap was reached first.
    TurnLimit,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::SentinelMatched(reason) => f.write_str(reason),
            StopReason::TurnLimit => f.write_str("turn limit reached"),
        }
    }
}

/// Everything the session leaves behind.
pub struct SessionSummary {
    pub stop_reason: StopReason,
    pub turns: usize,
    pub report: Report,
}

/// Orchestrates one training session.
pub struct ConversationLoop<C: Console> {
    selector: TurnSelector,
    crew: BTreeMap<Role, AutomatedActor>,
    human: HumanProxyActor<C>,
    evaluator: Evaluator,
    detector: Box<dyn TerminationDetector>,
    max_turns: usize,
    state: SessionState,
    history: History,
    report: Report,
}

impl<C: Console> ConversationLoop<C> {
    pub fn new(
        selector: TurnSelector,
        crew: BTreeMap<Role, AutomatedActor>,
        human: HumanProxyActor<C>,
        evaluator: Evaluator,
        detector: Box<dyn TerminationDetector>,
        max_turns: usize,
    ) -> Self {
        Self {
            selector,
            crew,
            human,
            evaluator,
            detector,
            max_turns,
            state: SessionState::new(),
            history: History::new(),
            report: Report::new(),
        }
    }

    /// Run the session to termination and hand back the summary.
    pub async fn run(mut self, briefing: &str) -> Result<SessionSummary, SimError> {
        self.seed_briefing(briefing).await;

        let stop_reason = loop {
            if self.history.participant_turns() >= self.max_turns {
                break StopReason::TurnLimit;
            }

            let actor_id = self
                .selector
                .select(&self.history, &self.state, &Role::ALL)?;
            let actor: &mut dyn Actor = match actor_id {
                ActorId::Agent(role) => {
                    self.crew.get_mut(&role).ok_or(SimError::EmptyRoster)?
                }
                ActorId::Human => &mut self.human,
                // Dispatch only seeds; selection never returns it.
                ActorId::Dispatch => return Err(SimError::EmptyRoster),
            };

            tracing::debug!("Turn {} goes to {}", self.history.participant_turns() + 1, actor_id);
            let raw = actor.act(&self.history, &mut self.state).await?;
            let cleaned = footer::strip(&raw);
            let acting_role = match actor_id {
                ActorId::Agent(role) => Some(role),
                ActorId::Human => self.state.registry.human_owned(),
                ActorId::Dispatch => None,
            };

            let duplicate =
                self.state.already_seen(&cleaned) || self.state.already_seen(&raw);

            // Duplicates stay in history for continuity but are absorbed:
            // not re-printed, not re-evaluated.
            self.history.push(Utterance {
                speaker: actor_id,
                acting_role,
                raw: raw.clone(),
                cleaned: cleaned.clone(),
            });

            if duplicate {
                tracing::debug!("Absorbed duplicate utterance from {}", actor_id);
                continue;
            }
            self.state.mark_seen(&raw);
            self.state.mark_seen(&cleaned);

            let banner = match (actor_id, acting_role) {
                (ActorId::Human, Some(role)) => format!("Operator ({role})"),
                _ => actor_id.to_string(),
            };
            self.print(&format!("\n---------- {banner} ----------\n{cleaned}"));

            let target = acting_role
                .map(|r| r.name().to_string())
                .unwrap_or_else(|| actor_id.to_string());
            self.evaluate_isolated(&target, &cleaned).await;

            if let Some(reason) = self.detector.check(&cleaned) {
                break StopReason::SentinelMatched(reason);
            }
        };

        tracing::info!("Session terminated: {}", stop_reason);
        Ok(SessionSummary {
            stop_reason,
            turns: self.history.participant_turns(),
            report: self.report,
        })
    }

    /// Seed the scenario briefing: first history entry, evaluated before
    /// the first turn so the critique precedes any operator input.
    async fn seed_briefing(&mut self, briefing: &str) {
        self.print(&format!("Starting session: {briefing}\n{}", "-".repeat(50)));
        self.history.push(Utterance {
            speaker: ActorId::Dispatch,
            acting_role: None,
            raw: briefing.to_string(),
            cleaned: briefing.to_string(),
        });
        self.state.mark_seen(briefing);
        self.evaluate_isolated("user", briefing).await;
    }

    /// Instructor call with failures isolated: log and carry on, the loop
    /// never aborts on the side-channel.
    async fn evaluate_isolated(&mut self, target_role: &str, text: &str) {
        match self.evaluator.evaluate(target_role, text).await {
            Ok(record) => {
                self.print(&format!(
                    "\n---------- Instructor ----------\n{}",
                    record.to_comment()
                ));
                self.report.push(record);
            }
            Err(e) => {
                tracing::warn!("Instructor evaluation failed for {}: {}", target_role, e);
            }
        }
    }

    fn print(&mut self, text: &str) {
        self.human.gateway_mut().console_mut().print(text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{
        ChatRequest, ChatResponse, Provider, Result as ProviderResult, TokenUsage,
    };
    use crate::sim::gateway::test_support::ScriptedConsole;
    use crate::sim::gateway::HumanInputGateway;
    use crate::sim::termination::SentinelDetector;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio_util::sync::CancellationToken;

    /// Crew provider: pops scripted replies, repeats the last one.
    struct ScriptedProvider {
        replies: Vec<String>,
        cursor: AtomicUsize,
    }

    impl ScriptedProvider {
        fn new(replies: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                replies: replies.iter().map(|s| s.to_string()).collect(),
                cursor: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Provider for ScriptedProvider {
        async fn complete(&self, _request: ChatRequest) -> ProviderResult<ChatResponse> {
            let i = self.cursor.fetch_add(1, Ordering::SeqCst);
            let text = self
                .replies
                .get(i)
                .or_else(|| self.replies.last())
                .cloned()
                .unwrap_or_default();
            Ok(ChatResponse {
                model: "mock".to_string(),
                text,
                usage: TokenUsage::default(),
            })
        }
        fn name(&self) -> &str {
            "scripted"
        }
        fn default_model(&self) -> &str {
            "mock"
        }
    }

    /// Instructor provider: always returns one parseable line.
    struct InstructorProvider {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl Provider for InstructorProvider {
        async fn complete(&self, _request: ChatRequest) -> ProviderResult<ChatResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(crate::provider::ProviderError::Timeout);
            }
            Ok(ChatResponse {
                model: "mock".to_string(),
                text: "relevance: 7 | fine".to_string(),
                usage: TokenUsage::default(),
            })
        }
        fn name(&self) -> &str {
            "instructor"
        }
        fn default_model(&self) -> &str {
            "mock"
        }
    }

    fn build_loop(
        crew_provider: Arc<dyn Provider>,
        instructor: Arc<dyn Provider>,
        console_lines: &[&str],
        max_turns: usize,
    ) -> ConversationLoop<ScriptedConsole> {
        let cancel = CancellationToken::new();
        let crew = Role::ALL
            .iter()
            .map(|&role| {
                (
                    role,
                    AutomatedActor::new(role, crew_provider.clone(), 0.4, 256, cancel.clone()),
                )
            })
            .collect();
        let human = HumanProxyActor::new(HumanInputGateway::new(ScriptedConsole::with_lines(
            console_lines,
        )));
        let evaluator = Evaluator::new(instructor, 0.4, 512);
        ConversationLoop::new(
            TurnSelector::default(),
            crew,
            human,
            evaluator,
            Box::new(SentinelDetector::new("MISSION_ACCOMPLISHED")),
            max_turns,
        )
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn sentinel_terminates_the_session() {
        // Scenario C: the Chief's first reply carries the sentinel; the
        // loop stops immediately after accepting it.
        let crew = ScriptedProvider::new(&["Fire is out. MISSION_ACCOMPLISHED"]);
        let instructor = Arc::new(InstructorProvider {
            calls: AtomicUsize::new(0),
            fail: false,
        });
        let sim = build_loop(crew.clone(), instructor.clone(), &["Taking observer role."], 50);

        let summary = sim.run("High-rise fire drill.").await.unwrap();
        assert!(matches!(summary.stop_reason, StopReason::SentinelMatched(_)));
        assert!(summary.stop_reason.to_string().contains("sentinel matched"));
        // Operator turn + Chief turn, nothing after termination.
        assert_eq!(summary.turns, 2);
        assert_eq!(crew.cursor.load(Ordering::SeqCst), 1);
        // Briefing + operator + chief all evaluated, in order.
        assert_eq!(summary.report.len(), 3);
        assert_eq!(instructor.calls.load(Ordering::SeqCst), 3);
        assert_eq!(summary.report.records()[0].target_role, "user");
        assert_eq!(summary.report.records()[2].target_role, "Bob");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn turn_limit_stops_the_session() {
        let crew = ScriptedProvider::new(&["Holding position, continuing operations."]);
        let instructor = Arc::new(InstructorProvider {
            calls: AtomicUsize::new(0),
            fail: false,
        });
        let sim = build_loop(crew, instructor, &["Observing."], 4);

        let summary = sim.run("Drill briefing.").await.unwrap();
        assert_eq!(summary.stop_reason, StopReason::TurnLimit);
        assert_eq!(summary.turns, 4);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn duplicate_utterances_are_absorbed_once_evaluated() {
        // Scenario D: the crew repeats itself (retried backend); exactly
        // one record per distinct text.
        let crew = ScriptedProvider::new(&["Copy that, proceeding."]);
        let instructor = Arc::new(InstructorProvider {
            calls: AtomicUsize::new(0),
            fail: false,
        });
        let sim = build_loop(crew, instructor.clone(), &["Observing."], 6);

        let summary = sim.run("Drill briefing.").await.unwrap();
        // Briefing + operator message + first "Copy that" = 3 records;
        // the repeats were absorbed silently.
        assert_eq!(summary.report.len(), 3);
        // But history kept every turn for continuity.
        assert_eq!(summary.turns, 6);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn instructor_failure_never_aborts_the_loop() {
        let crew = ScriptedProvider::new(&["MISSION_ACCOMPLISHED"]);
        let instructor = Arc::new(InstructorProvider {
            calls: AtomicUsize::new(0),
            fail: true,
        });
        let sim = build_loop(crew, instructor, &["Observing."], 10);

        let summary = sim.run("Drill briefing.").await.unwrap();
        assert!(matches!(summary.stop_reason, StopReason::SentinelMatched(_)));
        assert!(summary.report.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn operator_takeover_redirects_the_named_turn() {
        // The operator takes Steve; when the Chief addresses Steve, the
        // turn goes to the operator, whose reply ends the session.
        let crew = ScriptedProvider::new(&[
            "Steve, give me a status report.",
            "MISSION_ACCOMPLISHED",
        ]);
        let instructor = Arc::new(InstructorProvider {
            calls: AtomicUsize::new(0),
            fail: false,
        });
        let sim = build_loop(
            crew,
            instructor,
            &[
                "switch role: captain",
                "Taking tactical command.",
                "Status: all floors below 15 evacuated.",
            ],
            50,
        );

        let summary = sim.run("Drill briefing.").await.unwrap();
        // Operator spoke twice: once at session open, once for Steve.
        let steve_records: Vec<_> = summary
            .report
            .records()
            .iter()
            .filter(|r| r.target_role == "Steve")
            .collect();
        assert_eq!(steve_records.len(), 2);
    }
}
