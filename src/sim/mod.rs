//! Turn dispatch and ownership-takeover engine.
//!
//! The simulation core: a fixed crew roster, an ownership registry mapping
//! each role to its controller (automated or human), a deterministic turn
//! selector, the conversation loop that drives actors, and the instructor
//! side-channel that scores accepted utterances without ever entering the
//! crew's view.

pub mod actors;
pub mod engine;
mod error;
pub mod evaluator;
pub mod footer;
pub mod gateway;
pub mod history;
pub mod ownership;
pub mod personas;
pub mod report;
pub mod roles;
pub mod selector;
pub mod state;
pub mod termination;

pub use actors::{Actor, ActorId, AutomatedActor, HumanProxyActor};
pub use engine::{ConversationLoop, SessionSummary, StopReason};
pub use error::SimError;
pub use evaluator::{EvaluationRecord, Evaluator};
pub use gateway::{Console, HumanInputGateway, StdConsole};
pub use history::{History, Utterance};
pub use ownership::{Controller, OwnershipRegistry, OwnershipSnapshot};
pub use report::Report;
pub use roles::{Role, SkillLevel};
pub use selector::TurnSelector;
pub use state::SessionState;
pub use termination::{SentinelDetector, TerminationDetector};
