//! Actors: the things that produce utterances.
//!
//! Two variants behind one capability trait, selected by registry lookup:
//! the LLM-backed crew member and the human proxy that redirects a turn to
//! the operator channel.

use super::gateway::{Console, HumanInputGateway};
use super::history::History;
use super::personas;
use super::roles::Role;
use super::state::SessionState;
use super::SimError;
use crate::provider::{ChatMessage, ChatRequest, Provider, ProviderError};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Identity of a turn-taker in the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorId {
    /// The automated identity of a roster role.
    Agent(Role),
    /// The operator's proxy, speaking for whichever role it owns.
    Human,
    /// Session seed (the scenario briefing); never selected for a turn.
    Dispatch,
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActorId::Agent(role) => f.write_str(role.name()),
            ActorId::Human => f.write_str("Operator"),
            ActorId::Dispatch => f.write_str("Dispatch"),
        }
    }
}

/// A participant able to take a turn.
#[async_trait]
pub trait Actor: Send {
    fn id(&self) -> ActorId;

    /// Produce one utterance. The human proxy blocks on operator input;
    /// automated actors call the provider backend.
    async fn act(&mut self, history: &History, state: &mut SessionState)
        -> Result<String, SimError>;
}

/// LLM-backed crew member.
pub struct AutomatedActor {
    role: Role,
    provider: Arc<dyn Provider>,
    temperature: f64,
    max_tokens: u32,
    cancel: CancellationToken,
}

impl AutomatedActor {
    pub fn new(
        role: Role,
        provider: Arc<dyn Provider>,
        temperature: f64,
        max_tokens: u32,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            role,
            provider,
            temperature,
            max_tokens,
            cancel,
        }
    }

    /// Map the transcript into the actor's view: own past utterances as
    /// assistant turns, everything else (footers included) as attributed
    /// user turns.
    fn build_request(&self, history: &History, state: &SessionState) -> ChatRequest {
        let messages = history
            .iter()
            .map(|u| match u.speaker {
                ActorId::Agent(r) if r == self.role => ChatMessage::assistant(u.raw.clone()),
                _ => ChatMessage::user(format!("{}: {}", u.speaker, u.raw)),
            })
            .collect();

        let mut request = ChatRequest::new(messages)
            .with_system(personas::system_prompt(self.role, state.skill));
        request.temperature = Some(self.temperature);
        request.max_tokens = Some(self.max_tokens);
        request
    }
}

#[async_trait]
impl Actor for AutomatedActor {
    fn id(&self) -> ActorId {
        ActorId::Agent(self.role)
    }

    async fn act(
        &mut self,
        history: &History,
        state: &mut SessionState,
    ) -> Result<String, SimError> {
        let request = self.build_request(history, state);
        tracing::debug!("Requesting completion for role {}", self.role.name());

        let response = tokio::select! {
            _ = self.cancel.cancelled() => Err(ProviderError::Cancelled),
            result = self.provider.complete(request) => result,
        }?;

        Ok(response.text.trim().to_string())
    }
}

/// Redirects a turn to the operator channel.
pub struct HumanProxyActor<C: Console> {
    gateway: HumanInputGateway<C>,
}

impl<C: Console> HumanProxyActor<C> {
    pub fn new(gateway: HumanInputGateway<C>) -> Self {
        Self { gateway }
    }

    pub fn gateway_mut(&mut self) -> &mut HumanInputGateway<C> {
        &mut self.gateway
    }
}

#[async_trait]
impl<C: Console> Actor for HumanProxyActor<C> {
    fn id(&self) -> ActorId {
        ActorId::Human
    }

    async fn act(
        &mut self,
        _history: &History,
        state: &mut SessionState,
    ) -> Result<String, SimError> {
        let prompt = match state.registry.human_owned() {
            Some(role) => format!("Speak as {}: ", role.name()),
            None => "Enter your message (or 'switch role: <name>'): ".to_string(),
        };

        // Blocking stdin wait; hand the worker thread back to the runtime.
        // Requires the multi-thread runtime, which `main` always uses.
        tokio::task::block_in_place(|| self.gateway.read(&prompt, state))
    }
}
