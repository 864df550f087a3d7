//! Simulation error types.

use crate::provider::ProviderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// Internal invariant violation: selection was asked to choose with no
    /// eligible actor. Should be unreachable while the single-human
    /// invariant holds; surfaced rather than silently patched.
    #[error("turn selection found no eligible actor")]
    EmptyRoster,

    /// The operator channel reached EOF while the loop was waiting on it.
    #[error("operator input channel closed")]
    InputClosed,

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
