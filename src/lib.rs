//! FireDrill - Terminal Incident-Command Training Simulator
//!
//! A turn-based multi-party conversation simulation: a fixed crew of
//! fire-incident-command roles, each driven by an LLM-backed actor, any one
//! of which the operator can take over live and release back at will.
//! An out-of-band instructor scores every accepted utterance without the
//! crew ever seeing the critique.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run a training session (requires DEEPSEEK_API_KEY)
//! firedrill run
//!
//! # Show the effective configuration
//! firedrill config
//! ```

pub mod cli;
pub mod config;
pub mod logging;
pub mod provider;
pub mod sim;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
