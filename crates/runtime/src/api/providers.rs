//! Asynchronous abstraction for choosing an automated side's action.
//!
//! Rooms plug in [`DecisionProvider`] implementations so a battle can run
//! with a local heuristic, an external reasoning model, or test fixtures.
use std::time::Duration;

use async_trait::async_trait;
use battle_core::{ActionKind, BattleState, Side};
use thiserror::Error;

/// Everything a provider may look at when choosing an action.
#[derive(Debug, Clone, Copy)]
pub struct DecisionRequest<'a> {
    /// The side that has to act.
    pub side: Side,
    /// Read-only copy of the battle at the start of the turn.
    pub state: &'a BattleState,
    /// Persona prompt configured for `side`.
    pub persona: &'a str,
    pub price_multiplier: f64,
}

/// Failures of a decision provider. Always recovered by the heuristic.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("decision timed out after {0:?}")]
    Timeout(Duration),

    #[error("reasoning service request failed: {0}")]
    Transport(String),

    #[error("reasoning service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("reasoning service returned an empty response")]
    EmptyResponse,

    #[error("no action found in reply `{0}`")]
    Unparseable(String),
}

/// Trait for choosing ATTACK or REST for an automated side.
///
/// Implementations may be slow or fail; the caller bounds them with a
/// timeout and falls back to the heuristic.
#[async_trait]
pub trait DecisionProvider: Send + Sync {
    async fn decide(&self, request: &DecisionRequest<'_>) -> Result<ActionKind, ProviderError>;
}
