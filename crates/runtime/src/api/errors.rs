//! Unified error types surfaced by the runtime API.
//!
//! Every rejected call maps to one variant here, so transports can turn it
//! into an acknowledgement with a stable reason label.
use battle_core::{BattleError, Side};
use thiserror::Error;

use crate::types::RoomId;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("room `{0}` does not exist")]
    UnknownRoom(RoomId),

    #[error(transparent)]
    Battle(#[from] BattleError),

    #[error("room `{0}` has no battle in progress")]
    NoActiveBattle(RoomId),

    #[error("room `{room}` is not awaiting an action from {side}")]
    NotAwaitingAction { room: RoomId, side: Side },

    #[error("invalid battle configuration: {0}")]
    InvalidConfig(String),

    #[error("turn scheduler for room `{0}` is no longer listening")]
    SchedulerGone(RoomId),
}

/// Coarse grouping of [`RuntimeError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The call referenced something unknown or acted out of turn.
    Validation,
    /// The request payload itself was unusable.
    Protocol,
    Internal,
}

impl RuntimeError {
    pub fn class(&self) -> ErrorClass {
        match self {
            RuntimeError::UnknownRoom(_)
            | RuntimeError::Battle(_)
            | RuntimeError::NoActiveBattle(_)
            | RuntimeError::NotAwaitingAction { .. } => ErrorClass::Validation,
            RuntimeError::InvalidConfig(_) => ErrorClass::Protocol,
            RuntimeError::SchedulerGone(_) => ErrorClass::Internal,
        }
    }

    /// Stable snake_case label used as the rejection reason on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            RuntimeError::UnknownRoom(_) => "unknown_room",
            RuntimeError::Battle(BattleError::UnknownSide(_)) => "unknown_side",
            RuntimeError::Battle(BattleError::UnknownAction(_)) => "unknown_action",
            RuntimeError::NoActiveBattle(_) => "no_active_battle",
            RuntimeError::NotAwaitingAction { .. } => "not_awaiting_action",
            RuntimeError::InvalidConfig(_) => "invalid_config",
            RuntimeError::SchedulerGone(_) => "scheduler_gone",
        }
    }
}
