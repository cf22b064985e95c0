//! Event types broadcast to room subscribers.

use battle_core::{BattleSnapshot, LogEntry, Side};

use crate::types::RoomId;

/// Events emitted by a room, in the order they were produced.
#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    /// Full snapshot; `None` means the room is idle.
    ///
    /// Sent on join, after every resolved action, on start, and on stop.
    State(Option<BattleSnapshot>),

    /// One resolved action, in resolution order.
    Log(LogEntry),

    /// The battle reached its terminal phase. Emitted once per battle.
    Over { winner: Side, state: BattleSnapshot },
}

impl RoomEvent {
    pub fn name(&self) -> &'static str {
        match self {
            RoomEvent::State(_) => "state",
            RoomEvent::Log(_) => "log",
            RoomEvent::Over { .. } => "over",
        }
    }
}

/// A [`RoomEvent`] tagged with the room it belongs to.
///
/// A subscriber may follow several rooms through one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomMessage {
    pub room: RoomId,
    pub event: RoomEvent,
}
