//! Authoritative battle state representation.
//!
//! The runtime clones or snapshots this state but mutates it only through the
//! resolver and the turn bookkeeping methods defined here.
mod effects;
mod log;
mod snapshot;

use std::sync::Arc;

pub use effects::{Effects, Flash};
pub use log::LogEntry;
pub use snapshot::BattleSnapshot;

use crate::player::Player;
use crate::side::{Side, SideMap};

/// Gameplay phase of a running battle. An idle room has no state at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    Playing,
    /// Terminal: a winner has been decided.
    Summary,
}

/// Canonical snapshot of one battle.
///
/// Equality ignores [`Effects`], which are advisory presentation hints.
#[derive(Clone, Debug)]
pub struct BattleState {
    pub phase: Phase,
    /// Side authorized to act next.
    pub turn: Side,
    /// Starts at 1 and advances once both sides have acted.
    pub round: u32,
    pub players: SideMap<Player>,
    /// Effects of the most recently resolved action only.
    pub effects: Effects,
    pub winner: Option<Side>,
    /// Side that opens every round.
    first: Side,
    /// Shared with previous states until the next append.
    log: Arc<Vec<LogEntry>>,
}

impl BattleState {
    /// Creates a fresh battle with baseline players, round 1, `first` to act.
    pub fn new(names: SideMap<String>, first: Side) -> Self {
        Self {
            phase: Phase::Playing,
            turn: first,
            round: 1,
            players: SideMap::new(
                Player::new(names.side_a),
                Player::new(names.side_b),
            ),
            effects: Effects::default(),
            winner: None,
            first,
            log: Arc::new(Vec::new()),
        }
    }

    pub fn player(&self, side: Side) -> &Player {
        &self.players[side]
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::Summary
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn log_len(&self) -> usize {
        self.log.len()
    }

    /// Appends a log entry. Copies the log only if an older state still
    /// shares it.
    pub fn record(&mut self, entry: LogEntry) {
        Arc::make_mut(&mut self.log).push(entry);
    }

    /// Hands the turn to the opponent of `actor`.
    ///
    /// The round advances when `actor` is the second side of the round, i.e.
    /// once both sides have acted.
    pub fn advance_turn(&mut self, actor: Side) {
        self.turn = actor.opponent();
        if actor != self.first {
            self.round += 1;
        }
    }

    /// Enters the terminal phase with `winner`.
    pub fn enter_summary(&mut self, winner: Side) {
        self.phase = Phase::Summary;
        self.winner = Some(winner);
    }

    /// Snapshot without the log entries.
    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot::from(self)
    }

    /// Snapshot including every log entry so far.
    pub fn full_snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            log: Some(self.log.to_vec()),
            ..self.snapshot()
        }
    }
}

impl PartialEq for BattleState {
    fn eq(&self, other: &Self) -> bool {
        self.phase == other.phase
            && self.turn == other.turn
            && self.round == other.round
            && self.players == other.players
            && self.winner == other.winner
            && self.first == other.first
            && self.log == other.log
    }
}

impl Eq for BattleState {}
