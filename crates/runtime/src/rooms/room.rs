//! State owned by a single room.

use battle_core::{BattleSnapshot, BattleState, Phase, Side};
use serde::Serialize;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::events::RoomBus;
use crate::types::RoomId;

/// Coarse lifecycle of a room, derived from its battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RoomStatus {
    /// No battle; the room only holds subscribers.
    Idle,
    /// A battle is running and waiting for its next action.
    AwaitingAction,
    /// The battle ended and its final state is kept until the next start.
    Summary,
}

/// Slot through which a human-controlled side hands its action to the
/// scheduler. Present only while that side is to act.
pub(crate) struct PendingAction {
    pub(crate) side: Side,
    pub(crate) reply: oneshot::Sender<battle_core::ActionKind>,
}

pub(crate) struct Room {
    pub(crate) id: RoomId,
    pub(crate) battle: Option<BattleState>,
    pub(crate) seed: Option<u64>,
    /// Bumped whenever the battle is replaced or discarded. A scheduler only
    /// commits while the epoch it was spawned with is current.
    pub(crate) epoch: u64,
    pub(crate) bus: RoomBus,
    pub(crate) pending: Option<PendingAction>,
    pub(crate) worker: Option<JoinHandle<()>>,
}

impl Room {
    pub(crate) fn new(id: RoomId) -> Self {
        Self {
            bus: RoomBus::new(id.clone()),
            id,
            battle: None,
            seed: None,
            epoch: 0,
            pending: None,
            worker: None,
        }
    }

    pub(crate) fn status(&self) -> RoomStatus {
        match self.battle.as_ref().map(|state| state.phase) {
            None => RoomStatus::Idle,
            Some(Phase::Playing) => RoomStatus::AwaitingAction,
            Some(Phase::Summary) => RoomStatus::Summary,
        }
    }

    /// Full snapshot, log entries included.
    pub(crate) fn snapshot(&self) -> Option<BattleSnapshot> {
        self.battle.as_ref().map(BattleState::full_snapshot)
    }

    /// Cancels the running scheduler and forgets the battle.
    ///
    /// Returns whether a battle was present.
    pub(crate) fn halt(&mut self) -> bool {
        self.epoch = self.epoch.wrapping_add(1);
        if let Some(worker) = self.worker.take() {
            worker.abort();
        }
        self.pending = None;
        self.seed = None;
        let had_battle = self.battle.take().is_some();
        debug!(
            target: "runtime::rooms",
            room = %self.id,
            epoch = self.epoch,
            had_battle,
            "Room halted"
        );
        had_battle
    }
}
