//! Turn scheduler worker driving one battle.
//!
//! One scheduler task is spawned per started battle. It waits for the side to
//! act (a timed decision for automated sides, the pending slot for human
//! sides), then resolves and publishes the action while holding the room
//! lock, so resolution and broadcast form a single step that `stop` or a
//! restart can never interleave with.

use std::sync::Arc;

use battle_core::{ActionKind, BattleRng, BattleState, Resolution, Side, SideMap, resolve};
use tokio::sync::{Mutex, oneshot};
use tracing::{debug, info};

use crate::api::DecisionRequest;
use crate::config::BattleConfig;
use crate::events::RoomEvent;
use crate::providers::{Decision, DecisionPolicy};
use crate::rooms::room::{PendingAction, Room};
use crate::types::RoomId;

pub(crate) struct TurnScheduler {
    room_id: RoomId,
    room: Arc<Mutex<Room>>,
    /// Room epoch this scheduler belongs to.
    epoch: u64,
    config: BattleConfig,
    policy: DecisionPolicy,
    rng: Box<dyn BattleRng>,
    /// Automated turns taken so far by each side; drives the model throttle.
    automated_turns: SideMap<u32>,
    human_rx: Option<oneshot::Receiver<ActionKind>>,
}

impl TurnScheduler {
    pub(crate) fn new(
        room_id: RoomId,
        room: Arc<Mutex<Room>>,
        epoch: u64,
        config: BattleConfig,
        policy: DecisionPolicy,
        rng: Box<dyn BattleRng>,
    ) -> Self {
        Self {
            room_id,
            room,
            epoch,
            config,
            policy,
            rng,
            automated_turns: SideMap::default(),
            human_rx: None,
        }
    }

    /// Opens the pending slot when the side to act is human-controlled.
    ///
    /// Must be called with the room locked, right after the battle state
    /// that hands the turn over has been stored.
    pub(crate) fn arm(&mut self, room: &mut Room) {
        room.pending = None;
        self.human_rx = None;

        let Some(state) = room.battle.as_ref() else {
            return;
        };
        if state.is_over() || self.config.is_automated(state.turn) {
            return;
        }

        let (reply, rx) = oneshot::channel();
        room.pending = Some(PendingAction {
            side: state.turn,
            reply,
        });
        self.human_rx = Some(rx);
        debug!(
            target: "runtime::scheduler",
            room = %self.room_id,
            side = %state.turn,
            "Awaiting human action"
        );
    }

    /// Main worker loop. Returns when the battle ends or is discarded.
    pub(crate) async fn run(mut self) {
        while let Some((side, state)) = current_turn(&self.room, self.epoch).await {
            let Some(action) = self.next_action(side, &state).await else {
                break;
            };
            if !self.commit(side, action).await {
                break;
            }
        }
        debug!(
            target: "runtime::scheduler",
            room = %self.room_id,
            epoch = self.epoch,
            "Turn scheduler finished"
        );
    }

    async fn next_action(&mut self, side: Side, state: &BattleState) -> Option<ActionKind> {
        if !self.config.is_automated(side) {
            // Dropped sender means the room halted this battle.
            return self.human_rx.take()?.await.ok();
        }

        tokio::time::sleep(self.config.turn_delay).await;

        let turn_index = self.automated_turns[side];
        self.automated_turns[side] += 1;

        let request = DecisionRequest {
            side,
            state,
            persona: &self.config.prompts[side],
            price_multiplier: self.config.price_multiplier,
        };
        let Decision { action, source } = self.policy.decide(&request, turn_index).await;
        debug!(
            target: "runtime::scheduler",
            room = %self.room_id,
            %side,
            %action,
            %source,
            "Automated decision"
        );
        Some(action)
    }

    /// Resolves `action`, stores the result, and broadcasts it.
    ///
    /// Returns `false` when the scheduler should stop.
    async fn commit(&mut self, actor: Side, action: ActionKind) -> bool {
        let shared = Arc::clone(&self.room);
        let mut guard = shared.lock().await;
        let room = &mut *guard;
        if room.epoch != self.epoch {
            return false;
        }
        let Some(current) = room.battle.as_ref() else {
            return false;
        };
        if current.is_over() || current.turn != actor {
            return false;
        }

        let timestamp = chrono::Utc::now().timestamp_millis();
        let Resolution {
            state: mut next,
            entry,
            killed,
            ..
        } = resolve(current, actor, action, self.rng.as_mut(), timestamp);

        next.record(entry.clone());
        next.advance_turn(actor);
        if killed {
            next.enter_summary(actor);
        }
        let snapshot = next.snapshot();
        room.battle = Some(next);

        room.bus.publish(RoomEvent::Log(entry));
        room.bus.publish(RoomEvent::State(Some(snapshot.clone())));

        if killed {
            info!(
                target: "runtime::scheduler",
                room = %self.room_id,
                winner = %actor,
                round = snapshot.round,
                "Battle over"
            );
            room.bus.publish(RoomEvent::Over {
                winner: actor,
                state: snapshot,
            });
            room.pending = None;
            return false;
        }

        self.arm(room);
        true
    }
}

/// Side to act and a copy of the state it decides on, while the battle of
/// `epoch` is still playing.
async fn current_turn(room: &Mutex<Room>, epoch: u64) -> Option<(Side, BattleState)> {
    let room = room.lock().await;
    if room.epoch != epoch {
        return None;
    }
    let state = room.battle.as_ref()?;
    if state.is_over() {
        return None;
    }
    Some((state.turn, state.clone()))
}
