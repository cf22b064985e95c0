//! Combat resolver: pure transition functions from one battle state to the next.
//!
//! Both operations are copy-on-write. They read the current state, draw every
//! roll from the injected [`BattleRng`], and return a [`Resolution`] holding
//! the new state and the log entry describing the action. The input state is
//! never modified and the returned state carries only the effects of this
//! action.

mod attack;
mod rest;
mod result;

pub use attack::perform_attack;
pub use rest::perform_rest;
pub use result::{AttackRolls, Resolution};

use crate::action::ActionKind;
use crate::player::ResourceSnapshot;
use crate::rng::BattleRng;
use crate::side::{Side, SideMap};
use crate::state::BattleState;

/// Minimum stamina required to attack; also the lowest possible attack cost.
pub const MIN_ATTACK_COST: u32 = 3;
/// Upper bound of the attack cost roll.
pub const MAX_ATTACK_COST: u32 = 10;
/// Upper bound of the money gained per attack.
pub const MAX_ATTACK_GAIN: u32 = 10;
/// Upper bound of the stamina restored per rest.
pub const MAX_REST_RESTORE: u32 = 10;

/// Dispatches `action` for `actor` to the matching resolver operation.
pub fn resolve(
    state: &BattleState,
    actor: Side,
    action: ActionKind,
    rng: &mut (impl BattleRng + ?Sized),
    timestamp: i64,
) -> Resolution {
    match action {
        ActionKind::Attack => perform_attack(state, actor, rng, timestamp),
        ActionKind::Rest => perform_rest(state, actor, rng, timestamp),
    }
}

fn resources_after(state: &BattleState) -> SideMap<ResourceSnapshot> {
    state.players.map(|_, player| player.resources())
}
