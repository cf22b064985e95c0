//! Rule-based decision provider.

use async_trait::async_trait;
use battle_core::combat::MIN_ATTACK_COST;
use battle_core::{ActionKind, BattleState, Side};

use crate::api::{DecisionProvider, DecisionRequest, ProviderError};

/// Deterministic rule set that never fails and never leaves the process.
///
/// 1. Below the attack threshold the side must rest.
/// 2. Below [`REST_THRESHOLD`](Self::REST_THRESHOLD) it rests, unless the
///    opponent is low enough that a maximal hit could finish it.
/// 3. Otherwise it attacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicProvider;

impl HeuristicProvider {
    pub const REST_THRESHOLD: u32 = 12;

    pub fn new() -> Self {
        Self
    }

    pub fn choose(&self, side: Side, state: &BattleState) -> ActionKind {
        let me = state.player(side);
        let foe = state.player(side.opponent());

        if me.stamina < MIN_ATTACK_COST {
            return ActionKind::Rest;
        }
        if me.stamina < Self::REST_THRESHOLD && foe.hp > me.power {
            return ActionKind::Rest;
        }
        ActionKind::Attack
    }
}

#[async_trait]
impl DecisionProvider for HeuristicProvider {
    async fn decide(&self, request: &DecisionRequest<'_>) -> Result<ActionKind, ProviderError> {
        Ok(self.choose(request.side, request.state))
    }
}
