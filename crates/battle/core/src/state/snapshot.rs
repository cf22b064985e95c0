use super::{BattleState, Effects, LogEntry, Phase};
use crate::player::Player;
use crate::side::{Side, SideMap};

/// Self-sufficient wire image of a [`BattleState`].
///
/// `log_len` acts as a monotonically increasing version so observers can tell
/// whether they missed an entry. The entries themselves are only carried by
/// the full form built with [`BattleState::full_snapshot`], which is what a
/// subscriber receives on join; per-action snapshots leave them out since the
/// entry travels in its own event.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct BattleSnapshot {
    pub phase: Phase,
    pub turn: Side,
    pub round: u32,
    pub players: SideMap<Player>,
    pub effects: Effects,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub winner: Option<Side>,
    pub log_len: usize,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub log: Option<Vec<LogEntry>>,
}

impl From<&BattleState> for BattleSnapshot {
    fn from(state: &BattleState) -> Self {
        Self {
            phase: state.phase,
            turn: state.turn,
            round: state.round,
            players: state.players.clone(),
            effects: state.effects,
            winner: state.winner,
            log_len: state.log_len(),
            log: None,
        }
    }
}
