//! Deterministic battle rules shared by the runtime and its clients.
//!
//! `battle-core` defines the two-party combat model (players, battle state,
//! log) and the pure resolver functions that compute the next state from an
//! action. Nothing here performs I/O or awaits: randomness is injected through
//! [`BattleRng`] and timestamps are supplied by the caller, so identical inputs
//! always reproduce identical battles.
pub mod action;
pub mod combat;
pub mod error;
pub mod player;
pub mod rng;
pub mod side;
pub mod state;

pub use action::ActionKind;
pub use combat::{AttackRolls, Resolution, perform_attack, perform_rest, resolve};
pub use error::BattleError;
pub use player::{Player, ResourceSnapshot};
pub use rng::{BattleRng, PcgRng, ScriptedRng};
pub use side::{Side, SideMap};
pub use state::{BattleSnapshot, BattleState, Effects, Flash, LogEntry, Phase};
