//! Inbound request payloads and their validation.
use std::time::Duration;

use battle_core::{Side, SideMap};
use serde::{Deserialize, Serialize};

use super::errors::{Result, RuntimeError};
use crate::config::{BattleConfig, Controller, RuntimeConfig};

/// Payload of a `start` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartRequest {
    pub players: SideMap<PlayerInit>,
    #[serde(default)]
    pub config: StartConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerInit {
    pub name: String,
}

/// Per-side values of a `start` request; a side left out keeps its default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SideOverrides<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side_a: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side_b: Option<T>,
}

impl<T> SideOverrides<T> {
    fn apply(self, target: &mut SideMap<T>) {
        if let Some(value) = self.side_a {
            target.side_a = value;
        }
        if let Some(value) = self.side_b {
            target.side_b = value;
        }
    }
}

/// Optional knobs of a `start` request; absent fields take defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StartConfig {
    pub prompts: Option<SideOverrides<String>>,
    pub controllers: Option<SideOverrides<Controller>>,
    pub price_multiplier: Option<f64>,
    pub turn_delay_ms: Option<u64>,
    pub use_automated_decisions: Option<bool>,
    pub decision_throttle_n: Option<u32>,
    pub first_turn: Option<Side>,
    pub seed: Option<u64>,
}

impl StartRequest {
    /// Converts the payload into a validated [`BattleConfig`].
    pub fn into_config(self, runtime: &RuntimeConfig) -> Result<BattleConfig> {
        let StartRequest { players, config } = self;

        let mut battle = BattleConfig::new(SideMap::new(
            players.side_a.name.trim().to_owned(),
            players.side_b.name.trim().to_owned(),
        ));
        battle.turn_delay = config
            .turn_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(runtime.default_turn_delay);
        if let Some(prompts) = config.prompts {
            prompts.apply(&mut battle.prompts);
        }
        if let Some(controllers) = config.controllers {
            controllers.apply(&mut battle.controllers);
        }
        if let Some(multiplier) = config.price_multiplier {
            battle.price_multiplier = multiplier;
        }
        if let Some(enabled) = config.use_automated_decisions {
            battle.use_automated_decisions = enabled;
        }
        if let Some(n) = config.decision_throttle_n {
            battle.decision_throttle_n = n;
        }
        if let Some(first) = config.first_turn {
            battle.first_turn = first;
        }
        battle.seed = config.seed;

        battle.validate()?;
        Ok(battle)
    }
}

impl BattleConfig {
    /// Rejects configurations a battle cannot run with.
    pub fn validate(&self) -> Result<()> {
        for (side, name) in self.names.iter() {
            if name.trim().is_empty() {
                return Err(RuntimeError::InvalidConfig(format!(
                    "player name for {side} is empty"
                )));
            }
        }
        if !self.price_multiplier.is_finite() || self.price_multiplier <= 0.0 {
            return Err(RuntimeError::InvalidConfig(format!(
                "priceMultiplier must be a positive number (got {})",
                self.price_multiplier
            )));
        }
        if self.decision_throttle_n == 0 {
            return Err(RuntimeError::InvalidConfig(
                "decisionThrottleN must be at least 1".to_owned(),
            ));
        }
        if self.use_automated_decisions {
            for side in Side::ALL {
                if self.is_automated(side) && self.prompts[side].trim().is_empty() {
                    return Err(RuntimeError::InvalidConfig(format!(
                        "missing prompt for automated {side}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Acknowledgement of a successful `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartReceipt {
    /// Seed of the new battle; replaying it with the same config reproduces it.
    pub seed: u64,
    /// A battle in progress was discarded to make room for this one.
    pub restarted: bool,
}
