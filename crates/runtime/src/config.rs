//! Runtime and per-battle configuration.

use std::env;
use std::time::Duration;

use battle_core::{Side, SideMap};

/// Process-wide settings shared by every room.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Upper bound on one model-backed decision before the heuristic takes over.
    pub decision_timeout: Duration,
    /// Floor applied to the per-battle turn delay of automated sides.
    pub min_turn_delay: Duration,
    /// Turn delay used when a start request does not name one.
    pub default_turn_delay: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            decision_timeout: Duration::from_millis(8_000),
            min_turn_delay: Duration::from_millis(500),
            default_turn_delay: Duration::from_millis(2_500),
        }
    }
}

impl RuntimeConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `DECISION_TIMEOUT_MS` - Model decision timeout (default: 8000)
    /// - `MIN_TURN_DELAY_MS` - Minimum automated turn delay (default: 500)
    /// - `DEFAULT_TURN_DELAY_MS` - Turn delay when a start omits it (default: 2500)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ms) = read_env::<u64>("DECISION_TIMEOUT_MS") {
            config.decision_timeout = Duration::from_millis(ms.max(1));
        }
        if let Some(ms) = read_env::<u64>("MIN_TURN_DELAY_MS") {
            config.min_turn_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = read_env::<u64>("DEFAULT_TURN_DELAY_MS") {
            config.default_turn_delay = Duration::from_millis(ms);
        }

        config
    }
}

/// Who supplies the actions of a side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Controller {
    /// Actions arrive from a client; the scheduler waits without a timeout.
    Human,
    /// Actions are chosen by the room's decision policy after the turn delay.
    #[default]
    Automated,
}

/// Validated configuration of a single battle, fixed at start.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleConfig {
    pub names: SideMap<String>,
    /// Natural-language persona handed to the model for each side.
    pub prompts: SideMap<String>,
    pub controllers: SideMap<Controller>,
    pub price_multiplier: f64,
    pub turn_delay: Duration,
    pub use_automated_decisions: bool,
    /// The model is consulted on every Nth automated turn of a side.
    pub decision_throttle_n: u32,
    pub first_turn: Side,
    /// Explicit battle seed; a random one is drawn when absent.
    pub seed: Option<u64>,
}

impl BattleConfig {
    pub fn new(names: SideMap<String>) -> Self {
        Self {
            names,
            prompts: SideMap::default(),
            controllers: SideMap::default(),
            price_multiplier: 1.0,
            turn_delay: RuntimeConfig::default().default_turn_delay,
            use_automated_decisions: false,
            decision_throttle_n: 1,
            first_turn: Side::SideA,
            seed: None,
        }
    }

    pub fn with_controller(mut self, side: Side, controller: Controller) -> Self {
        self.controllers[side] = controller;
        self
    }

    pub fn with_turn_delay(mut self, delay: Duration) -> Self {
        self.turn_delay = delay;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn is_automated(&self, side: Side) -> bool {
        self.controllers[side] == Controller::Automated
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
