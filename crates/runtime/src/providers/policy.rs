//! Per-battle decision policy for automated sides.
//!
//! The policy consults the model provider on every Nth automated turn of a
//! side and the heuristic otherwise. Model calls are bounded by a timeout;
//! any failure is logged and replaced by the heuristic's choice so a turn
//! always produces an action.

use std::sync::Arc;
use std::time::Duration;

use battle_core::ActionKind;
use serde::Serialize;
use tracing::{debug, warn};

use super::HeuristicProvider;
use crate::api::{DecisionProvider, DecisionRequest, ProviderError};

/// Where an automated action came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DecisionSource {
    Heuristic,
    Model,
    /// The model was due but failed or timed out.
    Fallback,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    pub action: ActionKind,
    pub source: DecisionSource,
}

pub struct DecisionPolicy {
    heuristic: HeuristicProvider,
    model: Option<Arc<dyn DecisionProvider>>,
    throttle_n: u32,
    timeout: Duration,
}

impl DecisionPolicy {
    /// A policy that never leaves the process.
    pub fn heuristic_only() -> Self {
        Self {
            heuristic: HeuristicProvider,
            model: None,
            throttle_n: 1,
            timeout: Duration::ZERO,
        }
    }

    pub fn new(model: Arc<dyn DecisionProvider>, throttle_n: u32, timeout: Duration) -> Self {
        Self {
            heuristic: HeuristicProvider,
            model: Some(model),
            throttle_n: throttle_n.max(1),
            timeout,
        }
    }

    /// Whether the model is due on a side's `turn_index`-th automated turn (0-based).
    pub fn uses_model_on(&self, turn_index: u32) -> bool {
        self.model.is_some() && turn_index % self.throttle_n == 0
    }

    pub async fn decide(&self, request: &DecisionRequest<'_>, turn_index: u32) -> Decision {
        let heuristic = self.heuristic.choose(request.side, request.state);

        let model = match &self.model {
            Some(model) if self.uses_model_on(turn_index) => model,
            _ => {
                return Decision {
                    action: heuristic,
                    source: DecisionSource::Heuristic,
                };
            }
        };

        let outcome = match tokio::time::timeout(self.timeout, model.decide(request)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(self.timeout)),
        };

        match outcome {
            Ok(action) => {
                debug!(
                    target: "runtime::decision",
                    side = %request.side,
                    %action,
                    turn_index,
                    "Model decision"
                );
                Decision {
                    action,
                    source: DecisionSource::Model,
                }
            }
            Err(error) => {
                warn!(
                    target: "runtime::decision",
                    side = %request.side,
                    %error,
                    fallback = %heuristic,
                    "Model decision failed, using heuristic"
                );
                Decision {
                    action: heuristic,
                    source: DecisionSource::Fallback,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use battle_core::{BattleState, Side, SideMap};

    struct Fixed(Result<ActionKind, ()>);

    #[async_trait]
    impl DecisionProvider for Fixed {
        async fn decide(&self, _: &DecisionRequest<'_>) -> Result<ActionKind, ProviderError> {
            self.0.map_err(|_| ProviderError::EmptyResponse)
        }
    }

    struct Stalled;

    #[async_trait]
    impl DecisionProvider for Stalled {
        async fn decide(&self, _: &DecisionRequest<'_>) -> Result<ActionKind, ProviderError> {
            std::future::pending().await
        }
    }

    fn state() -> BattleState {
        BattleState::new(SideMap::new("a".into(), "b".into()), Side::SideA)
    }

    fn request(state: &BattleState) -> DecisionRequest<'_> {
        DecisionRequest {
            side: Side::SideA,
            state,
            persona: "persona",
            price_multiplier: 1.0,
        }
    }

    #[test]
    fn throttle_selects_every_nth_turn() {
        let policy = DecisionPolicy::new(Arc::new(Fixed(Ok(ActionKind::Rest))), 3, Duration::from_secs(1));
        let due: Vec<u32> = (0..7).filter(|i| policy.uses_model_on(*i)).collect();
        assert_eq!(due, vec![0, 3, 6]);

        assert!(!DecisionPolicy::heuristic_only().uses_model_on(0));
    }

    #[tokio::test]
    async fn model_answer_is_used_when_due() {
        let state = state();
        let policy = DecisionPolicy::new(Arc::new(Fixed(Ok(ActionKind::Rest))), 2, Duration::from_secs(1));

        let due = policy.decide(&request(&state), 0).await;
        assert_eq!(due.action, ActionKind::Rest);
        assert_eq!(due.source, DecisionSource::Model);

        let skipped = policy.decide(&request(&state), 1).await;
        assert_eq!(skipped.action, ActionKind::Attack);
        assert_eq!(skipped.source, DecisionSource::Heuristic);
    }

    #[tokio::test]
    async fn provider_error_falls_back() {
        let state = state();
        let policy = DecisionPolicy::new(Arc::new(Fixed(Err(()))), 1, Duration::from_secs(1));

        let decision = policy.decide(&request(&state), 0).await;

        assert_eq!(decision.action, ActionKind::Attack);
        assert_eq!(decision.source, DecisionSource::Fallback);
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_model_times_out() {
        let state = state();
        let policy = DecisionPolicy::new(Arc::new(Stalled), 1, Duration::from_millis(8_000));

        let started = tokio::time::Instant::now();
        let decision = policy.decide(&request(&state), 0).await;

        assert_eq!(decision.source, DecisionSource::Fallback);
        assert!(started.elapsed() >= Duration::from_millis(8_000));
    }
}
