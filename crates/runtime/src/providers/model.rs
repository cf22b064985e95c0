//! Decision provider backed by an external reasoning model.

use std::fmt::Write as _;
use std::sync::Arc;

use async_trait::async_trait;
use battle_core::ActionKind;

use crate::api::{DecisionProvider, DecisionRequest, ProviderError};

/// Transport to a text-completion service.
///
/// Implementations only move text; prompt construction and reply parsing
/// live in [`ModelProvider`].
#[async_trait]
pub trait ReasoningClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Asks a reasoning model to pick the next action in character.
#[derive(Clone)]
pub struct ModelProvider {
    client: Arc<dyn ReasoningClient>,
}

impl ModelProvider {
    pub fn new(client: Arc<dyn ReasoningClient>) -> Self {
        Self { client }
    }

    /// Renders the persona, the rules, and both sides' resources.
    pub fn build_prompt(request: &DecisionRequest<'_>) -> String {
        let state = request.state;
        let me = state.player(request.side);
        let foe = state.player(request.side.opponent());

        let mut prompt = String::new();
        let persona = request.persona.trim();
        if !persona.is_empty() {
            let _ = writeln!(prompt, "{persona}\n");
        }
        let _ = writeln!(
            prompt,
            "You control {} in a turn-based duel. Round {}.",
            me.name, state.round
        );
        prompt.push_str(
            "Rules: ATTACK costs 3-10 stamina (needs at least 3), deals 0-power damage \
             minus 0-defense blocked, and earns 0-10 gold. REST restores 0-10 stamina. \
             A side at 0 HP loses.\n",
        );
        let _ = writeln!(prompt, "Price multiplier: {}", request.price_multiplier);
        for (label, player) in [("You", me), ("Opponent", foe)] {
            let _ = writeln!(
                prompt,
                "{label} ({}): HP {}/{}, stamina {}/{}, gold {}, power {}, defense {}",
                player.name,
                player.hp,
                player.max_hp,
                player.stamina,
                player.max_stamina,
                player.money,
                player.power,
                player.defense
            );
        }
        if let Some(last) = state.log().last() {
            if let Ok(json) = serde_json::to_string(last) {
                let _ = writeln!(prompt, "Last action: {json}");
            }
        }
        prompt.push_str("Answer with exactly one word: ATTACK or REST.");
        prompt
    }

    /// Reads the first `ATTACK` or `REST` word from a model reply.
    pub fn parse_action(reply: &str) -> Result<ActionKind, ProviderError> {
        if reply.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        reply
            .split(|c: char| !c.is_ascii_alphabetic())
            .find_map(|word| match word.to_ascii_uppercase().as_str() {
                "ATTACK" => Some(ActionKind::Attack),
                "REST" => Some(ActionKind::Rest),
                _ => None,
            })
            .ok_or_else(|| ProviderError::Unparseable(truncate(reply, 80)))
    }
}

#[async_trait]
impl DecisionProvider for ModelProvider {
    async fn decide(&self, request: &DecisionRequest<'_>) -> Result<ActionKind, ProviderError> {
        let prompt = Self::build_prompt(request);
        tracing::trace!(
            target: "runtime::decision",
            side = %request.side,
            prompt_len = prompt.len(),
            "Consulting reasoning model"
        );
        let reply = self.client.complete(&prompt).await?;
        Self::parse_action(&reply)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.trim().chars().take(max_chars).collect()
}
