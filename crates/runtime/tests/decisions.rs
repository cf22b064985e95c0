mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use battle_core::{ActionKind, Side, SideMap};
use battle_runtime::{
    BattleConfig, DecisionProvider, DecisionRequest, ProviderError, ReasoningClient, RoomId,
    RoomManager, RuntimeConfig,
};
use common::{config, next_action, next_event, observe};

/// Answers every prompt with the same text and counts the calls.
struct Scripted {
    reply: Result<&'static str, ()>,
    delay: Duration,
    calls: AtomicUsize,
}

impl Scripted {
    fn replying(reply: &'static str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: Err(()),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        })
    }

    fn stalling(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok("REST"),
            delay,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl ReasoningClient for Scripted {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        assert!(prompt.contains("ATTACK or REST"));
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.reply
            .map(str::to_owned)
            .map_err(|_| ProviderError::Status {
                status: 503,
                body: "unavailable".into(),
            })
    }
}

fn model_config(throttle_n: u32) -> BattleConfig {
    let mut config = config();
    config.use_automated_decisions = true;
    config.decision_throttle_n = throttle_n;
    config.prompts = SideMap::new("Stay calm.".into(), "Be bold.".into());
    config
}

async fn first_actions(manager: &RoomManager, config: BattleConfig, count: usize) -> Vec<ActionKind> {
    let room = RoomId::from("r");
    let mut rx = observe(manager, &room).await;
    manager.start_with_config(&room, config).await.unwrap();
    next_event(&mut rx).await;

    let mut actions = Vec::with_capacity(count);
    for _ in 0..count {
        let (entry, _) = next_action(&mut rx).await;
        actions.push(entry.action);
    }
    actions
}

#[tokio::test(start_paused = true)]
async fn model_choice_drives_automated_turns() {
    let client = Scripted::replying("I think REST is wise.");
    let manager = RoomManager::builder()
        .reasoning_client(client.clone())
        .build();

    let actions = first_actions(&manager, model_config(1), 4).await;

    assert_eq!(actions, vec![ActionKind::Rest; 4]);
    assert_eq!(client.calls.load(Ordering::SeqCst), 4);
}

#[tokio::test(start_paused = true)]
async fn throttle_consults_model_every_nth_turn_per_side() {
    let client = Scripted::replying("rest");
    let manager = RoomManager::builder()
        .reasoning_client(client.clone())
        .build();

    let actions = first_actions(&manager, model_config(2), 6).await;

    // Turn indices per side: 0 (model), 1 (heuristic), 2 (model).
    assert_eq!(
        actions,
        vec![
            ActionKind::Rest,
            ActionKind::Rest,
            ActionKind::Attack,
            ActionKind::Attack,
            ActionKind::Rest,
            ActionKind::Rest,
        ]
    );
    assert_eq!(client.calls.load(Ordering::SeqCst), 4);
}

#[tokio::test(start_paused = true)]
async fn failing_model_falls_back_to_heuristic() {
    let client = Scripted::failing();
    let manager = RoomManager::builder()
        .reasoning_client(client.clone())
        .build();

    let actions = first_actions(&manager, model_config(1), 2).await;

    assert_eq!(actions, vec![ActionKind::Attack; 2]);
    assert_eq!(client.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn slow_model_times_out_without_stalling_the_room() {
    let client = Scripted::stalling(Duration::from_secs(600));
    let runtime = RuntimeConfig {
        decision_timeout: Duration::from_secs(8),
        ..RuntimeConfig::default()
    };
    let manager = RoomManager::builder()
        .config(runtime)
        .reasoning_client(client)
        .build();

    let started = tokio::time::Instant::now();
    let actions = first_actions(&manager, model_config(1), 2).await;

    assert_eq!(actions, vec![ActionKind::Attack; 2]);
    // Two turn delays plus two timeouts, nowhere near the model's own latency.
    assert!(started.elapsed() < Duration::from_secs(60));
}

#[tokio::test(start_paused = true)]
async fn missing_client_runs_heuristic_only() {
    let manager = RoomManager::default();

    let actions = first_actions(&manager, model_config(1), 2).await;

    assert_eq!(actions, vec![ActionKind::Attack; 2]);
}

/// Side A always attacks, side B always rests.
struct BySide;

#[async_trait]
impl DecisionProvider for BySide {
    async fn decide(&self, request: &DecisionRequest<'_>) -> Result<ActionKind, ProviderError> {
        Ok(match request.side {
            Side::SideA => ActionKind::Attack,
            Side::SideB => ActionKind::Rest,
        })
    }
}

#[tokio::test(start_paused = true)]
async fn custom_decision_provider_replaces_the_model() {
    let manager = RoomManager::builder()
        .decision_provider(Arc::new(BySide))
        .build();

    let actions = first_actions(&manager, model_config(1), 4).await;

    assert_eq!(
        actions,
        vec![
            ActionKind::Attack,
            ActionKind::Rest,
            ActionKind::Attack,
            ActionKind::Rest,
        ]
    );
}
