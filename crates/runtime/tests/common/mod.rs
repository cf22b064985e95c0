#![allow(dead_code)]

use std::time::Duration;

use battle_core::{LogEntry, ScriptedRng, SideMap};
use battle_runtime::{BattleConfig, RoomEvent, RoomId, RoomManager, RoomManagerBuilder, RoomMessage};
use tokio::sync::mpsc::UnboundedReceiver;

pub const TURN_DELAY: Duration = Duration::from_millis(500);

pub fn config() -> BattleConfig {
    BattleConfig::new(SideMap::new("Personal".into(), "Player 456".into()))
        .with_turn_delay(TURN_DELAY)
        .with_seed(7)
}

/// Every attack costs 3, hits for 15, is never blocked, and earns nothing.
pub fn lethal_rolls() -> RoomManagerBuilder {
    RoomManager::builder().rng_factory(|_| {
        Box::new(ScriptedRng::new(
            [3, 15, 0, 0].into_iter().cycle().take(4 * 32),
        ))
    })
}

/// Joins `room` with a fresh subscriber and consumes the join snapshot.
pub async fn observe(manager: &RoomManager, room: &RoomId) -> UnboundedReceiver<RoomMessage> {
    let (subscriber, mut rx) = manager.subscriber();
    manager.join(room, subscriber).await;
    let greeting = next_event(&mut rx).await;
    assert!(matches!(greeting, RoomEvent::State(_)), "{greeting:?}");
    rx
}

pub async fn next_event(rx: &mut UnboundedReceiver<RoomMessage>) -> RoomEvent {
    rx.recv().await.expect("room channel closed").event
}

/// Reads one resolved action: its log entry followed by its state snapshot.
pub async fn next_action(
    rx: &mut UnboundedReceiver<RoomMessage>,
) -> (LogEntry, battle_core::BattleSnapshot) {
    let entry = match next_event(rx).await {
        RoomEvent::Log(entry) => entry,
        other => panic!("expected log, got {other:?}"),
    };
    let snapshot = match next_event(rx).await {
        RoomEvent::State(Some(snapshot)) => snapshot,
        other => panic!("expected state, got {other:?}"),
    };
    (entry, snapshot)
}
