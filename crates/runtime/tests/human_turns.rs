mod common;

use std::time::Duration;

use battle_core::{ActionKind, ScriptedRng, Side};
use battle_runtime::{Controller, RoomEvent, RoomId, RoomManager, RuntimeError};
use common::{config, next_action, next_event, observe};

fn human_vs_automated() -> battle_runtime::BattleConfig {
    config().with_controller(Side::SideA, Controller::Human)
}

#[tokio::test(start_paused = true)]
async fn scheduler_waits_for_human_without_timeout() {
    let manager = RoomManager::default();
    let room = RoomId::from("r");
    let mut rx = observe(&manager, &room).await;
    manager
        .start_with_config(&room, human_vs_automated())
        .await
        .unwrap();
    next_event(&mut rx).await;

    tokio::time::sleep(Duration::from_secs(3600)).await;
    assert!(rx.try_recv().is_err(), "human turn must not resolve by itself");

    manager
        .submit_action(&room, Side::SideA, ActionKind::Rest)
        .await
        .unwrap();
    let (entry, snapshot) = next_action(&mut rx).await;
    assert_eq!(entry.actor, Side::SideA);
    assert_eq!(entry.action, ActionKind::Rest);
    assert_eq!(snapshot.turn, Side::SideB);

    // The automated side answers after its turn delay and hands the turn back.
    let (entry, snapshot) = next_action(&mut rx).await;
    assert_eq!(entry.actor, Side::SideB);
    assert_eq!(snapshot.turn, Side::SideA);
    assert_eq!(snapshot.round, 2);
}

#[tokio::test(start_paused = true)]
async fn only_the_side_to_act_may_submit_once() {
    let manager = RoomManager::default();
    let room = RoomId::from("r");
    let mut rx = observe(&manager, &room).await;
    manager
        .start_with_config(&room, human_vs_automated())
        .await
        .unwrap();
    next_event(&mut rx).await;

    let wrong_side = manager
        .submit_action(&room, Side::SideB, ActionKind::Attack)
        .await
        .unwrap_err();
    assert_eq!(wrong_side.kind(), "not_awaiting_action");

    manager
        .submit_action(&room, Side::SideA, ActionKind::Attack)
        .await
        .unwrap();
    let duplicate = manager
        .submit_action(&room, Side::SideA, ActionKind::Attack)
        .await
        .unwrap_err();
    assert!(matches!(
        duplicate,
        RuntimeError::NotAwaitingAction {
            side: Side::SideA,
            ..
        }
    ));

    let (entry, _) = next_action(&mut rx).await;
    assert_eq!(entry.action, ActionKind::Attack);
    let (entry, _) = next_action(&mut rx).await;
    assert_eq!(entry.actor, Side::SideB);
}

#[tokio::test(start_paused = true)]
async fn actions_need_a_running_battle() {
    let manager = RoomManager::default();
    let room = RoomId::from("r");
    let mut rx = observe(&manager, &room).await;

    let idle = manager
        .submit_action(&room, Side::SideA, ActionKind::Attack)
        .await
        .unwrap_err();
    assert_eq!(idle.kind(), "no_active_battle");

    manager
        .start_with_config(&room, human_vs_automated())
        .await
        .unwrap();
    next_event(&mut rx).await;
    manager.stop(&room).await.unwrap();
    assert_eq!(next_event(&mut rx).await, RoomEvent::State(None));

    let stopped = manager
        .submit_action(&room, Side::SideA, ActionKind::Attack)
        .await
        .unwrap_err();
    assert!(matches!(stopped, RuntimeError::NoActiveBattle(_)));
}

#[tokio::test(start_paused = true)]
async fn two_humans_take_turns() {
    let manager = RoomManager::default();
    let room = RoomId::from("r");
    let mut rx = observe(&manager, &room).await;
    let config = config()
        .with_controller(Side::SideA, Controller::Human)
        .with_controller(Side::SideB, Controller::Human);
    manager.start_with_config(&room, config).await.unwrap();
    next_event(&mut rx).await;

    let mut actor = Side::SideA;
    for resolved in 1..=4 {
        manager
            .submit_action(&room, actor, ActionKind::Attack)
            .await
            .unwrap();
        let (entry, snapshot) = next_action(&mut rx).await;
        assert_eq!(entry.actor, actor);
        assert_eq!(entry.target, Some(actor.opponent()));
        assert_eq!(snapshot.log_len, resolved);
        actor = actor.opponent();
    }
}

#[tokio::test(start_paused = true)]
async fn exhausted_attacker_still_uses_its_turn() {
    // Attacks cost 10 and deal nothing; rests restore nothing.
    let manager = RoomManager::builder()
        .rng_factory(|_| Box::new(ScriptedRng::new([10, 0, 0, 0, 0].into_iter().cycle().take(64))))
        .build();
    let room = RoomId::from("r");
    let mut rx = observe(&manager, &room).await;
    let config = config()
        .with_controller(Side::SideA, Controller::Human)
        .with_controller(Side::SideB, Controller::Human);
    manager.start_with_config(&room, config).await.unwrap();
    next_event(&mut rx).await;

    for _ in 0..5 {
        manager
            .submit_action(&room, Side::SideA, ActionKind::Attack)
            .await
            .unwrap();
        next_action(&mut rx).await;
        manager
            .submit_action(&room, Side::SideB, ActionKind::Rest)
            .await
            .unwrap();
        next_action(&mut rx).await;
    }

    manager
        .submit_action(&room, Side::SideA, ActionKind::Attack)
        .await
        .unwrap();
    let (entry, snapshot) = next_action(&mut rx).await;

    assert_eq!(entry.actor, Side::SideA);
    assert_eq!(entry.action, ActionKind::Attack);
    assert_eq!(entry.value, None);
    assert_eq!(entry.target, None);
    assert!(entry.info.as_deref().unwrap().contains("insufficient stamina"));
    assert_eq!(snapshot.log_len, 11);
    assert_eq!(snapshot.turn, Side::SideB);
    assert_eq!(snapshot.round, 6);
    assert_eq!(snapshot.players[Side::SideA].stamina, 0);
    assert_eq!(snapshot.players[Side::SideB].hp, 100);
}
