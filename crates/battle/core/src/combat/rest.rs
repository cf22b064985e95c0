use super::{MAX_REST_RESTORE, Resolution, resources_after};
use crate::action::ActionKind;
use crate::rng::BattleRng;
use crate::side::Side;
use crate::state::{BattleState, Effects, Flash, LogEntry};

/// Resolves a rest: restores `[0, 10]` stamina, clamped to the maximum.
pub fn perform_rest(
    state: &BattleState,
    actor: Side,
    rng: &mut (impl BattleRng + ?Sized),
    timestamp: i64,
) -> Resolution {
    let restored = rng.range(0, MAX_REST_RESTORE);

    let mut next = state.clone();
    next.effects = Effects::default();

    let a = &mut next.players[actor];
    a.stamina = a.stamina.saturating_add(restored).min(a.max_stamina);

    next.effects.flash[actor] = Some(Flash {
        kind: ActionKind::Rest,
        value: restored,
        cost: None,
        gain: None,
    });

    let entry = LogEntry::new(timestamp, actor, ActionKind::Rest)
        .with_value(restored)
        .with_after(resources_after(&next));

    Resolution {
        state: next,
        entry,
        killed: false,
        rolls: None,
    }
}
