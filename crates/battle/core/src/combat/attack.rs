use super::{
    AttackRolls, MAX_ATTACK_COST, MAX_ATTACK_GAIN, MIN_ATTACK_COST, Resolution, resources_after,
};
use crate::action::ActionKind;
use crate::rng::BattleRng;
use crate::side::Side;
use crate::state::{BattleState, Effects, Flash, LogEntry};

/// Resolves an attack by `actor` against the opposing side.
///
/// # Formula
///
/// ```text
/// cost    ∈ [3, min(10, stamina)]
/// raw     ∈ [0, power]
/// blocked ∈ [0, target.defense]
/// gain    ∈ [0, 10]
/// damage  = max(0, raw - blocked)
/// ```
///
/// With less than 3 stamina the attack is refused: player resources are left
/// untouched and the entry only carries an explanatory `info`.
pub fn perform_attack(
    state: &BattleState,
    actor: Side,
    rng: &mut (impl BattleRng + ?Sized),
    timestamp: i64,
) -> Resolution {
    let target = actor.opponent();
    let attacker = state.player(actor);

    if attacker.stamina < MIN_ATTACK_COST {
        let mut next = state.clone();
        next.effects = Effects::default();
        return Resolution {
            state: next,
            entry: LogEntry::new(timestamp, actor, ActionKind::Attack).with_info(format!(
                "insufficient stamina ({} < {})",
                attacker.stamina, MIN_ATTACK_COST
            )),
            killed: false,
            rolls: None,
        };
    }

    // Draw order is part of the replay contract: cost, raw, blocked, gain.
    let rolls = AttackRolls {
        cost: rng.range(MIN_ATTACK_COST, MAX_ATTACK_COST.min(attacker.stamina)),
        raw: rng.range(0, attacker.power),
        blocked: rng.range(0, state.player(target).defense),
        gain: rng.range(0, MAX_ATTACK_GAIN),
    };
    let damage = rolls.damage();

    let mut next = state.clone();
    next.effects = Effects::default();

    let a = &mut next.players[actor];
    a.stamina = a.stamina.saturating_sub(rolls.cost);
    a.money = a.money.saturating_add(rolls.gain);

    let t = &mut next.players[target];
    t.hp = t.hp.saturating_sub(damage);
    let killed = t.is_defeated();

    next.effects.flash[actor] = Some(Flash {
        kind: ActionKind::Attack,
        value: damage,
        cost: Some(rolls.cost),
        gain: Some(rolls.gain),
    });
    next.effects.hit[target] = -(damage as i32);

    let entry = LogEntry::new(timestamp, actor, ActionKind::Attack)
        .with_target(target)
        .with_value(damage)
        .with_info(format!(
            "cost {} sta, gain {} gold, raw {}, blocked {}",
            rolls.cost, rolls.gain, rolls.raw, rolls.blocked
        ))
        .with_after(resources_after(&next));

    Resolution {
        state: next,
        entry,
        killed,
        rolls: Some(rolls),
    }
}
