use crate::state::{BattleState, LogEntry};

/// The four independent rolls behind one attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackRolls {
    /// Stamina spent, in `[3, min(10, stamina)]`.
    pub cost: u32,
    /// Damage before defense, in `[0, power]`.
    pub raw: u32,
    /// Damage absorbed, in `[0, target defense]`.
    pub blocked: u32,
    /// Money earned, in `[0, 10]`.
    pub gain: u32,
}

impl AttackRolls {
    /// `max(0, raw - blocked)`
    #[inline]
    pub fn damage(&self) -> u32 {
        self.raw.saturating_sub(self.blocked)
    }
}

/// Output of a resolver operation.
#[derive(Clone, Debug)]
pub struct Resolution {
    pub state: BattleState,
    pub entry: LogEntry,
    /// The target's hp reached 0.
    pub killed: bool,
    /// Rolls of a performed attack; `None` for rests and refused attacks.
    pub rolls: Option<AttackRolls>,
}
