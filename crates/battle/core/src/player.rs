//! Combatant resources.

/// One combatant's resources.
///
/// Invariants `hp <= max_hp` and `stamina <= max_stamina` are maintained by the
/// resolver; unsigned fields keep every resource non-negative.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Player {
    pub name: String,
    pub hp: u32,
    pub max_hp: u32,
    pub stamina: u32,
    pub max_stamina: u32,
    pub money: u32,
    pub power: u32,
    pub defense: u32,
}

impl Player {
    pub const BASE_HP: u32 = 100;
    pub const BASE_STAMINA: u32 = 50;
    pub const BASE_POWER: u32 = 15;
    pub const BASE_DEFENSE: u32 = 10;

    /// Creates a combatant with the baseline stats every battle starts from.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hp: Self::BASE_HP,
            max_hp: Self::BASE_HP,
            stamina: Self::BASE_STAMINA,
            max_stamina: Self::BASE_STAMINA,
            money: 0,
            power: Self::BASE_POWER,
            defense: Self::BASE_DEFENSE,
        }
    }

    #[inline]
    pub fn is_defeated(&self) -> bool {
        self.hp == 0
    }

    /// Checks the resource invariants.
    pub fn is_within_bounds(&self) -> bool {
        self.hp <= self.max_hp && self.stamina <= self.max_stamina
    }

    pub fn resources(&self) -> ResourceSnapshot {
        ResourceSnapshot {
            hp: self.hp,
            stamina: self.stamina,
            money: self.money,
        }
    }
}

/// The volatile part of a player, recorded in log entries after each action.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceSnapshot {
    pub hp: u32,
    pub stamina: u32,
    pub money: u32,
}
