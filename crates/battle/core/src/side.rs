use std::ops::{Index, IndexMut};
use std::str::FromStr;

use crate::error::BattleError;

/// One of the two participants of a battle.
///
/// The set of sides is fixed for the lifetime of a battle, so it is a closed
/// enum rather than a free-form id. Wire names are `sideA` / `sideB`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[strum(serialize_all = "camelCase")]
pub enum Side {
    #[default]
    SideA,
    SideB,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::SideA, Side::SideB];

    /// Returns the other participant.
    #[inline]
    pub const fn opponent(self) -> Self {
        match self {
            Side::SideA => Side::SideB,
            Side::SideB => Side::SideA,
        }
    }
}

impl FromStr for Side {
    type Err = BattleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sideA" => Ok(Side::SideA),
            "sideB" => Ok(Side::SideB),
            other => Err(BattleError::UnknownSide(other.to_owned())),
        }
    }
}

/// Per-side storage, serialized as `{ "sideA": .., "sideB": .. }`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SideMap<T> {
    pub side_a: T,
    pub side_b: T,
}

impl<T> SideMap<T> {
    pub const fn new(side_a: T, side_b: T) -> Self {
        Self { side_a, side_b }
    }

    /// Builds a map by evaluating `f` once per side.
    pub fn from_fn(mut f: impl FnMut(Side) -> T) -> Self {
        Self {
            side_a: f(Side::SideA),
            side_b: f(Side::SideB),
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(Side, &T) -> U) -> SideMap<U> {
        SideMap {
            side_a: f(Side::SideA, &self.side_a),
            side_b: f(Side::SideB, &self.side_b),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        [(Side::SideA, &self.side_a), (Side::SideB, &self.side_b)].into_iter()
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &T {
        match side {
            Side::SideA => &self.side_a,
            Side::SideB => &self.side_b,
        }
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        match side {
            Side::SideA => &mut self.side_a,
            Side::SideB => &mut self.side_b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_names_and_rejects_others() {
        assert_eq!("sideA".parse::<Side>(), Ok(Side::SideA));
        assert_eq!("sideB".parse::<Side>(), Ok(Side::SideB));
        assert_eq!(
            "ai".parse::<Side>(),
            Err(BattleError::UnknownSide("ai".into()))
        );
        assert_eq!(Side::SideB.to_string(), "sideB");
    }

    #[test]
    fn opponent_is_an_involution() {
        for side in Side::ALL {
            assert_ne!(side, side.opponent());
            assert_eq!(side, side.opponent().opponent());
        }
    }

    #[test]
    fn index_by_side() {
        let mut map = SideMap::new(1, 2);
        map[Side::SideB] += 10;
        assert_eq!(map[Side::SideA], 1);
        assert_eq!(map[Side::SideB], 12);
    }
}
