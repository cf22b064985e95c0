use crate::action::ActionKind;
use crate::side::SideMap;

/// Visual hint describing what a side just did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Flash {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: ActionKind,
    /// Damage dealt or stamina restored.
    pub value: u32,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub cost: Option<u32>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub gain: Option<u32>,
}

/// Ephemeral per-action presentation fields.
///
/// Only the most recent action is represented; they carry no game meaning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Effects {
    pub flash: SideMap<Option<Flash>>,
    /// Negative hp delta taken by each side (0 when untouched).
    pub hit: SideMap<i32>,
}

impl Effects {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
