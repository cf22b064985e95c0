/// The two moves available to a side on its turn.
///
/// Parsing is case-insensitive (`"attack"`, `"ATTACK"`); the canonical wire
/// form is upper case.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum ActionKind {
    Attack,
    Rest,
}

impl ActionKind {
    /// Parses an action name, mapping failures to [`crate::BattleError`].
    pub fn parse(name: &str) -> Result<Self, crate::BattleError> {
        name.trim()
            .parse()
            .map_err(|_| crate::BattleError::UnknownAction(name.to_owned()))
    }
}
