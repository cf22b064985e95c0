//! Errors raised while parsing battle identifiers at a call boundary.

/// Identifier validation failures.
///
/// The resolver itself never fails: running out of stamina is an ordinary
/// outcome recorded in the log. These errors only cover input that names
/// something the battle does not know about.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    #[error("unknown side `{0}` (expected `sideA` or `sideB`)")]
    UnknownSide(String),

    #[error("unknown action `{0}` (expected `ATTACK` or `REST`)")]
    UnknownAction(String),
}
