use crate::action::ActionKind;
use crate::player::ResourceSnapshot;
use crate::side::{Side, SideMap};

/// One resolved action, immutable once appended to the battle log.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogEntry {
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub actor: Side,
    pub action: ActionKind,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub target: Option<Side>,
    /// Damage dealt (attack) or stamina restored (rest).
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub value: Option<u32>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub info: Option<String>,
    /// Both sides' resources right after the action.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub after: Option<SideMap<ResourceSnapshot>>,
}

impl LogEntry {
    pub fn new(timestamp: i64, actor: Side, action: ActionKind) -> Self {
        Self {
            timestamp,
            actor,
            action,
            target: None,
            value: None,
            info: None,
            after: None,
        }
    }

    pub fn with_target(mut self, target: Side) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_value(mut self, value: u32) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.info = Some(info.into());
        self
    }

    pub fn with_after(mut self, after: SideMap<ResourceSnapshot>) -> Self {
        self.after = Some(after);
        self
    }
}
