use serde::{Deserialize, Serialize};

/// Subscription tier supplied by the external billing collaborator.
/// The core treats it as an opaque two-valued signal.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    #[default]
    Free,
    Pro,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Pro => "pro",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "free" => Some(Self::Free),
            "pro" => Some(Self::Pro),
            _ => None,
        }
    }
}

/// Feature limits attached to a tier. Fixed per tier, no side effects.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TierLimits {
    pub max_active_tasks: usize,
    /// How many visual types are unlocked, counted from the lowest
    /// numeric encoding up.
    pub visual_types: usize,
    pub notification_customization: bool,
    pub cloud_backup: bool,
    pub csv_export: bool,
    pub continue_tokens_per_cycle: u8,
}
