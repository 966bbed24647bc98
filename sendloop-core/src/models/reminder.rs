use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};

/// Per-task reminder settings, consumed by the external notification
/// scheduler. The core only validates and persists them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderSettings {
    pub task_id: Uuid,
    pub enabled: bool,
    /// `HH:MM`, 24-hour. None when the reminder is disabled.
    pub time: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetReminderInput {
    pub task_id: Uuid,
    pub enabled: bool,
    pub time: Option<String>,
}

/// Checks a `HH:MM` 24-hour clock value (hours 0-23, minutes 0-59).
pub fn validate_reminder_time(value: &str) -> CoreResult<()> {
    let invalid = || CoreError::validation("time", format!("expected HH:MM, got {value:?}"));
    let (hours, minutes) = value.split_once(':').ok_or_else(invalid)?;
    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }
    Ok(())
}
