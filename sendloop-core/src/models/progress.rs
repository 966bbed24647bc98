use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A record that the habit was completed on a specific calendar date.
/// At most one entry exists per (task, date); entries are never updated,
/// only created and deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEntry {
    pub id: Uuid,
    pub task_id: Uuid,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}
