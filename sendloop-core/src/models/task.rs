use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};

pub const MIN_CYCLE_LENGTH: i64 = 3;
pub const MAX_CYCLE_LENGTH: i64 = 180;
pub const MAX_TITLE_CHARS: usize = 100;

/// A user-defined recurring habit with a target cycle length and a visual
/// representation. Titles are stored trimmed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub cycle_length: i64,
    pub visual_type: VisualType,
    pub start_date: NaiveDate,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Growth visualization attached to a task. The numeric encoding is stable
/// and persisted; do not reorder.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VisualType {
    #[default]
    Tree,
    Garden,
    Pet,
    ProgressBar,
}

impl VisualType {
    pub const ALL: [VisualType; 4] = [Self::Tree, Self::Garden, Self::Pet, Self::ProgressBar];

    pub fn as_i64(&self) -> i64 {
        match self {
            Self::Tree => 0,
            Self::Garden => 1,
            Self::Pet => 2,
            Self::ProgressBar => 3,
        }
    }

    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Tree),
            1 => Some(Self::Garden),
            2 => Some(Self::Pet),
            3 => Some(Self::ProgressBar),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tree => "tree",
            Self::Garden => "garden",
            Self::Pet => "pet",
            Self::ProgressBar => "progress_bar",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskInput {
    pub title: String,
    pub cycle_length: i64,
    #[serde(default)]
    pub visual_type: VisualType,
    /// Defaults to today when absent.
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTaskInput {
    pub title: Option<String>,
    pub cycle_length: Option<i64>,
    pub visual_type: Option<VisualType>,
}

impl UpdateTaskInput {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.cycle_length.is_none() && self.visual_type.is_none()
    }
}

/// Trims the title and checks the non-empty / length invariants.
/// Returns the trimmed value that gets persisted.
pub fn validate_title(raw: &str) -> CoreResult<String> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(CoreError::validation("title", "cannot be empty"));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(CoreError::validation(
            "title",
            format!("must be at most {MAX_TITLE_CHARS} characters"),
        ));
    }
    Ok(title.to_string())
}

pub fn validate_cycle_length(days: i64) -> CoreResult<()> {
    if !(MIN_CYCLE_LENGTH..=MAX_CYCLE_LENGTH).contains(&days) {
        return Err(CoreError::validation(
            "cycle_length",
            format!("must be between {MIN_CYCLE_LENGTH} and {MAX_CYCLE_LENGTH} days"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_trimmed_once() {
        assert_eq!(validate_title("  Reading Books  ").unwrap(), "Reading Books");
    }

    #[test]
    fn empty_and_whitespace_titles_are_rejected() {
        assert!(validate_title("").is_err());
        assert!(validate_title("   ").is_err());
    }

    #[test]
    fn title_length_is_counted_in_chars_after_trim() {
        let exact = "x".repeat(100);
        assert!(validate_title(&exact).is_ok());
        let too_long = "x".repeat(101);
        assert!(validate_title(&too_long).is_err());
        // Surrounding whitespace does not count against the limit.
        let padded = format!("  {exact}  ");
        assert!(validate_title(&padded).is_ok());
    }

    #[test]
    fn cycle_length_bounds() {
        assert!(validate_cycle_length(2).is_err());
        assert!(validate_cycle_length(3).is_ok());
        assert!(validate_cycle_length(180).is_ok());
        assert!(validate_cycle_length(181).is_err());
    }

    #[test]
    fn visual_type_encoding_round_trips() {
        for vt in VisualType::ALL {
            assert_eq!(VisualType::from_i64(vt.as_i64()), Some(vt));
        }
        assert_eq!(VisualType::from_i64(4), None);
        assert_eq!(VisualType::from_i64(-1), None);
    }
}
