//! The habit service composes the store, the access policy, and the pure
//! derivations behind one explicitly constructed object. The subscription
//! tier is passed per call; the service holds no ambient tier state.

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::db::Database;
use crate::error::{CoreError, CoreResult};
use crate::models::{
    validate_cycle_length, validate_title, CreateTaskInput, ProgressEntry, ReminderSettings,
    SetReminderInput, Task, Tier, UpdateTaskInput,
};
use crate::policy;
use crate::stage::{self, Stage};
use crate::stats::TaskStats;

#[derive(Clone)]
pub struct HabitService {
    db: Database,
}

/// Result of a create under a tier limit. When the tier was already at its
/// active-task cap, the pre-existing active tasks are archived to make room
/// and reported here — the side effect is deliberate and visible, not
/// silent.
#[derive(Debug, Clone, Serialize)]
pub struct CreateTaskOutcome {
    pub task: Task,
    pub auto_archived: Vec<Uuid>,
}

/// Everything the presentation layer renders for one task: the record, its
/// full progress history, the derived statistics, and the current visual
/// stage.
#[derive(Debug, Clone, Serialize)]
pub struct TaskOverview {
    #[serde(flatten)]
    pub task: Task,
    pub progress_entries: Vec<ProgressEntry>,
    #[serde(flatten)]
    pub stats: TaskStats,
    pub stage: Stage,
}

impl HabitService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Creates a task under the given tier. Input is validated before any
    /// side effect so a rejected create never archives anything.
    pub fn create_task(&self, tier: Tier, input: CreateTaskInput) -> CoreResult<CreateTaskOutcome> {
        validate_title(&input.title)?;
        validate_cycle_length(input.cycle_length)?;
        if !policy::unlocked_visual_types(tier).contains(&input.visual_type) {
            return Err(CoreError::validation(
                "visual_type",
                format!(
                    "{} is not unlocked on the {} tier",
                    input.visual_type.as_str(),
                    tier.as_str()
                ),
            ));
        }

        let mut auto_archived = Vec::new();
        let active = self.db.get_active_tasks()?;
        if !policy::can_create_task(tier, active.len()) {
            for task in &active {
                self.db.archive_task(task.id)?;
                tracing::warn!(
                    task_id = %task.id,
                    tier = tier.as_str(),
                    "auto-archived active task to stay within the tier limit"
                );
                auto_archived.push(task.id);
            }
        }

        let task = self.db.create_task(input)?;
        Ok(CreateTaskOutcome {
            task,
            auto_archived,
        })
    }

    pub fn get_task(&self, id: Uuid) -> CoreResult<Task> {
        self.db.get_task(id)
    }

    pub fn active_tasks(&self) -> CoreResult<Vec<Task>> {
        self.db.get_active_tasks()
    }

    pub fn update_task(&self, id: Uuid, updates: UpdateTaskInput) -> CoreResult<Task> {
        self.db.update_task(id, updates)
    }

    pub fn archive_task(&self, id: Uuid) -> CoreResult<()> {
        self.db.archive_task(id)
    }

    pub fn delete_task(&self, id: Uuid) -> CoreResult<()> {
        self.db.delete_task(id)
    }

    pub fn record_progress(
        &self,
        task_id: Uuid,
        date: Option<NaiveDate>,
    ) -> CoreResult<ProgressEntry> {
        self.db.record_progress(task_id, date)
    }

    pub fn progress_for_task(&self, task_id: Uuid) -> CoreResult<Vec<ProgressEntry>> {
        self.db.get_progress_for_task(task_id)
    }

    pub fn has_progress_on(&self, task_id: Uuid, date: NaiveDate) -> CoreResult<bool> {
        self.db.has_progress_on(task_id, date)
    }

    pub fn delete_progress(&self, task_id: Uuid, date: NaiveDate) -> CoreResult<bool> {
        self.db.delete_progress(task_id, date)
    }

    /// The read behind the home screen: statistics are recomputed from the
    /// ledger on every call, anchored at the caller-supplied `today`.
    pub fn task_overview(&self, task_id: Uuid, today: NaiveDate) -> CoreResult<TaskOverview> {
        let task = self.db.get_task(task_id)?;
        let entries = self.db.get_progress_for_task(task_id)?;
        let dates: Vec<NaiveDate> = entries.iter().map(|e| e.date).collect();
        let stats = TaskStats::compute(task.cycle_length, &dates, today);
        let stage = stage::stage_for(task.visual_type, stats.completion_percentage as i64);
        Ok(TaskOverview {
            task,
            progress_entries: entries,
            stats,
            stage,
        })
    }

    pub fn set_reminder(&self, input: SetReminderInput) -> CoreResult<ReminderSettings> {
        self.db.set_reminder(input)
    }

    pub fn reminder_for(&self, task_id: Uuid) -> CoreResult<Option<ReminderSettings>> {
        self.db.get_reminder(task_id)
    }

    pub fn clear_reminder(&self, task_id: Uuid) -> CoreResult<bool> {
        self.db.clear_reminder(task_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VisualType;

    fn service() -> HabitService {
        let db = Database::open_in_memory().expect("open in-memory db");
        db.migrate().expect("migrate");
        HabitService::new(db)
    }

    fn input(title: &str) -> CreateTaskInput {
        CreateTaskInput {
            title: title.to_string(),
            cycle_length: 30,
            visual_type: VisualType::Tree,
            start_date: None,
        }
    }

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn free_tier_first_task_archives_nothing() {
        let svc = service();
        let outcome = svc.create_task(Tier::Free, input("Read")).unwrap();
        assert!(outcome.auto_archived.is_empty());
    }

    #[test]
    fn free_tier_second_task_archives_the_first() {
        let svc = service();
        let first = svc.create_task(Tier::Free, input("Read")).unwrap().task;
        let outcome = svc.create_task(Tier::Free, input("Run")).unwrap();

        assert_eq!(outcome.auto_archived, vec![first.id]);
        let active = svc.active_tasks().unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, outcome.task.id);
        assert!(svc.get_task(first.id).unwrap().archived);
    }

    #[test]
    fn pro_tier_keeps_existing_tasks_active() {
        let svc = service();
        svc.create_task(Tier::Pro, input("Read")).unwrap();
        let outcome = svc.create_task(Tier::Pro, input("Run")).unwrap();
        assert!(outcome.auto_archived.is_empty());
        assert_eq!(svc.active_tasks().unwrap().len(), 2);
    }

    #[test]
    fn invalid_input_never_archives() {
        let svc = service();
        let first = svc.create_task(Tier::Free, input("Read")).unwrap().task;

        let mut bad = input("Run");
        bad.cycle_length = 1;
        assert!(svc.create_task(Tier::Free, bad).is_err());

        // The rejected create must not have made room for itself.
        assert!(!svc.get_task(first.id).unwrap().archived);
    }

    #[test]
    fn locked_visual_type_is_rejected_on_free() {
        let svc = service();
        let mut locked = input("Swim");
        locked.visual_type = VisualType::Pet;
        let result = svc.create_task(Tier::Free, locked);
        assert!(matches!(
            result,
            Err(CoreError::Validation { field: "visual_type", .. })
        ));

        let mut allowed = input("Swim");
        allowed.visual_type = VisualType::Pet;
        assert!(svc.create_task(Tier::Pro, allowed).is_ok());
    }

    #[test]
    fn overview_combines_stats_and_stage() {
        let svc = service();
        let task = svc.create_task(Tier::Pro, input("Read")).unwrap().task;
        let today = d("2024-03-10");
        svc.record_progress(task.id, Some(d("2024-03-09"))).unwrap();
        svc.record_progress(task.id, Some(today)).unwrap();

        let overview = svc.task_overview(task.id, today).unwrap();
        assert_eq!(overview.stats.achieved_days, 2);
        assert_eq!(overview.stats.current_streak, 2);
        assert_eq!(overview.stats.completion_percentage, 7);
        assert_eq!(overview.stage.name, "Seed");
        assert_eq!(overview.progress_entries.len(), 2);
    }
}
