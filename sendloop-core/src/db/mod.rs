//! SQLite persistence for tasks, progress entries, and reminders.
//!
//! A single connection behind a mutex serializes all access: the product
//! has exactly one logical writer (the local user), so idempotence comes
//! from the schema's unique constraints rather than application locking.

mod schema;

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::models::{
    validate_cycle_length, validate_reminder_time, validate_title, CreateTaskInput, ProgressEntry,
    ReminderSettings, SetReminderInput, Task, UpdateTaskInput, VisualType,
};

#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CoreError::storage(e.to_string()))?;
        }
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Self::from_connection(conn)
    }

    /// Opens the database in the platform data directory
    /// (e.g. `~/.local/share/sendloop/sendloop.db`).
    pub fn open_default() -> CoreResult<Self> {
        let dirs = directories::ProjectDirs::from("com", "rocket-tycoon", "sendloop")
            .ok_or_else(|| CoreError::storage("could not determine a home directory"))?;
        Self::open(dirs.data_dir().join("sendloop.db"))
    }

    /// In-memory database for tests and ephemeral use.
    pub fn open_in_memory() -> CoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> CoreResult<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> CoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| CoreError::storage("connection lock poisoned"))
    }

    pub fn migrate(&self) -> CoreResult<()> {
        let conn = self.conn()?;
        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
        if version >= schema::SCHEMA_VERSION {
            return Ok(());
        }
        tracing::info!(from = version, to = schema::SCHEMA_VERSION, "migrating database schema");
        if version < 1 {
            conn.execute_batch(schema::SCHEMA)?;
        }
        conn.pragma_update(None, "user_version", schema::SCHEMA_VERSION)?;
        Ok(())
    }

    // ---- Task operations ----

    pub fn create_task(&self, input: CreateTaskInput) -> CoreResult<Task> {
        let title = validate_title(&input.title)?;
        validate_cycle_length(input.cycle_length)?;

        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title,
            cycle_length: input.cycle_length,
            visual_type: input.visual_type,
            start_date: input.start_date.unwrap_or_else(|| now.date_naive()),
            archived: false,
            created_at: now,
            updated_at: now,
        };

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO tasks (id, title, cycle_length, visual_type, start_date, archived, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                task.id.to_string(),
                task.title,
                task.cycle_length,
                task.visual_type.as_i64(),
                task.start_date.to_string(),
                task.archived,
                task.created_at.to_rfc3339(),
                task.updated_at.to_rfc3339(),
            ],
        )?;
        tracing::debug!(task_id = %task.id, title = %task.title, "task created");
        Ok(task)
    }

    pub fn get_task(&self, id: Uuid) -> CoreResult<Task> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, title, cycle_length, visual_type, start_date, archived, created_at, updated_at
             FROM tasks WHERE id = ?1",
            [id.to_string()],
            row_to_task,
        )
        .optional()?
        .ok_or(CoreError::NotFound(id))
    }

    /// Non-archived tasks, most recently created first.
    pub fn get_active_tasks(&self) -> CoreResult<Vec<Task>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, cycle_length, visual_type, start_date, archived, created_at, updated_at
             FROM tasks WHERE archived = 0 ORDER BY created_at DESC",
        )?;
        let tasks = stmt
            .query_map([], row_to_task)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    pub fn count_active_tasks(&self) -> CoreResult<usize> {
        let conn = self.conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM tasks WHERE archived = 0", [], |row| {
                row.get(0)
            })?;
        Ok(count as usize)
    }

    /// Applies only the fields present in `updates`. An empty update is a
    /// plain read and does not touch `updated_at`.
    pub fn update_task(&self, id: Uuid, updates: UpdateTaskInput) -> CoreResult<Task> {
        let mut task = self.get_task(id)?;
        if updates.is_empty() {
            return Ok(task);
        }

        if let Some(title) = &updates.title {
            task.title = validate_title(title)?;
        }
        if let Some(cycle_length) = updates.cycle_length {
            validate_cycle_length(cycle_length)?;
            task.cycle_length = cycle_length;
        }
        if let Some(visual_type) = updates.visual_type {
            task.visual_type = visual_type;
        }
        task.updated_at = Utc::now();

        let conn = self.conn()?;
        conn.execute(
            "UPDATE tasks SET title = ?1, cycle_length = ?2, visual_type = ?3, updated_at = ?4
             WHERE id = ?5",
            params![
                task.title,
                task.cycle_length,
                task.visual_type.as_i64(),
                task.updated_at.to_rfc3339(),
                task.id.to_string(),
            ],
        )?;
        tracing::debug!(task_id = %task.id, "task updated");
        Ok(task)
    }

    /// Idempotent: archiving an already-archived task is not an error.
    pub fn archive_task(&self, id: Uuid) -> CoreResult<()> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE tasks SET archived = 1, updated_at = ?1 WHERE id = ?2",
            params![Utc::now().to_rfc3339(), id.to_string()],
        )?;
        if changed == 0 {
            return Err(CoreError::NotFound(id));
        }
        tracing::debug!(task_id = %id, "task archived");
        Ok(())
    }

    /// Removes the task row; the engine cascades to its progress entries
    /// and reminder settings.
    pub fn delete_task(&self, id: Uuid) -> CoreResult<()> {
        let conn = self.conn()?;
        let changed = conn.execute("DELETE FROM tasks WHERE id = ?1", [id.to_string()])?;
        if changed == 0 {
            return Err(CoreError::NotFound(id));
        }
        tracing::debug!(task_id = %id, "task deleted");
        Ok(())
    }

    // ---- Progress operations ----

    /// Records completion for `date` (default today). Idempotent: if an
    /// entry already exists for that day the existing entry is returned
    /// unchanged. The unique index makes the insert race-free.
    pub fn record_progress(
        &self,
        task_id: Uuid,
        date: Option<NaiveDate>,
    ) -> CoreResult<ProgressEntry> {
        let date = date.unwrap_or_else(|| Utc::now().date_naive());
        self.get_task(task_id)?;

        let conn = self.conn()?;
        let inserted = conn.execute(
            "INSERT INTO progress (id, task_id, date, created_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(task_id, date) DO NOTHING",
            params![
                Uuid::new_v4().to_string(),
                task_id.to_string(),
                date.to_string(),
                Utc::now().to_rfc3339(),
            ],
        )?;
        if inserted > 0 {
            tracing::debug!(task_id = %task_id, %date, "progress recorded");
        }

        let entry = conn.query_row(
            "SELECT id, task_id, date, created_at FROM progress WHERE task_id = ?1 AND date = ?2",
            params![task_id.to_string(), date.to_string()],
            row_to_progress,
        )?;
        Ok(entry)
    }

    /// All entries for a task, most recent date first.
    pub fn get_progress_for_task(&self, task_id: Uuid) -> CoreResult<Vec<ProgressEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, task_id, date, created_at FROM progress
             WHERE task_id = ?1 ORDER BY date DESC",
        )?;
        let entries = stmt
            .query_map([task_id.to_string()], row_to_progress)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn has_progress_on(&self, task_id: Uuid, date: NaiveDate) -> CoreResult<bool> {
        let conn = self.conn()?;
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM progress WHERE task_id = ?1 AND date = ?2)",
            params![task_id.to_string(), date.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Removes the entry for the exact date. Returns whether anything was
    /// deleted; a missing entry is a no-op, not an error.
    pub fn delete_progress(&self, task_id: Uuid, date: NaiveDate) -> CoreResult<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "DELETE FROM progress WHERE task_id = ?1 AND date = ?2",
            params![task_id.to_string(), date.to_string()],
        )?;
        if changed > 0 {
            tracing::debug!(task_id = %task_id, %date, "progress entry deleted");
        }
        Ok(changed > 0)
    }

    // ---- Reminder operations ----

    pub fn set_reminder(&self, input: SetReminderInput) -> CoreResult<ReminderSettings> {
        match (&input.time, input.enabled) {
            (Some(time), _) => validate_reminder_time(time)?,
            (None, true) => {
                return Err(CoreError::validation(
                    "time",
                    "required when the reminder is enabled",
                ))
            }
            (None, false) => {}
        }
        self.get_task(input.task_id)?;

        let settings = ReminderSettings {
            task_id: input.task_id,
            enabled: input.enabled,
            time: input.time,
            updated_at: Utc::now(),
        };
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO reminders (task_id, enabled, time, updated_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(task_id) DO UPDATE SET
                enabled = excluded.enabled,
                time = excluded.time,
                updated_at = excluded.updated_at",
            params![
                settings.task_id.to_string(),
                settings.enabled,
                settings.time,
                settings.updated_at.to_rfc3339(),
            ],
        )?;
        tracing::debug!(task_id = %settings.task_id, enabled = settings.enabled, "reminder saved");
        Ok(settings)
    }

    pub fn get_reminder(&self, task_id: Uuid) -> CoreResult<Option<ReminderSettings>> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT task_id, enabled, time, updated_at FROM reminders WHERE task_id = ?1",
            [task_id.to_string()],
            row_to_reminder,
        )
        .optional()
        .map_err(Into::into)
    }

    pub fn clear_reminder(&self, task_id: Uuid) -> CoreResult<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "DELETE FROM reminders WHERE task_id = ?1",
            [task_id.to_string()],
        )?;
        Ok(changed > 0)
    }
}

fn row_to_task(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    let id: String = row.get(0)?;
    let visual_type: i64 = row.get(3)?;
    let start_date: String = row.get(4)?;
    let created_at: String = row.get(6)?;
    let updated_at: String = row.get(7)?;

    Ok(Task {
        id: parse_uuid(0, &id)?,
        title: row.get(1)?,
        cycle_length: row.get(2)?,
        // Unknown discriminants decode to the default visual so reads stay total.
        visual_type: VisualType::from_i64(visual_type).unwrap_or_default(),
        start_date: parse_date(4, &start_date)?,
        archived: row.get(5)?,
        created_at: parse_timestamp(6, &created_at)?,
        updated_at: parse_timestamp(7, &updated_at)?,
    })
}

fn row_to_progress(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProgressEntry> {
    let id: String = row.get(0)?;
    let task_id: String = row.get(1)?;
    let date: String = row.get(2)?;
    let created_at: String = row.get(3)?;

    Ok(ProgressEntry {
        id: parse_uuid(0, &id)?,
        task_id: parse_uuid(1, &task_id)?,
        date: parse_date(2, &date)?,
        created_at: parse_timestamp(3, &created_at)?,
    })
}

fn row_to_reminder(row: &rusqlite::Row<'_>) -> rusqlite::Result<ReminderSettings> {
    let task_id: String = row.get(0)?;
    let updated_at: String = row.get(3)?;

    Ok(ReminderSettings {
        task_id: parse_uuid(0, &task_id)?,
        enabled: row.get(1)?,
        time: row.get(2)?,
        updated_at: parse_timestamp(3, &updated_at)?,
    })
}

fn parse_uuid(idx: usize, value: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(value).map_err(|_| conversion_err(idx, "invalid uuid"))
}

fn parse_date(idx: usize, value: &str) -> rusqlite::Result<NaiveDate> {
    value.parse().map_err(|_| conversion_err(idx, "invalid date"))
}

fn parse_timestamp(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| conversion_err(idx, "invalid timestamp"))
}

fn conversion_err(idx: usize, message: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        rusqlite::types::Type::Text,
        Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            message.to_string(),
        )),
    )
}
