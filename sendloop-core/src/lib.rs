//! Core library for sendloop.
//!
//! This crate provides the domain models, derived statistics, and database
//! operations for sendloop, independent of any transport layer (HTTP, CLI,
//! etc.).
//!
//! # Usage
//!
//! ```no_run
//! use sendloop_core::db::Database;
//! use sendloop_core::models::*;
//!
//! let db = Database::open_default()?;
//! db.migrate()?;
//!
//! let tasks = db.get_active_tasks()?;
//! # Ok::<(), sendloop_core::CoreError>(())
//! ```

pub mod db;
pub mod error;
pub mod models;
pub mod policy;
pub mod service;
pub mod stage;
pub mod stats;

// Re-export commonly used types at crate root
pub use db::Database;
pub use error::{CoreError, CoreResult};
pub use service::HabitService;
