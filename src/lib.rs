//! Kontora — Telegram bot for small-team coordination
//!
//! This library provides all the functionality for the Kontora bot:
//! typed entity services over a relational store, the task-creation
//! dialogue, and Telegram bot integration.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging
//! - `storage`: SQLite pool, schema bootstrap, generic row repo
//! - `services`: typed per-entity services (users, tasks, events, …)
//! - `telegram`: bot commands, menus, dialogue handlers, dispatcher schema

pub mod core;
pub mod services;
pub mod storage;
pub mod telegram;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult};
pub use crate::storage::{create_pool, get_connection, DbConnection, DbPool};
pub use crate::telegram::{schema, CreateTaskState, HandlerDeps};
