//! Telegram bot integration and handlers

pub mod bot;
pub mod dialogue;
pub mod handlers;
pub mod menu;
pub mod tasks;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands, Command};
pub use dialogue::{CreateTaskState, TaskDialogue};
pub use handlers::{schema, HandlerDeps, HandlerError};
