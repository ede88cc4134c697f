use once_cell::sync::Lazy;
use std::env;

/// Configuration constants for the bot

/// Path to the SQLite database file
/// Read once at startup from DATABASE_PATH environment variable
pub static DATABASE_PATH: Lazy<String> =
    Lazy::new(|| env::var("DATABASE_PATH").unwrap_or_else(|_| "kontora.sqlite".to_string()));

/// Path to the log file
/// Read from LOG_FILE_PATH environment variable
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "kontora.log".to_string()));

/// Log verbosity: "debug", "info", "warning", "error"
/// Read from LOG_LEVEL environment variable
pub static LOG_LEVEL: Lazy<String> =
    Lazy::new(|| env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

/// Inline user search configuration
pub mod inline_search {
    /// Maximum number of candidates returned for one inline query
    pub const MAX_RESULTS: usize = 20;
}

/// Task-creation dialogue configuration
pub mod deadline {
    /// Accepted deadline input pattern: day.month.year hour:minute
    pub const FORMAT: &str = "%d.%m.%Y %H:%M";
}
