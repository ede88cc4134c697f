use std::sync::Arc;

use anyhow::Result;
use dotenvy::dotenv;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::dptree;
use teloxide::prelude::*;

use kontora::core::{config, init_logger};
use kontora::storage::create_pool;
use kontora::telegram::{create_bot, schema, setup_bot_commands, CreateTaskState, HandlerDeps};

/// Main entry point for the Telegram bot
///
/// # Errors
/// Returns an error if initialization fails (logging, database, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env before any config is read
    let _ = dotenv();

    init_logger(&config::LOG_FILE_PATH)?;

    // Log panics from the dispatcher instead of dying silently
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
    }));

    let db_pool = Arc::new(create_pool(&config::DATABASE_PATH)?);
    log::info!("Database ready at {}", *config::DATABASE_PATH);

    let bot = create_bot();
    setup_bot_commands(&bot).await?;

    let deps = HandlerDeps::new(db_pool);

    log::info!("Starting kontora bot");
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![InMemStorage::<CreateTaskState>::new(), deps])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
