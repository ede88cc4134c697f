//! Telegram bot handler tree configuration
//!
//! This module provides the main dispatcher schema for the bot. The handlers
//! are organized in a testable way, allowing integration tests to use the
//! same handler tree as production code.

use std::sync::Arc;

use teloxide::dispatching::dialogue::{self, InMemStorage};
use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use crate::core::{AppError, AppResult};
use crate::services::users::{self, User};
use crate::storage::{db, get_connection, DbConnection};
use crate::telegram::bot::Command;
use crate::telegram::dialogue::CreateTaskState;
use crate::telegram::{menu, tasks};

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub db_pool: Arc<db::DbPool>,
}

impl HandlerDeps {
    pub fn new(db_pool: Arc<db::DbPool>) -> Self {
        Self { db_pool }
    }
}

/// Ensures a user exists in the database, creating them on first contact.
///
/// A Telegram id outside the i64 range is rejected, never registered as 0.
pub fn ensure_user(conn: &DbConnection, from: &teloxide::types::User) -> AppResult<User> {
    let Ok(telegram_id) = i64::try_from(from.id.0) else {
        return Err(AppError::Validation(format!("Telegram id {} out of range", from.id)));
    };
    if let Some(user) = users::find_by_telegram_id(conn, telegram_id)? {
        return Ok(user);
    }
    log::info!("Registering new user telegram_id={}", telegram_id);
    users::create(
        conn,
        telegram_id,
        from.username.as_deref(),
        Some(&from.full_name()),
        None,
        true,
    )
}

/// Creates the main dispatcher schema for the Telegram bot.
///
/// The same handler tree is used in production and in integration tests.
/// Dependencies ([`HandlerDeps`] and the dialogue storage) come from the
/// dispatcher's dependency map.
pub fn schema() -> UpdateHandler<HandlerError> {
    use teloxide::dptree::case;

    let command_handler = dptree::entry()
        .filter_command::<Command>()
        .branch(case![Command::Start].endpoint(handle_start))
        .branch(case![Command::Menu].endpoint(handle_start))
        .branch(case![Command::TaskCreate].endpoint(tasks::start_task_dialogue));

    // Кнопки меню срабатывают из любого состояния диалога
    let menu_handler = dptree::entry()
        .branch(
            dptree::filter(|msg: Message| msg.text() == Some(menu::SECTION_TASKS))
                .endpoint(handle_tasks_section),
        )
        .branch(
            dptree::filter(|msg: Message| msg.text() == Some(menu::TASKS_CREATE))
                .endpoint(tasks::start_task_dialogue),
        )
        .branch(
            dptree::filter(|msg: Message| msg.text() == Some(menu::TASKS_MINE))
                .endpoint(tasks::handle_my_tasks),
        )
        .branch(
            dptree::filter(|msg: Message| msg.text() == Some(menu::TASKS_ALL))
                .endpoint(tasks::handle_all_tasks),
        )
        .branch(
            dptree::filter(|msg: Message| msg.text() == Some(menu::BACK)).endpoint(handle_start),
        );

    let message_handler = Update::filter_message()
        .branch(command_handler)
        .branch(menu_handler)
        .branch(case![CreateTaskState::AwaitingTitle].endpoint(tasks::receive_title))
        .branch(
            case![CreateTaskState::AwaitingDeadline { title }]
                .endpoint(tasks::receive_deadline_text),
        )
        .branch(
            case![CreateTaskState::AwaitingAssignee { title, deadline, pending }]
                .endpoint(tasks::receive_assignee_text),
        );

    // «Готово» принимается только на шаге исполнителя, сохранение и отмена —
    // только на шаге подтверждения
    let callback_handler = Update::filter_callback_query()
        .branch(
            case![CreateTaskState::AwaitingDeadline { title }]
                .endpoint(tasks::on_deadline_choice),
        )
        .branch(
            case![CreateTaskState::AwaitingAssignee { title, deadline, pending }]
                .endpoint(tasks::on_assign_callback),
        )
        .branch(
            case![CreateTaskState::AwaitingConfirm { title, deadline, assignee }]
                .endpoint(tasks::on_confirm_choice),
        );

    dptree::entry()
        .branch(
            dialogue::enter::<Update, InMemStorage<CreateTaskState>, CreateTaskState, _>()
                .branch(message_handler)
                .branch(callback_handler),
        )
        // Inline-запросы не несут chat id, поэтому живут вне dialogue::enter;
        // состояние шага проверяется в самом обработчике через storage
        .branch(Update::filter_inline_query().endpoint(tasks::user_inline_search))
}

async fn handle_start(bot: Bot, msg: Message, deps: HandlerDeps) -> Result<(), HandlerError> {
    {
        let conn = get_connection(&deps.db_pool)?;
        if let Some(from) = msg.from.as_ref() {
            ensure_user(&conn, from)?;
        }
    }
    menu::show_main_menu(&bot, msg.chat.id).await?;
    Ok(())
}

async fn handle_tasks_section(bot: Bot, msg: Message) -> Result<(), HandlerError> {
    menu::show_tasks_menu(&bot, msg.chat.id).await?;
    Ok(())
}
