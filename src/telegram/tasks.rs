//! Диалог создания задачи
//!
//! Пять шагов: название → дедлайн → исполнитель → подтверждение → запись.
//! Ошибки ввода (формат даты, неизвестный id) закрывают шаг «на себя»:
//! состояние не двигается, пользователю уходит корректирующая подсказка.
//! Соединение с базой не удерживается через await — между шагами диалога
//! данные живут только в состоянии диалога.

use chrono::NaiveDateTime;
use teloxide::prelude::*;
use teloxide::types::{
    ForceReply, InlineKeyboardButton, InlineKeyboardMarkup, InlineQueryResult,
    InlineQueryResultArticle, InputMessageContent, InputMessageContentText, ParseMode,
};

use crate::core::config;
use crate::services::tasks as task_service;
use crate::services::users::{self, User};
use crate::storage::{get_connection, repo};
use crate::telegram::dialogue::{
    parse_deadline, parse_manual_assignment, CreateTaskState, TaskDialogue, TaskStorage,
};
use crate::telegram::handlers::{ensure_user, HandlerDeps, HandlerError};

// Callback-токены — наблюдаемый контракт, менять нельзя.
pub const CB_DEADLINE_DATE: &str = "task_deadline_date";
pub const CB_DEADLINE_NONE: &str = "task_deadline_none";
pub const CB_ASSIGN_MANUAL: &str = "task_assign_manual";
pub const CB_ASSIGN_DONE: &str = "task_assign_done";
pub const CB_CONFIRM_SAVE: &str = "task_confirm_save";
pub const CB_CONFIRM_CANCEL: &str = "task_confirm_cancel";

const PROMPT_TITLE: &str = "Шаг 1/4. Введите название задачи:";
const PROMPT_BAD_DATE: &str = "Неверный формат. Введите ДД.MM.YYYY HH:MM (например, 25.05.2025 14:30)";

fn display_handle(user: &User) -> String {
    user.username.clone().unwrap_or_else(|| user.id.to_string())
}

fn format_deadline(deadline: Option<NaiveDateTime>) -> String {
    match deadline {
        Some(dt) => dt.format("%d.%m.%Y %H:%M").to_string(),
        None => "—".to_string(),
    }
}

/// Начало диалога: /task_create или кнопка «➕ Создать задачу».
pub async fn start_task_dialogue(
    bot: Bot,
    msg: Message,
    dialogue: TaskDialogue,
) -> Result<(), HandlerError> {
    bot.send_message(msg.chat.id, PROMPT_TITLE).await?;
    dialogue.update(CreateTaskState::AwaitingTitle).await?;
    Ok(())
}

/// Шаг 1: принимаем название дословно и спрашиваем про дедлайн.
pub async fn receive_title(
    bot: Bot,
    msg: Message,
    dialogue: TaskDialogue,
) -> Result<(), HandlerError> {
    let Some(title) = msg.text() else {
        bot.send_message(msg.chat.id, PROMPT_TITLE).await?;
        return Ok(());
    };
    let keyboard = InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("📅 Указать дату", CB_DEADLINE_DATE),
        InlineKeyboardButton::callback("🛑 Без дедлайна", CB_DEADLINE_NONE),
    ]]);
    bot.send_message(msg.chat.id, "Шаг 2/4. Указать дедлайн?")
        .reply_markup(keyboard)
        .await?;
    dialogue
        .update(CreateTaskState::AwaitingDeadline { title: title.to_string() })
        .await?;
    Ok(())
}

/// Шаг 2, кнопки: «без дедлайна» сразу ведёт к шагу 3, «указать дату»
/// оставляет диалог в том же состоянии и ждёт текстовый ввод.
pub async fn on_deadline_choice(
    bot: Bot,
    q: CallbackQuery,
    dialogue: TaskDialogue,
    title: String,
) -> Result<(), HandlerError> {
    bot.answer_callback_query(q.id.clone()).await?;
    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };
    let Some(message) = q.message.as_ref() else {
        return Ok(());
    };
    let chat_id = message.chat().id;
    match data {
        CB_DEADLINE_NONE => {
            bot.edit_message_text(chat_id, message.id(), "Дедлайн не указан.").await?;
            prompt_assignee(&bot, chat_id).await?;
            dialogue
                .update(CreateTaskState::AwaitingAssignee { title, deadline: None, pending: None })
                .await?;
        }
        CB_DEADLINE_DATE => {
            bot.edit_message_text(
                chat_id,
                message.id(),
                "Введите дату в формате ДД.ММ.ГГГГ ЧЧ:ММ (например, 25.05.2025 14:30):",
            )
            .await?;
        }
        _ => {}
    }
    Ok(())
}

/// Шаг 2, текст: дата строго в формате ДД.ММ.ГГГГ ЧЧ:ММ, иначе повторный
/// запрос без смены состояния.
pub async fn receive_deadline_text(
    bot: Bot,
    msg: Message,
    dialogue: TaskDialogue,
    title: String,
) -> Result<(), HandlerError> {
    let Some(deadline) = msg.text().and_then(parse_deadline) else {
        bot.send_message(msg.chat.id, PROMPT_BAD_DATE).await?;
        return Ok(());
    };
    prompt_assignee(&bot, msg.chat.id).await?;
    dialogue
        .update(CreateTaskState::AwaitingAssignee {
            title,
            deadline: Some(deadline),
            pending: None,
        })
        .await?;
    Ok(())
}

async fn prompt_assignee(bot: &Bot, chat_id: ChatId) -> Result<(), HandlerError> {
    let keyboard = InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "Ввести @username",
        CB_ASSIGN_MANUAL,
    )]]);
    bot.send_message(chat_id, "Шаг 3/4. Кому назначить?")
        .reply_markup(keyboard)
        .await?;
    Ok(())
}

/// Шаг 3, текст: «ник id». Неизвестный id отклоняется; повторный тот же id
/// не меняет выбор; новый id замещает прежний (исполнитель один).
pub async fn receive_assignee_text(
    bot: Bot,
    msg: Message,
    dialogue: TaskDialogue,
    deps: HandlerDeps,
    (title, deadline, pending): (String, Option<NaiveDateTime>, Option<i64>),
) -> Result<(), HandlerError> {
    let Some(user_id) = msg.text().and_then(parse_manual_assignment) else {
        bot.send_message(msg.chat.id, "Неверный формат. Используйте подсказки при вводе пользователя.")
            .await?;
        return Ok(());
    };

    let found = {
        let conn = get_connection(&deps.db_pool)?;
        repo::get::<User>(&conn, user_id)?
    };
    let Some(user) = found else {
        bot.send_message(msg.chat.id, "Пользователь не найден.").await?;
        return Ok(());
    };

    let handle = display_handle(&user);
    if pending == Some(user.id) {
        bot.send_message(msg.chat.id, format!("@{} уже назначен.", handle)).await?;
    } else {
        dialogue
            .update(CreateTaskState::AwaitingAssignee {
                title,
                deadline,
                pending: Some(user.id),
            })
            .await?;
        bot.send_message(msg.chat.id, format!("✅ Добавлен: @{}", handle)).await?;
    }

    let keyboard = InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "✅ Готово",
        CB_ASSIGN_DONE,
    )]]);
    bot.send_message(msg.chat.id, "Добавьте ещё пользователя или нажмите «Готово»")
        .reply_markup(keyboard)
        .await?;
    Ok(())
}

/// Шаг 3, кнопки: ручной ввод или «Готово». «Готово» без исполнителя
/// переспрашивает на месте и к подтверждению не ведёт.
pub async fn on_assign_callback(
    bot: Bot,
    q: CallbackQuery,
    dialogue: TaskDialogue,
    deps: HandlerDeps,
    (title, deadline, pending): (String, Option<NaiveDateTime>, Option<i64>),
) -> Result<(), HandlerError> {
    bot.answer_callback_query(q.id.clone()).await?;
    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };
    let chat_id = dialogue.chat_id();
    match data {
        CB_ASSIGN_MANUAL => {
            bot.send_message(chat_id, "Введите @username исполнителя:")
                .reply_markup(ForceReply::new())
                .await?;
        }
        CB_ASSIGN_DONE => {
            let Some(assignee) = pending else {
                bot.send_message(chat_id, "Вы не выбрали ни одного исполнителя.").await?;
                return Ok(());
            };
            let found = {
                let conn = get_connection(&deps.db_pool)?;
                repo::get::<User>(&conn, assignee)?
            };
            let Some(user) = found else {
                bot.send_message(chat_id, "Пользователь не найден.").await?;
                return Ok(());
            };
            let summary = format!(
                "<b>Название:</b> {}\n<b>Дедлайн:</b> {}\n<b>Исполнители:</b> {}",
                title,
                format_deadline(deadline),
                display_handle(&user)
            );
            let keyboard = InlineKeyboardMarkup::new(vec![
                vec![InlineKeyboardButton::callback("✅ Сохранить", CB_CONFIRM_SAVE)],
                vec![InlineKeyboardButton::callback("❌ Отменить", CB_CONFIRM_CANCEL)],
            ]);
            bot.send_message(chat_id, summary)
                .parse_mode(ParseMode::Html)
                .reply_markup(keyboard)
                .await?;
            dialogue
                .update(CreateTaskState::AwaitingConfirm { title, deadline, assignee })
                .await?;
        }
        _ => {}
    }
    Ok(())
}

/// Шаг 4: отмена сбрасывает всё накопленное, сохранение создаёт задачу и
/// тоже очищает состояние. Других путей очистки у диалога нет.
pub async fn on_confirm_choice(
    bot: Bot,
    q: CallbackQuery,
    dialogue: TaskDialogue,
    deps: HandlerDeps,
    (title, deadline, assignee): (String, Option<NaiveDateTime>, i64),
) -> Result<(), HandlerError> {
    bot.answer_callback_query(q.id.clone()).await?;
    let Some(data) = q.data.as_deref() else {
        return Ok(());
    };
    let chat_id = dialogue.chat_id();
    match data {
        CB_CONFIRM_CANCEL => {
            bot.send_message(chat_id, "Создание задачи отменено ❌").await?;
            dialogue.exit().await?;
        }
        CB_CONFIRM_SAVE => {
            let task = {
                let conn = get_connection(&deps.db_pool)?;
                let creator = match i64::try_from(q.from.id.0) {
                    Ok(tg_id) => users::find_by_telegram_id(&conn, tg_id)?.map(|u| u.id),
                    Err(_) => None,
                };
                task_service::create(&conn, &title, None, deadline, creator, Some(assignee))?
            };
            bot.send_message(chat_id, format!("Задача '{}' создана ✅", task.title)).await?;
            dialogue.exit().await?;
        }
        _ => {}
    }
    Ok(())
}

/// Inline-поиск исполнителя: работает только на шаге выбора исполнителя,
/// подбирает по подстроке ника без учёта регистра, не больше 20 результатов.
pub async fn user_inline_search(
    bot: Bot,
    q: InlineQuery,
    storage: TaskStorage,
    deps: HandlerDeps,
) -> Result<(), HandlerError> {
    use teloxide::dispatching::dialogue::Storage as _;

    let Ok(key) = i64::try_from(q.from.id.0) else {
        return Ok(());
    };
    // Диалог приватный: ключ состояния совпадает с id пользователя
    let state = storage.clone().get_dialogue(ChatId(key)).await.ok().flatten();
    if !matches!(state, Some(CreateTaskState::AwaitingAssignee { .. })) {
        return Ok(());
    }
    let query = q.query.trim();
    if query.is_empty() {
        return Ok(());
    }

    let all_users = {
        let conn = get_connection(&deps.db_pool)?;
        repo::list::<User>(&conn)?
    };
    let results: Vec<InlineQueryResult> =
        users::search_by_username(&all_users, query, config::inline_search::MAX_RESULTS)
            .into_iter()
            .map(|user| {
                let article = InlineQueryResultArticle::new(
                    user.id.to_string(),
                    format!("@{}", display_handle(user)),
                    InputMessageContent::Text(InputMessageContentText::new(format!(
                        "👤 {}",
                        user.id
                    ))),
                )
                .description(user.full_name.clone().unwrap_or_default());
                InlineQueryResult::Article(article)
            })
            .collect();

    bot.answer_inline_query(q.id.clone(), results).cache_time(1).await?;
    Ok(())
}

/// «📄 Мои задачи» — задачи, назначенные на отправителя.
pub async fn handle_my_tasks(bot: Bot, msg: Message, deps: HandlerDeps) -> Result<(), HandlerError> {
    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };
    let tasks = {
        let conn = get_connection(&deps.db_pool)?;
        let user = ensure_user(&conn, from)?;
        task_service::list_assigned(&conn, user.id)?
    };
    send_task_list(&bot, msg.chat.id, "📄 Ваши задачи:", &tasks).await
}

/// «🔎 Все задачи» — все задачи команды.
pub async fn handle_all_tasks(bot: Bot, msg: Message, deps: HandlerDeps) -> Result<(), HandlerError> {
    let tasks = {
        let conn = get_connection(&deps.db_pool)?;
        if let Some(from) = msg.from.as_ref() {
            ensure_user(&conn, from)?;
        }
        repo::list::<task_service::Task>(&conn)?
    };
    send_task_list(&bot, msg.chat.id, "🔎 Все задачи:", &tasks).await
}

async fn send_task_list(
    bot: &Bot,
    chat_id: ChatId,
    header: &str,
    tasks: &[task_service::Task],
) -> Result<(), HandlerError> {
    if tasks.is_empty() {
        bot.send_message(chat_id, "Задач пока нет.").await?;
        return Ok(());
    }
    let mut lines = vec![header.to_string()];
    for task in tasks {
        let status = if task.is_completed { "✅" } else { "⏳" };
        lines.push(format!(
            "{} {} (дедлайн: {})",
            status,
            task.title,
            format_deadline(task.deadline)
        ));
    }
    bot.send_message(chat_id, lines.join("\n")).await?;
    Ok(())
}
