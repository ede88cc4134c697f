//! Reply-меню разделов
//!
//! Подписи кнопок — часть наблюдаемого контракта бота и должны совпадать
//! со строками, на которые фильтруют обработчики.

use teloxide::prelude::*;
use teloxide::types::{KeyboardButton, KeyboardMarkup};

pub const SECTION_TASKS: &str = "📋 Задачи";
pub const SECTION_TIME: &str = "⏲️ Трекер времени";
pub const SECTION_EVENTS: &str = "📆 События";
pub const SECTION_DOCUMENTS: &str = "📄 Документы";
pub const SECTION_SETTINGS: &str = "⚙️ Настройки";

pub const TASKS_CREATE: &str = "➕ Создать задачу";
pub const TASKS_MINE: &str = "📄 Мои задачи";
pub const TASKS_ALL: &str = "🔎 Все задачи";
pub const BACK: &str = "⬅️ Назад";

fn main_menu_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![KeyboardButton::new(SECTION_TASKS), KeyboardButton::new(SECTION_TIME)],
        vec![KeyboardButton::new(SECTION_EVENTS), KeyboardButton::new(SECTION_DOCUMENTS)],
        vec![KeyboardButton::new(SECTION_SETTINGS)],
    ])
    .resize_keyboard()
}

fn tasks_menu_keyboard() -> KeyboardMarkup {
    KeyboardMarkup::new(vec![
        vec![
            KeyboardButton::new(TASKS_CREATE),
            KeyboardButton::new(TASKS_MINE),
            KeyboardButton::new(TASKS_ALL),
        ],
        vec![KeyboardButton::new(BACK)],
    ])
    .resize_keyboard()
}

/// Показывает главное меню разделов.
pub async fn show_main_menu(bot: &Bot, chat_id: ChatId) -> ResponseResult<Message> {
    bot.send_message(chat_id, "Выберите раздел:")
        .reply_markup(main_menu_keyboard())
        .await
}

/// Показывает подменю раздела «Задачи».
pub async fn show_tasks_menu(bot: &Bot, chat_id: ChatId) -> ResponseResult<Message> {
    bot.send_message(chat_id, "Раздел «Задачи»:")
        .reply_markup(tasks_menu_keyboard())
        .await
}
