//! Состояние диалога создания задачи
//!
//! Состояние хранится в `InMemStorage` с ключом по чату: перезапуск процесса
//! его теряет, очищается оно только при отмене и при сохранении. Переходы
//! линейные, без пропусков и возвратов.

use chrono::NaiveDateTime;
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

use crate::core::config;

/// Шаги диалога создания задачи, с накопленными данными.
#[derive(Debug, Clone, Default)]
pub enum CreateTaskState {
    /// Диалог не начат
    #[default]
    Idle,
    /// Шаг 1: ждём название задачи
    AwaitingTitle,
    /// Шаг 2: ждём выбор или текстовый ввод дедлайна
    AwaitingDeadline { title: String },
    /// Шаг 3: ждём исполнителя; `pending` — последний подтверждённый id
    AwaitingAssignee {
        title: String,
        deadline: Option<NaiveDateTime>,
        pending: Option<i64>,
    },
    /// Шаг 4: ждём сохранения или отмены
    AwaitingConfirm {
        title: String,
        deadline: Option<NaiveDateTime>,
        assignee: i64,
    },
}

pub type TaskDialogue = Dialogue<CreateTaskState, InMemStorage<CreateTaskState>>;
pub type TaskStorage = std::sync::Arc<InMemStorage<CreateTaskState>>;

/// Разбирает дедлайн в формате ДД.ММ.ГГГГ ЧЧ:ММ. Любое отклонение от
/// формата — отказ, состояние диалога при этом не меняется.
pub fn parse_deadline(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), config::deadline::FORMAT).ok()
}

/// Разбирает ручной ввод исполнителя: «ник id», разделённые пробелом.
/// Возвращает числовой идентификатор, сам ник не проверяется.
pub fn parse_manual_assignment(text: &str) -> Option<i64> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    if parts.len() != 2 || !parts[1].bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    parts[1].parse().ok()
}
