//! Integration tests for the task-creation dialogue using teloxide_tests
//!
//! These tests drive the real dispatcher schema with mock Telegram updates.
//! Run with: cargo test --test dialogue_test

mod common;

use std::sync::Arc;

use serial_test::serial;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::dptree;
use teloxide_tests::mock_bot::DistributionKey;
use teloxide_tests::{MockBot, MockCallbackQuery, MockInlineQuery, MockMessageText};

use kontora::services::tasks::Task;
use kontora::services::users::{self, User};
use kontora::storage::{get_connection, repo, DbPool};
use kontora::telegram::{schema, CreateTaskState, HandlerDeps, HandlerError};

use common::{scratch_db, ScratchDb};

fn seed_user(pool: &Arc<DbPool>, telegram_id: i64, username: &str) -> User {
    let conn = get_connection(pool).expect("Failed to get connection");
    users::create(&conn, telegram_id, Some(username), None, None, true)
        .expect("Failed to seed user")
}

/// Builds a mock bot wired to the production schema with a scratch database.
fn dialogue_bot(db: &ScratchDb) -> MockBot<HandlerError, DistributionKey> {
    let deps = HandlerDeps::new(db.pool.clone());
    let storage = InMemStorage::<CreateTaskState>::new();
    let mut bot = MockBot::new(MockMessageText::new().text("/task_create"), schema());
    bot.dependencies(dptree::deps![storage, deps]);
    bot
}

fn sent_texts(bot: &MockBot<HandlerError, DistributionKey>) -> Vec<String> {
    bot.get_responses()
        .sent_messages
        .iter()
        .filter_map(|m| m.text().map(String::from))
        .collect()
}

fn assert_sent(bot: &MockBot<HandlerError, DistributionKey>, needle: &str) {
    let texts = sent_texts(bot);
    assert!(
        texts.iter().any(|t| t.contains(needle)),
        "Expected a message containing {:?}, got {:?}",
        needle,
        texts
    );
}

fn callback(data: &str) -> MockCallbackQuery {
    MockCallbackQuery::new()
        .data(data)
        .message(MockMessageText::new().text("…").build())
}

#[tokio::test]
#[serial]
async fn full_dialogue_creates_task_without_deadline() {
    let db = scratch_db();
    let alice = seed_user(&db.pool, 111, "alice");
    let mut bot = dialogue_bot(&db);

    bot.dispatch().await;
    assert_sent(&bot, "Шаг 1/4. Введите название задачи:");

    bot.update(MockMessageText::new().text("Ship report"));
    bot.dispatch().await;
    assert_sent(&bot, "Шаг 2/4. Указать дедлайн?");

    bot.update(callback("task_deadline_none"));
    bot.dispatch().await;
    assert_sent(&bot, "Шаг 3/4. Кому назначить?");

    bot.update(MockMessageText::new().text(format!("alice {}", alice.id)));
    bot.dispatch().await;
    assert_sent(&bot, "✅ Добавлен: @alice");
    assert_sent(&bot, "Добавьте ещё пользователя или нажмите «Готово»");

    bot.update(callback("task_assign_done"));
    bot.dispatch().await;
    assert_sent(&bot, "Название:");

    bot.update(callback("task_confirm_save"));
    bot.dispatch().await;
    assert_sent(&bot, "Задача 'Ship report' создана ✅");

    let conn = get_connection(&db.pool).expect("Failed to get connection");
    let tasks = repo::list::<Task>(&conn).expect("Failed to list tasks");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Ship report");
    assert_eq!(tasks[0].deadline, None);
    assert_eq!(tasks[0].assigned_to, Some(alice.id));
}

#[tokio::test]
#[serial]
async fn explicit_deadline_is_parsed_and_stored() {
    let db = scratch_db();
    let alice = seed_user(&db.pool, 112, "alice");
    let mut bot = dialogue_bot(&db);

    bot.dispatch().await;
    bot.update(MockMessageText::new().text("Quarterly review"));
    bot.dispatch().await;

    bot.update(callback("task_deadline_date"));
    bot.dispatch().await;

    bot.update(MockMessageText::new().text("25.05.2025 14:30"));
    bot.dispatch().await;
    assert_sent(&bot, "Шаг 3/4. Кому назначить?");

    bot.update(MockMessageText::new().text(format!("alice {}", alice.id)));
    bot.dispatch().await;
    bot.update(callback("task_assign_done"));
    bot.dispatch().await;
    assert_sent(&bot, "25.05.2025 14:30");

    bot.update(callback("task_confirm_save"));
    bot.dispatch().await;

    let conn = get_connection(&db.pool).expect("Failed to get connection");
    let tasks = repo::list::<Task>(&conn).expect("Failed to list tasks");
    assert_eq!(tasks.len(), 1);
    let expected =
        chrono::NaiveDateTime::parse_from_str("25.05.2025 14:30", "%d.%m.%Y %H:%M").unwrap();
    assert_eq!(tasks[0].deadline, Some(expected));
}

#[tokio::test]
#[serial]
async fn malformed_date_keeps_asking_without_losing_the_title() {
    let db = scratch_db();
    let alice = seed_user(&db.pool, 113, "alice");
    let mut bot = dialogue_bot(&db);

    bot.dispatch().await;
    bot.update(MockMessageText::new().text("Ship report"));
    bot.dispatch().await;
    bot.update(callback("task_deadline_date"));
    bot.dispatch().await;

    // ISO form and slashes are both rejected; the step repeats in place
    bot.update(MockMessageText::new().text("2025-05-25 14:30"));
    bot.dispatch().await;
    assert_sent(&bot, "Неверный формат. Введите ДД.MM.YYYY HH:MM (например, 25.05.2025 14:30)");

    bot.update(MockMessageText::new().text("25/05/2025 14:30"));
    bot.dispatch().await;
    assert_sent(&bot, "Неверный формат");

    // A valid date still lands on the assignee step with the title intact
    bot.update(MockMessageText::new().text("25.05.2025 14:30"));
    bot.dispatch().await;
    bot.update(MockMessageText::new().text(format!("alice {}", alice.id)));
    bot.dispatch().await;
    bot.update(callback("task_assign_done"));
    bot.dispatch().await;
    bot.update(callback("task_confirm_save"));
    bot.dispatch().await;
    assert_sent(&bot, "Задача 'Ship report' создана ✅");
}

#[tokio::test]
#[serial]
async fn unknown_assignee_id_is_rejected() {
    let db = scratch_db();
    seed_user(&db.pool, 114, "alice");
    let mut bot = dialogue_bot(&db);

    bot.dispatch().await;
    bot.update(MockMessageText::new().text("Ship report"));
    bot.dispatch().await;
    bot.update(callback("task_deadline_none"));
    bot.dispatch().await;

    bot.update(MockMessageText::new().text("ghost 9999"));
    bot.dispatch().await;
    assert_sent(&bot, "Пользователь не найден.");
}

#[tokio::test]
#[serial]
async fn repeated_assignee_is_deduplicated_and_new_one_replaces() {
    let db = scratch_db();
    let alice = seed_user(&db.pool, 115, "alice");
    let bob = seed_user(&db.pool, 116, "bob");
    let mut bot = dialogue_bot(&db);

    bot.dispatch().await;
    bot.update(MockMessageText::new().text("Ship report"));
    bot.dispatch().await;
    bot.update(callback("task_deadline_none"));
    bot.dispatch().await;

    bot.update(MockMessageText::new().text(format!("alice {}", alice.id)));
    bot.dispatch().await;
    assert_sent(&bot, "✅ Добавлен: @alice");

    bot.update(MockMessageText::new().text(format!("alice {}", alice.id)));
    bot.dispatch().await;
    assert_sent(&bot, "@alice уже назначен.");

    // A different user replaces the earlier choice (single assignee)
    bot.update(MockMessageText::new().text(format!("bob {}", bob.id)));
    bot.dispatch().await;
    assert_sent(&bot, "✅ Добавлен: @bob");

    bot.update(callback("task_assign_done"));
    bot.dispatch().await;
    bot.update(callback("task_confirm_save"));
    bot.dispatch().await;

    let conn = get_connection(&db.pool).expect("Failed to get connection");
    let tasks = repo::list::<Task>(&conn).expect("Failed to list tasks");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].assigned_to, Some(bob.id));
}

#[tokio::test]
#[serial]
async fn done_without_assignee_reprompts_in_place() {
    let db = scratch_db();
    let alice = seed_user(&db.pool, 117, "alice");
    let mut bot = dialogue_bot(&db);

    bot.dispatch().await;
    bot.update(MockMessageText::new().text("Ship report"));
    bot.dispatch().await;
    bot.update(callback("task_deadline_none"));
    bot.dispatch().await;

    bot.update(callback("task_assign_done"));
    bot.dispatch().await;
    assert_sent(&bot, "Вы не выбрали ни одного исполнителя.");

    // The step did not advance: an assignee can still be provided
    bot.update(MockMessageText::new().text(format!("alice {}", alice.id)));
    bot.dispatch().await;
    assert_sent(&bot, "✅ Добавлен: @alice");
}

#[tokio::test]
#[serial]
async fn cancel_discards_the_draft() {
    let db = scratch_db();
    let alice = seed_user(&db.pool, 118, "alice");
    let mut bot = dialogue_bot(&db);

    bot.dispatch().await;
    bot.update(MockMessageText::new().text("Ship report"));
    bot.dispatch().await;
    bot.update(callback("task_deadline_none"));
    bot.dispatch().await;
    bot.update(MockMessageText::new().text(format!("alice {}", alice.id)));
    bot.dispatch().await;
    bot.update(callback("task_assign_done"));
    bot.dispatch().await;

    bot.update(callback("task_confirm_cancel"));
    bot.dispatch().await;
    assert_sent(&bot, "Создание задачи отменено ❌");

    let conn = get_connection(&db.pool).expect("Failed to get connection");
    let tasks = repo::list::<Task>(&conn).expect("Failed to list tasks");
    assert!(tasks.is_empty());

    // The dialogue is back at idle: a fresh start begins at step 1 again
    bot.update(MockMessageText::new().text("/task_create"));
    bot.dispatch().await;
    assert_sent(&bot, "Шаг 1/4. Введите название задачи:");
}

#[tokio::test]
#[serial]
async fn save_resolves_creator_by_telegram_id_when_known() {
    let db = scratch_db();
    let alice = seed_user(&db.pool, 119, "alice");
    let mut bot = dialogue_bot(&db);

    bot.dispatch().await;
    bot.update(MockMessageText::new().text("Ship report"));
    bot.dispatch().await;
    bot.update(callback("task_deadline_none"));
    bot.dispatch().await;
    bot.update(MockMessageText::new().text(format!("alice {}", alice.id)));
    bot.dispatch().await;
    bot.update(callback("task_assign_done"));
    bot.dispatch().await;
    bot.update(callback("task_confirm_save"));
    bot.dispatch().await;

    // The mock sender is not registered, so created_by stays empty while
    // the task itself is saved
    let conn = get_connection(&db.pool).expect("Failed to get connection");
    let tasks = repo::list::<Task>(&conn).expect("Failed to list tasks");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].created_by, None);
}

#[tokio::test]
#[serial]
async fn inline_search_answers_candidates_on_the_assignee_step() {
    let db = scratch_db();
    seed_user(&db.pool, 120, "alice");
    seed_user(&db.pool, 121, "bob");
    seed_user(&db.pool, 122, "alina");
    let mut bot = dialogue_bot(&db);

    bot.dispatch().await;
    bot.update(MockMessageText::new().text("Ship report"));
    bot.dispatch().await;
    bot.update(callback("task_deadline_none"));
    bot.dispatch().await;
    assert_sent(&bot, "Шаг 3/4. Кому назначить?");

    bot.update(MockInlineQuery::new().query("ali"));
    bot.dispatch().await;
    let responses = bot.get_responses();
    assert!(
        !responses.answered_inline_queries.is_empty(),
        "Inline query on the assignee step answers with candidates"
    );
}

#[tokio::test]
#[serial]
async fn inline_search_is_ignored_outside_the_assignee_step() {
    let db = scratch_db();
    seed_user(&db.pool, 125, "alice");

    // No dialogue in progress at all
    let deps = HandlerDeps::new(db.pool.clone());
    let storage = InMemStorage::<CreateTaskState>::new();
    let mut bot = MockBot::new(MockInlineQuery::new().query("ali"), schema());
    bot.dependencies(dptree::deps![storage, deps]);
    bot.dispatch().await;
    assert!(bot.get_responses().answered_inline_queries.is_empty());

    // Dialogue started but still on the title step
    let mut bot = dialogue_bot(&db);
    bot.dispatch().await;
    bot.update(MockInlineQuery::new().query("ali"));
    bot.dispatch().await;
    assert!(bot.get_responses().answered_inline_queries.is_empty());
}

#[tokio::test]
#[serial]
async fn out_of_range_telegram_id_is_not_registered() {
    use kontora::telegram::handlers::ensure_user;
    use teloxide::types::{UserId, User as TelegramUser};

    let db = scratch_db();
    let conn = get_connection(&db.pool).expect("Failed to get connection");
    let from = TelegramUser {
        id: UserId(u64::MAX),
        is_bot: false,
        first_name: "Ghost".to_string(),
        last_name: None,
        username: None,
        language_code: None,
        is_premium: false,
        added_to_attachment_menu: false,
    };

    assert!(ensure_user(&conn, &from).is_err());
    assert!(repo::list::<User>(&conn).expect("Failed to list users").is_empty());
}

#[tokio::test]
#[serial]
async fn start_command_shows_main_menu_and_registers_sender() {
    let db = scratch_db();
    let mut bot = MockBot::new(MockMessageText::new().text("/start"), schema());
    let deps = HandlerDeps::new(db.pool.clone());
    let storage = InMemStorage::<CreateTaskState>::new();
    bot.dependencies(dptree::deps![storage, deps]);

    bot.dispatch().await;
    assert_sent(&bot, "Выберите раздел:");

    let conn = get_connection(&db.pool).expect("Failed to get connection");
    let users = repo::list::<User>(&conn).expect("Failed to list users");
    assert_eq!(users.len(), 1, "Sender is registered on first contact");
}

#[tokio::test]
#[serial]
async fn tasks_section_button_shows_submenu() {
    let db = scratch_db();
    let mut bot = MockBot::new(MockMessageText::new().text("📋 Задачи"), schema());
    let deps = HandlerDeps::new(db.pool.clone());
    let storage = InMemStorage::<CreateTaskState>::new();
    bot.dependencies(dptree::deps![storage, deps]);

    bot.dispatch().await;
    assert_sent(&bot, "Раздел «Задачи»:");
}

#[tokio::test]
#[serial]
async fn my_tasks_button_lists_nothing_for_a_new_user() {
    let db = scratch_db();
    let mut bot = MockBot::new(MockMessageText::new().text("📄 Мои задачи"), schema());
    let deps = HandlerDeps::new(db.pool.clone());
    let storage = InMemStorage::<CreateTaskState>::new();
    bot.dependencies(dptree::deps![storage, deps]);

    bot.dispatch().await;
    assert_sent(&bot, "Задач пока нет.");
}
