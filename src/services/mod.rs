//! Типизированные сервисы поверх generic-репозитория
//!
//! Каждый модуль отвечает за одно семейство сущностей: типизированный
//! конструктор с умолчаниями оригинальной схемы плюс редкие дополнительные
//! операции (остановка трекера, согласование документа). Generic-операции
//! get/list/update/delete берутся напрямую из [`crate::storage::repo`].

pub mod documents;
pub mod events;
pub mod notifications;
pub mod polls;
pub mod rbac;
pub mod tasks;
pub mod time_tracking;
pub mod users;

pub use tasks::Task;
pub use users::User;
