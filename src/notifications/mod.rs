mod dispatcher;
mod model;
pub mod notification_service;
pub mod handler;
pub mod routes;

pub use dispatcher::{LogNotificationDispatcher, NotificationDispatcher};
pub use model::*;
