mod model;
mod date_window;
mod pagination;
mod query_param;
pub mod timestamp;
pub mod message_service;
pub mod handler;
pub mod routes;

pub use model::*;
pub use date_window::DateWindow;
pub use pagination::{FetchSession, SessionOptions, SessionOutcome, StopReason};
