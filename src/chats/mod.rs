mod model;
pub mod chat_service;
pub mod handler;
pub mod routes;

pub use model::*;
