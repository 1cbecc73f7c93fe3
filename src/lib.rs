pub mod core;
pub mod errors;
pub mod router;
pub mod upstream;
pub mod messages;
pub mod chats;
pub mod auth;
pub mod notifications;
pub mod utils;

pub use router::init_router;
