mod client;
mod errors;
mod message_source;
mod experiences;
mod access;
pub mod model;

pub use client::UpstreamClient;
pub use errors::UpstreamError;
pub use message_source::{MessagePage, MessageSource};
pub use experiences::ExperienceSource;
pub use access::{AccessChecker, AccessDecision, AccessLevel};
