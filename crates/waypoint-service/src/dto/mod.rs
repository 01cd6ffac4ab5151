//! Data Transfer Objects (DTOs).

mod chat_dto;
mod message_dto;
mod route_dto;
mod user_dto;

pub use chat_dto::*;
pub use message_dto::*;
pub use route_dto::*;
pub use user_dto::*;
