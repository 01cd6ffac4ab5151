//! Persistent entities.

mod chat;
mod message;
mod route;
mod user;

pub use chat::*;
pub use message::*;
pub use route::*;
pub use user::*;
