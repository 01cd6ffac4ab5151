//! # Waypoint Service
//!
//! Business services for users, chats, messages and routes.
//!
//! Services validate requests, talk to the repositories and keep the Redis
//! cache coherent: users and routes are read cache-first and every write
//! evicts the keys it invalidates.

pub mod cache;
pub mod chat_service;
pub mod dto;
pub mod r#impl;
pub mod message_service;
pub mod route_service;
pub mod user_service;

pub use cache::*;
pub use chat_service::*;
pub use dto::*;
pub use message_service::*;
pub use r#impl::*;
pub use route_service::*;
pub use user_service::*;
