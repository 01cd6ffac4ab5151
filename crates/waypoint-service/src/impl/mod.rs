//! Service implementations.
//!
//! Trait definitions live in the parent module (e.g. `user_service.rs`).

pub mod chat_service_impl;
pub mod message_service_impl;
pub mod route_service_impl;
pub mod user_service_impl;

#[cfg(test)]
pub(crate) mod test_support;

pub use chat_service_impl::ChatServiceComponent;
pub use message_service_impl::MessageServiceComponent;
pub use route_service_impl::RouteServiceComponent;
pub use user_service_impl::{UserServiceComponent, UserServiceComponentParameters, DEFAULT_MIN_PASSWORD_LENGTH};
