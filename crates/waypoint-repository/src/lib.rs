//! # Waypoint Repository
//!
//! Data access for users, chats, messages and routes.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn UserRepository> / ChatRepository / MessageRepository / RouteRepository
//! Pg*Repository                 (PostgreSQL / SQLx)
//!   ↓  Arc<dyn DatabasePoolInterface>
//! PostgreSQL
//! ```
//!
//! Cascades (user → chats → messages/route → points) are enforced by the
//! schema's foreign keys. [`MemoryStore`] reproduces them in memory for tests
//! and for running the API without a database.

pub mod memory;
pub mod pool;
pub mod postgres;
pub mod traits;

pub use memory::MemoryStore;
pub use pool::*;
pub use postgres::*;
pub use traits::*;
