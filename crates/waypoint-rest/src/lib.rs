//! # Waypoint REST
//!
//! REST API layer using Axum.
//! Exposes users, chats, messages and routes under `/api/v1`, health
//! checks at the root, and Swagger UI at `/swagger-ui`.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
