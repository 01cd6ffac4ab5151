//! # Waypoint Security
//!
//! Argon2 password hashing behind an injectable interface.

pub mod password;

pub use password::*;
