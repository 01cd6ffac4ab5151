//! # Waypoint Server Library
//!
//! Dependency injection wiring and startup for the Waypoint backend.

pub mod di;
pub mod startup;
