//! Result type aliases for Waypoint.

use crate::WaypointError;

/// A specialized `Result` type for Waypoint operations.
pub type WaypointResult<T> = Result<T, WaypointError>;
