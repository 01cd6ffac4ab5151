//! REST API controllers.

pub mod chat_controller;
pub mod health_controller;
pub mod message_controller;
pub mod route_controller;
pub mod user_controller;

pub use health_controller::*;

use crate::responses::AppError;
use std::str::FromStr;
use waypoint_core::WaypointError;

/// Parses a path segment into a typed id.
pub(crate) fn parse_id<T: FromStr>(resource: &str, raw: &str) -> Result<T, AppError> {
    raw.parse::<T>()
        .map_err(|_| AppError(WaypointError::validation(format!("Invalid {} ID: {}", resource, raw))))
}
