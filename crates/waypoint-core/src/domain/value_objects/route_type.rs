//! Route type value object.

use super::ParseEnumError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Travel mode a route was planned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteType {
    /// On foot.
    #[default]
    Pedestrian,
    /// By car.
    Auto,
    /// By public transport.
    Masstransit,
    /// By bicycle.
    Bicycle,
}

impl RouteType {
    /// Returns the column value for this route type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pedestrian => "PEDESTRIAN",
            Self::Auto => "AUTO",
            Self::Masstransit => "MASSTRANSIT",
            Self::Bicycle => "BICYCLE",
        }
    }

    /// Returns all route types.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Pedestrian, Self::Auto, Self::Masstransit, Self::Bicycle]
    }
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PEDESTRIAN" => Ok(Self::Pedestrian),
            "AUTO" => Ok(Self::Auto),
            "MASSTRANSIT" => Ok(Self::Masstransit),
            "BICYCLE" => Ok(Self::Bicycle),
            _ => Err(ParseEnumError::new("route_type", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_type_column_values() {
        for route_type in RouteType::all() {
            assert_eq!(route_type.as_str().parse::<RouteType>().unwrap(), route_type);
        }
    }

    #[test]
    fn test_route_type_default_is_pedestrian() {
        assert_eq!(RouteType::default(), RouteType::Pedestrian);
    }

    #[test]
    fn test_route_type_json() {
        assert_eq!(serde_json::to_string(&RouteType::Masstransit).unwrap(), "\"MASSTRANSIT\"");
        assert!(serde_json::from_str::<RouteType>("\"HELICOPTER\"").is_err());
    }
}
