//! Room domain model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use super::InnspotError;

/// Availability status of a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomStatus {
    Available,
    Pending,
    Booked,
    Unavailable,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::Pending => "Pending",
            Self::Booked => "Booked",
            Self::Unavailable => "Unavailable",
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomStatus {
    type Err = InnspotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Available" => Ok(Self::Available),
            "Pending" => Ok(Self::Pending),
            "Booked" => Ok(Self::Booked),
            "Unavailable" => Ok(Self::Unavailable),
            other => Err(InnspotError::Validation(format!(
                "unknown room status '{}' (expected Available, Pending, Booked or Unavailable)",
                other
            ))),
        }
    }
}

/// A bookable room.
///
/// Rooms are seeded out of band; fields beyond the ones this service reads
/// are carried through untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    #[serde(rename = "_id")]
    pub id: String,
    pub room_number: i64,
    pub status: RoomStatus,
    pub price_per_night: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Price ordering for room listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    /// MongoDB sort specifier value
    pub fn as_mongo(&self) -> i32 {
        match self {
            Self::Ascending => 1,
            Self::Descending => -1,
        }
    }
}

impl FromStr for SortDirection {
    type Err = InnspotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Ascending),
            "desc" => Ok(Self::Descending),
            other => Err(InnspotError::BadRequest(format!(
                "sort must be 'asc' or 'desc', got '{}'",
                other
            ))),
        }
    }
}

/// Query string of `GET /rooms`
#[derive(Debug, Default, Deserialize)]
pub struct RoomListQuery {
    #[serde(default)]
    pub sort: Option<String>,
}

impl RoomListQuery {
    pub fn direction(&self) -> Result<SortDirection, InnspotError> {
        match self.sort.as_deref() {
            None | Some("") => Ok(SortDirection::default()),
            Some(s) => s.parse(),
        }
    }
}

/// Body of the availability update endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityUpdate {
    pub availability: String,
}

impl AvailabilityUpdate {
    pub fn status(&self) -> Result<RoomStatus, InnspotError> {
        self.availability.parse()
    }
}
