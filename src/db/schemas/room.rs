//! Room document schema

use bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::IntoIndexes;
use crate::types::{InnspotError, Room, RoomStatus};

/// Collection name for rooms
pub const ROOM_COLLECTION: &str = "rooms";

/// Room document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct RoomDoc {
    /// MongoDB document ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Number shown on the door; alternate lookup key for cancellations
    pub room_number: i64,

    /// Stored as the raw string so unknown values surface as errors, not decode failures
    pub status: String,

    pub price_per_night: f64,

    /// Seeded fields this service does not interpret
    #[serde(flatten)]
    pub extra: Document,
}

impl IntoIndexes for RoomDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            // Availability listing sorted by price
            (
                doc! { "status": 1, "pricePerNight": 1 },
                Some(
                    IndexOptions::builder()
                        .name("status_price_index".to_string())
                        .build(),
                ),
            ),
            // Cancellation lookup by room number
            (
                doc! { "roomNumber": 1 },
                Some(
                    IndexOptions::builder()
                        .name("room_number_index".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

impl TryFrom<RoomDoc> for Room {
    type Error = InnspotError;

    fn try_from(doc: RoomDoc) -> Result<Self, Self::Error> {
        let id = doc
            .id
            .ok_or_else(|| InnspotError::Database("room document without _id".into()))?;

        let status = doc.status.parse::<RoomStatus>().map_err(|_| {
            InnspotError::Database(format!(
                "room {} has unrecognized status '{}'",
                id.to_hex(),
                doc.status
            ))
        })?;

        let extra = match Bson::Document(doc.extra).into_relaxed_extjson() {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };

        Ok(Room {
            id: id.to_hex(),
            room_number: doc.room_number,
            status,
            price_per_night: doc.price_per_night,
            extra,
        })
    }
}
