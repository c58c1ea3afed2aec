//! Booking document schema

use bson::{doc, oid::ObjectId, Bson, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::db::mongo::IntoIndexes;
use crate::types::{Booking, BookingPatch, InnspotError};

/// Collection name for bookings
pub const BOOKING_COLLECTION: &str = "bookings";

/// Booking document stored in MongoDB
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct BookingDoc {
    /// MongoDB document ID
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Owner email, matched against the access token
    pub user_email: String,

    // Caller-supplied values of any BSON type; a stored booking always
    // decodes whatever shape its descriptive fields have.

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<Bson>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_user_email: Option<Bson>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in_date: Option<Bson>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out_date: Option<Bson>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_days: Option<Bson>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<Bson>,

    /// Remaining client fields, stored verbatim
    #[serde(flatten)]
    pub extra: Document,
}

impl IntoIndexes for BookingDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![
            // Owner-scoped listing
            (
                doc! { "userEmail": 1 },
                Some(
                    IndexOptions::builder()
                        .name("user_email_index".to_string())
                        .build(),
                ),
            ),
        ]
    }
}

fn field_to_bson(value: Option<Value>) -> Result<Option<Bson>, InnspotError> {
    value
        .map(|v| {
            bson::to_bson(&v)
                .map_err(|e| InnspotError::BadRequest(format!("Unsupported booking field: {}", e)))
        })
        .transpose()
}

fn field_to_json(value: Option<Bson>) -> Option<Value> {
    value.map(Bson::into_relaxed_extjson)
}

impl TryFrom<Booking> for BookingDoc {
    type Error = InnspotError;

    /// The store assigns ids, so any client-sent `_id` is dropped
    fn try_from(booking: Booking) -> Result<Self, Self::Error> {
        let extra = bson::to_document(&booking.extra)
            .map_err(|e| InnspotError::BadRequest(format!("Unsupported booking field: {}", e)))?;

        Ok(BookingDoc {
            id: None,
            user_email: booking.user_email,
            user_name: field_to_bson(booking.user_name)?,
            contact_user_email: field_to_bson(booking.contact_user_email)?,
            check_in_date: field_to_bson(booking.check_in_date)?,
            check_out_date: field_to_bson(booking.check_out_date)?,
            total_days: field_to_bson(booking.total_days)?,
            total_price: field_to_bson(booking.total_price)?,
            extra,
        })
    }
}

impl From<BookingDoc> for Booking {
    fn from(doc: BookingDoc) -> Self {
        let extra = match Bson::Document(doc.extra).into_relaxed_extjson() {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        Booking {
            id: doc.id.map(|id| id.to_hex()),
            user_email: doc.user_email,
            user_name: field_to_json(doc.user_name),
            contact_user_email: field_to_json(doc.contact_user_email),
            check_in_date: field_to_json(doc.check_in_date),
            check_out_date: field_to_json(doc.check_out_date),
            total_days: field_to_json(doc.total_days),
            total_price: field_to_json(doc.total_price),
            extra,
        }
    }
}

/// `$set` update for the whitelisted booking fields present in the patch
pub fn booking_patch_update(patch: &BookingPatch) -> Result<Document, InnspotError> {
    let fields = bson::to_document(patch)
        .map_err(|e| InnspotError::Internal(format!("Failed to encode booking patch: {}", e)))?;
    Ok(doc! { "$set": fields })
}
