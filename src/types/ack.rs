//! Write acknowledgements returned by the store
//!
//! Shapes follow the MongoDB driver results the web client already reads.

use serde::{Deserialize, Serialize};

/// Result of inserting one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    pub inserted_id: String,
}

impl InsertAck {
    pub fn new(inserted_id: impl Into<String>) -> Self {
        Self {
            acknowledged: true,
            inserted_id: inserted_id.into(),
        }
    }
}

/// Result of updating at most one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<String>,
}

impl UpdateAck {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
            upserted_count: 0,
            upserted_id: None,
        }
    }

    /// No document matched the filter
    pub fn unmatched() -> Self {
        Self::new(0, 0)
    }
}

impl From<mongodb::results::UpdateResult> for UpdateAck {
    fn from(result: mongodb::results::UpdateResult) -> Self {
        let upserted_id = result.upserted_id.as_ref().map(|id| match id.as_object_id() {
            Some(oid) => oid.to_hex(),
            None => id.to_string(),
        });

        Self {
            acknowledged: true,
            matched_count: result.matched_count,
            modified_count: result.modified_count,
            upserted_count: u64::from(upserted_id.is_some()),
            upserted_id,
        }
    }
}

/// Result of deleting at most one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteAck {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}

impl From<mongodb::results::DeleteResult> for DeleteAck {
    fn from(result: mongodb::results::DeleteResult) -> Self {
        Self::new(result.deleted_count)
    }
}
