//! Booking domain model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::InnspotError;

/// Fields a booking update is allowed to overwrite
pub const PATCHABLE_FIELDS: [&str; 6] = [
    "userName",
    "contactUserEmail",
    "checkInDate",
    "checkOutDate",
    "totalDays",
    "totalPrice",
];

/// A booking as submitted by the client and stored verbatim.
///
/// `userEmail` is the ownership key checked against the caller's token and
/// the only typed field. Dates, totals and names are caller-supplied JSON
/// kept exactly as sent: never validated, coerced or recomputed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub user_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_user_email: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in_date: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out_date: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_days: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<Value>,
    /// Any other fields the client sent (room reference, images, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn overwrite(field: &mut Option<Value>, value: &Option<Value>) {
    if let Some(v) = value {
        *field = Some(v.clone());
    }
}

impl Booking {
    /// Apply a whitelisted patch in place
    pub fn apply(&mut self, patch: &BookingPatch) {
        overwrite(&mut self.user_name, &patch.user_name);
        overwrite(&mut self.contact_user_email, &patch.contact_user_email);
        overwrite(&mut self.check_in_date, &patch.check_in_date);
        overwrite(&mut self.check_out_date, &patch.check_out_date);
        overwrite(&mut self.total_days, &patch.total_days);
        overwrite(&mut self.total_price, &patch.total_price);
    }
}

/// Partial update of a booking. Fields outside the whitelist are ignored;
/// values are taken as sent, like the booking itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_user_email: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in_date: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out_date: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_days: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_price: Option<Value>,
}

impl BookingPatch {
    pub fn is_empty(&self) -> bool {
        self.user_name.is_none()
            && self.contact_user_email.is_none()
            && self.check_in_date.is_none()
            && self.check_out_date.is_none()
            && self.total_days.is_none()
            && self.total_price.is_none()
    }

    /// Reject patches that would not change anything
    pub fn ensure_not_empty(&self) -> Result<(), InnspotError> {
        if self.is_empty() {
            return Err(InnspotError::BadRequest(format!(
                "update must set at least one of: {}",
                PATCHABLE_FIELDS.join(", ")
            )));
        }
        Ok(())
    }
}
