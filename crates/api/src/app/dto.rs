use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};

use adminhub_core::RecordId;
use adminhub_tourism::{BookingStatus, NewBooking};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachImagesRequest {
    #[serde(default)]
    pub id_front_url: Option<String>,
    #[serde(default)]
    pub id_back_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameZoneRequest {
    pub new_name: String,
}

#[derive(Debug, Deserialize)]
pub struct MergeZonesRequest {
    pub sources: Vec<String>,
    pub target: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteZoneQuery {
    pub reassign_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BookingStatusRequest {
    pub status: BookingStatus,
}

/// Price a prospective booking without storing it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub package: RecordId,
    #[serde(default)]
    pub guide: Option<RecordId>,
    pub travelers: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl From<&NewBooking> for QuoteRequest {
    fn from(value: &NewBooking) -> Self {
        Self {
            package: value.package,
            guide: value.guide,
            travelers: value.travelers,
            start_date: value.start_date,
            end_date: value.end_date,
        }
    }
}

// -------------------------
// Response helpers
// -------------------------

/// `{"data": <value>}` envelope used by every record endpoint.
pub fn data<T: Serialize>(value: T) -> JsonValue {
    json!({ "data": value })
}

pub fn next_id(identifier: impl Serialize) -> JsonValue {
    json!({ "nextId": identifier })
}
