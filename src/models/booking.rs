use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub room_id: String,
    pub slot_id: String,
    pub objective: String,
    pub status: BookingStatus,
    /// User id of the last actor: the requester on create, the approver after
    /// a decision.
    pub action_by: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Approved,
    Rejected,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Approved => "approved",
            BookingStatus::Rejected => "rejected",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "approved" => BookingStatus::Approved,
            "rejected" => BookingStatus::Rejected,
            _ => BookingStatus::Pending,
        }
    }
}

/// A pending booking joined with its room and slot display data, as shown in
/// the student and approver request listings.
#[derive(Debug, Clone, Serialize)]
pub struct BookingRequest {
    pub id: String,
    pub user_id: String,
    pub room_id: String,
    pub room_name: String,
    pub image_path: String,
    pub slot_id: String,
    pub start_time: String,
    pub end_time: String,
    pub objective: String,
    pub status: BookingStatus,
    pub date: NaiveDate,
}
