use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub image_path: String,
}

/// A bookable interval on a room. Times are "HH:MM" strings compared
/// lexically, which is sound for zero-padded 24h clock values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: String,
    pub room_id: String,
    pub start_time: String,
    pub end_time: String,
    pub status: SlotStatus,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Free,
    Pending,
    Reserved,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Free => "free",
            SlotStatus::Pending => "pending",
            SlotStatus::Reserved => "reserved",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "pending" => SlotStatus::Pending,
            "reserved" => SlotStatus::Reserved,
            _ => SlotStatus::Free,
        }
    }
}
