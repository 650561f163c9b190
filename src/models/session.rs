use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Server-side session record. The id is the opaque key handed to the
/// browser; nothing besides the user id is stored against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}
