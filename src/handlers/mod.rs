pub mod approver;
pub mod auth;
pub mod health;
pub mod staff;
pub mod student;

use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::Serialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{BookingRequest, Role, User};
use crate::services::catalog;
use crate::state::AppState;

pub(crate) const SESSION_COOKIE: &str = "session";

pub(crate) fn session_cookie(headers: &HeaderMap) -> Option<String> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then(|| value.to_string())
    })
}

/// The authorization gate every protected handler runs first.
///
/// Missing/expired sessions and wrong-role users both get a redirect to the
/// anonymous entry point — deliberately indistinguishable. A live session
/// pointing at a deleted user is a 404.
pub(crate) fn require_role(
    state: &AppState,
    headers: &HeaderMap,
    role: Role,
) -> Result<User, Response> {
    let user = resolve_user(state, headers)?;
    if user.role != role {
        return Err(Redirect::to("/").into_response());
    }
    Ok(user)
}

fn resolve_user(state: &AppState, headers: &HeaderMap) -> Result<User, Response> {
    let Some(session_id) = session_cookie(headers) else {
        return Err(Redirect::to("/").into_response());
    };

    let db = state.db.lock().unwrap();

    let session = queries::get_session(&db, &session_id)
        .map_err(|e| AppError::Database(e).into_response())?;
    let Some(session) = session else {
        return Err(Redirect::to("/").into_response());
    };

    let user = queries::get_user_by_id(&db, &session.user_id)
        .map_err(|e| AppError::Database(e).into_response())?;
    user.ok_or_else(|| AppError::NotFound("user".to_string()).into_response())
}

// ── Shared view models ──

#[derive(Serialize)]
pub struct DashboardResponse {
    pub username: String,
    pub email: String,
    pub role: String,
}

impl From<User> for DashboardResponse {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            email: user.email,
            role: user.role.as_str().to_string(),
        }
    }
}

#[derive(Serialize)]
pub struct SlotView {
    pub id: String,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
}

#[derive(Serialize)]
pub struct RoomListing {
    pub id: String,
    pub name: String,
    pub image_path: String,
    pub time_slots: Vec<SlotView>,
}

#[derive(Serialize)]
pub struct RequestView {
    pub id: String,
    pub user_id: String,
    pub room_id: String,
    pub room_name: String,
    pub image_path: String,
    pub slot_id: String,
    pub start_time: String,
    pub end_time: String,
    pub objective: String,
    pub status: String,
    pub date: String,
}

impl From<BookingRequest> for RequestView {
    fn from(req: BookingRequest) -> Self {
        Self {
            id: req.id,
            user_id: req.user_id,
            room_id: req.room_id,
            room_name: req.room_name,
            image_path: req.image_path,
            slot_id: req.slot_id,
            start_time: req.start_time,
            end_time: req.end_time,
            objective: req.objective,
            status: req.status.as_str().to_string(),
            date: req.date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// The room+slot listing is identical for every role; only the gate differs.
pub(crate) fn rooms_listing(state: &AppState) -> Result<Json<Vec<RoomListing>>, Response> {
    let db = state.db.lock().unwrap();
    let rooms =
        catalog::rooms_with_slots(&db).map_err(|e| AppError::Database(e).into_response())?;

    let listing = rooms
        .into_iter()
        .map(|entry| RoomListing {
            id: entry.room.id,
            name: entry.room.name,
            image_path: entry.room.image_path,
            time_slots: entry
                .slots
                .into_iter()
                .map(|slot| SlotView {
                    id: slot.id,
                    start_time: slot.start_time,
                    end_time: slot.end_time,
                    status: slot.status.as_str().to_string(),
                })
                .collect(),
        })
        .collect();

    Ok(Json(listing))
}
