use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::queries;
use crate::errors::AppError;
use crate::models::Role;
use crate::services::booking::{self, BookingError};
use crate::state::AppState;

use super::{require_role, rooms_listing, DashboardResponse, RequestView, RoomListing};

// GET /student_home
pub async fn home(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<DashboardResponse>, Response> {
    let user = require_role(&state, &headers, Role::Student)?;
    Ok(Json(DashboardResponse::from(user)))
}

// GET /student/browse_room
pub async fn browse_room(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<RoomListing>>, Response> {
    require_role(&state, &headers, Role::Student)?;
    rooms_listing(&state)
}

// GET /booking?roomId=..&slotId=..
#[derive(Deserialize)]
pub struct BookingFormQuery {
    #[serde(rename = "roomId")]
    pub room_id: String,
    #[serde(rename = "slotId")]
    pub slot_id: String,
}

#[derive(Serialize)]
pub struct BookingFormResponse {
    room_id: String,
    room_name: String,
    image_path: String,
    slot_id: String,
    start_time: String,
    end_time: String,
}

pub async fn booking_form(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingFormQuery>,
) -> Result<Json<BookingFormResponse>, Response> {
    require_role(&state, &headers, Role::Student)?;

    let db = state.db.lock().unwrap();

    let room = queries::get_room(&db, &query.room_id)
        .map_err(|e| AppError::Database(e).into_response())?
        .ok_or_else(|| AppError::NotFound("room".to_string()).into_response())?;
    let slot = queries::get_time_slot(&db, &query.slot_id)
        .map_err(|e| AppError::Database(e).into_response())?
        .ok_or_else(|| AppError::NotFound("time slot".to_string()).into_response())?;

    Ok(Json(BookingFormResponse {
        room_id: room.id,
        room_name: room.name,
        image_path: room.image_path,
        slot_id: slot.id,
        start_time: slot.start_time,
        end_time: slot.end_time,
    }))
}

// POST /booking
#[derive(Deserialize)]
pub struct BookingForm {
    #[serde(rename = "roomId")]
    pub room_id: String,
    #[serde(rename = "slotId")]
    pub slot_id: String,
    pub objective: String,
}

pub async fn submit_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<BookingForm>,
) -> Result<Redirect, Response> {
    let user = require_role(&state, &headers, Role::Student)?;

    let now = Utc::now().naive_utc();
    let result = {
        let mut db = state.db.lock().unwrap();
        booking::create(
            &mut db,
            &user,
            &form.room_id,
            &form.slot_id,
            &form.objective,
            now,
        )
    };

    match result {
        Ok(booking) => {
            tracing::info!(booking_id = %booking.id, user_id = %user.id, "booking submitted");
            Ok(Redirect::to("/student/checking_requests"))
        }
        Err(BookingError::Database(e)) => Err(AppError::Database(e).into_response()),
        Err(err) => {
            tracing::warn!(user_id = %user.id, %err, "booking refused");
            Ok(Redirect::to("/student/browse_room"))
        }
    }
}

// GET /student/checking_requests
pub async fn checking_requests(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<RequestView>>, Response> {
    let user = require_role(&state, &headers, Role::Student)?;

    let db = state.db.lock().unwrap();
    let requests = queries::pending_for_user(&db, &user.id)
        .map_err(|e| AppError::Database(e).into_response())?;

    Ok(Json(requests.into_iter().map(RequestView::from).collect()))
}
