use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Booking, Role};
use crate::services::booking::{self, BookingError};
use crate::state::AppState;

use super::{require_role, rooms_listing, DashboardResponse, RequestView, RoomListing};

// GET /approver_home
pub async fn home(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<DashboardResponse>, Response> {
    let user = require_role(&state, &headers, Role::Lecturer)?;
    Ok(Json(DashboardResponse::from(user)))
}

// GET /approver/browse_room
pub async fn browse_room(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<RoomListing>>, Response> {
    require_role(&state, &headers, Role::Lecturer)?;
    rooms_listing(&state)
}

// GET /approver/booking-requests
pub async fn booking_requests(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<RequestView>>, Response> {
    require_role(&state, &headers, Role::Lecturer)?;

    let db = state.db.lock().unwrap();
    let requests =
        queries::pending_all(&db).map_err(|e| AppError::Database(e).into_response())?;

    Ok(Json(requests.into_iter().map(RequestView::from).collect()))
}

#[derive(Deserialize)]
pub struct DecisionForm {
    #[serde(rename = "bookingId")]
    pub booking_id: String,
}

// POST /approver/approve-booking
pub async fn approve_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<DecisionForm>,
) -> Result<Redirect, Response> {
    let user = require_role(&state, &headers, Role::Lecturer)?;

    let result = {
        let mut db = state.db.lock().unwrap();
        booking::approve(&mut db, &user.id, &form.booking_id)
    };
    decision_response(result, "approved")
}

// POST /approver/reject-booking
pub async fn reject_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<DecisionForm>,
) -> Result<Redirect, Response> {
    let user = require_role(&state, &headers, Role::Lecturer)?;

    let result = {
        let mut db = state.db.lock().unwrap();
        booking::reject(&mut db, &user.id, &form.booking_id)
    };
    decision_response(result, "rejected")
}

fn decision_response(
    result: Result<Booking, BookingError>,
    verb: &str,
) -> Result<Redirect, Response> {
    match result {
        Ok(booking) => {
            tracing::info!(booking_id = %booking.id, action_by = %booking.action_by, "booking {verb}");
            Ok(Redirect::to("/approver/browse_room"))
        }
        Err(BookingError::NotFound) => {
            Err(AppError::NotFound("booking".to_string()).into_response())
        }
        Err(BookingError::NotPending) => {
            Err(AppError::Conflict("booking is not pending".to_string()).into_response())
        }
        Err(err) => Err(AppError::Database(anyhow::anyhow!(err)).into_response()),
    }
}
