use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;
use axum::Json;

use crate::models::Role;
use crate::state::AppState;

use super::{require_role, rooms_listing, DashboardResponse, RoomListing};

// GET /staff_home
pub async fn home(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<DashboardResponse>, Response> {
    let user = require_role(&state, &headers, Role::Staff)?;
    Ok(Json(DashboardResponse::from(user)))
}

// GET /staff/browse_room
pub async fn browse_room(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<RoomListing>>, Response> {
    require_role(&state, &headers, Role::Staff)?;
    rooms_listing(&state)
}
