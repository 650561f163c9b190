use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Form;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::Role;
use crate::services::auth::{self, AuthError};
use crate::state::AppState;

use super::{session_cookie, SESSION_COOKIE};

static LOGIN_HTML: &str = include_str!("../web/login.html");
static SIGNUP_HTML: &str = include_str!("../web/signup.html");

pub async fn login_page() -> Html<&'static str> {
    Html(LOGIN_HTML)
}

pub async fn signup_page() -> Html<&'static str> {
    Html(SIGNUP_HTML)
}

// POST /signup
#[derive(Deserialize)]
pub struct SignupForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

pub async fn signup(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SignupForm>,
) -> Result<Redirect, Response> {
    let result = {
        let db = state.db.lock().unwrap();
        auth::sign_up(&db, &form.username, &form.email, &form.password)
    };

    match result {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "account created");
            Ok(Redirect::to("/"))
        }
        Err(AuthError::DuplicateEmail) => {
            tracing::warn!(email = %form.email, "signup with an already registered email");
            Ok(Redirect::to("/"))
        }
        Err(err) => Err(AppError::Database(anyhow::anyhow!(err)).into_response()),
    }
}

// POST /signin
#[derive(Deserialize)]
pub struct SigninForm {
    pub email: String,
    pub password: String,
}

pub async fn signin(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SigninForm>,
) -> Result<Response, Response> {
    let result = {
        let db = state.db.lock().unwrap();
        auth::sign_in(
            &db,
            &form.email,
            &form.password,
            state.config.session_ttl_hours,
        )
    };

    let (user, session) = match result {
        Ok(pair) => pair,
        Err(AuthError::NotFound) | Err(AuthError::InvalidCredential) => {
            tracing::warn!(email = %form.email, "failed sign-in");
            return Ok(Redirect::to("/").into_response());
        }
        Err(err) => return Err(AppError::Database(anyhow::anyhow!(err)).into_response()),
    };

    let target = match user.role {
        Role::Student => "/student_home",
        Role::Lecturer => "/approver_home",
        Role::Staff => "/staff_home",
    };

    let cookie = format!(
        "{SESSION_COOKIE}={}; Path=/; HttpOnly; Max-Age={}",
        session.id,
        state.config.session_ttl_hours * 3600,
    );
    let value = HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::Database(anyhow::anyhow!(e)).into_response())?;

    tracing::info!(user_id = %user.id, role = user.role.as_str(), "signed in");

    let mut response = Redirect::to(target).into_response();
    response.headers_mut().insert(header::SET_COOKIE, value);
    Ok(response)
}

// GET /logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, Response> {
    if let Some(session_id) = session_cookie(&headers) {
        let db = state.db.lock().unwrap();
        auth::sign_out(&db, &session_id)
            .map_err(|e| AppError::Database(anyhow::anyhow!(e)).into_response())?;
    }

    let mut response = Redirect::to("/").into_response();
    let clear = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Max-Age=0");
    if let Ok(value) = HeaderValue::from_str(&clear) {
        response.headers_mut().insert(header::SET_COOKIE, value);
    }
    Ok(response)
}
