use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::queries;
use crate::models::{Role, Session, User};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error("no account for that email")]
    NotFound,

    #[error("invalid credential")]
    InvalidCredential,

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error(transparent)]
    Database(#[from] anyhow::Error),
}

/// Registers a student account. Lecturer and staff accounts are provisioned
/// directly by operators, not through self-service signup.
pub fn sign_up(
    conn: &Connection,
    username: &str,
    email: &str,
    password: &str,
) -> Result<User, AuthError> {
    if queries::get_user_by_email(conn, email)?.is_some() {
        return Err(AuthError::DuplicateEmail);
    }

    let password_hash = hash(password, DEFAULT_COST).map_err(|e| AuthError::Hash(e.to_string()))?;

    let user = User {
        id: Uuid::new_v4().to_string(),
        username: username.to_string(),
        email: email.to_string(),
        password_hash,
        role: Role::Student,
    };
    queries::create_user(conn, &user)?;

    Ok(user)
}

/// Verifies the credential and opens a session bound to the user id. The
/// session carries no other claims; every request re-resolves the user row.
pub fn sign_in(
    conn: &Connection,
    email: &str,
    password: &str,
    ttl_hours: i64,
) -> Result<(User, Session), AuthError> {
    let user = queries::get_user_by_email(conn, email)?.ok_or(AuthError::NotFound)?;

    let ok = verify(password, &user.password_hash).map_err(|e| AuthError::Hash(e.to_string()))?;
    if !ok {
        return Err(AuthError::InvalidCredential);
    }

    let now = Utc::now().naive_utc();
    let session = Session {
        id: Uuid::new_v4().to_string(),
        user_id: user.id.clone(),
        created_at: now,
        expires_at: now + Duration::hours(ttl_hours),
    };
    queries::create_session(conn, &session)?;

    Ok((user, session))
}

pub fn sign_out(conn: &Connection, session_id: &str) -> Result<bool, AuthError> {
    Ok(queries::delete_session(conn, session_id)?)
}
