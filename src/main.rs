use std::sync::{Arc, Mutex};

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use roombook::config::AppConfig;
use roombook::db::{self, queries};
use roombook::handlers;
use roombook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
    });

    // Expired sessions are invisible to lookups immediately; this sweep just
    // keeps the table from growing without bound.
    {
        let db = Arc::clone(&state.db);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(60 * 60));
            loop {
                interval.tick().await;
                let pruned = {
                    let conn = db.lock().unwrap();
                    queries::expire_old_sessions(&conn)
                };
                match pruned {
                    Ok(n) if n > 0 => tracing::info!("pruned {n} expired sessions"),
                    Ok(_) => {}
                    Err(e) => tracing::warn!("session pruning failed: {e}"),
                }
            }
        });
    }

    let app = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/", get(handlers::auth::login_page))
        .route("/signup", get(handlers::auth::signup_page))
        .route("/signup", post(handlers::auth::signup))
        .route("/signin", post(handlers::auth::signin))
        .route("/logout", get(handlers::auth::logout))
        .route("/student_home", get(handlers::student::home))
        .route("/student/browse_room", get(handlers::student::browse_room))
        .route("/booking", get(handlers::student::booking_form))
        .route("/booking", post(handlers::student::submit_booking))
        .route(
            "/student/checking_requests",
            get(handlers::student::checking_requests),
        )
        .route("/approver_home", get(handlers::approver::home))
        .route(
            "/approver/browse_room",
            get(handlers::approver::browse_room),
        )
        .route(
            "/approver/booking-requests",
            get(handlers::approver::booking_requests),
        )
        .route(
            "/approver/approve-booking",
            post(handlers::approver::approve_booking),
        )
        .route(
            "/approver/reject-booking",
            post(handlers::approver::reject_booking),
        )
        .route("/staff_home", get(handlers::staff::home))
        .route("/staff/browse_room", get(handlers::staff::browse_room))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
