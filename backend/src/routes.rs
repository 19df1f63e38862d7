use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .route(
            "/login",
            get(handlers::login::show_login).post(handlers::login::submit_login),
        )
        .route(
            "/today",
            get(handlers::today::show_today).post(handlers::today::save_today),
        )
        .route("/logout", post(handlers::today::logout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
