use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};

use crate::routes::trigger;
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    // The refresh button lives on a static frontend served elsewhere.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::<AppState>::new()
        .merge(trigger::router())
        .route("/health", get(health))
        .layer(cors)
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}
