use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::{handlers, state::AppState};

pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Player endpoints
        .route("/api/players/search/:name", get(handlers::search_player))
        .route("/api/players/analyze", post(handlers::analyze_player))
        .route("/api/players/compare", post(handlers::compare_players))
        .with_state(state)
        .layer(cors)
}
