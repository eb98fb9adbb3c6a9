//! API Routes
//!
//! Configures the Axum router with all cache endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_all_handler, clear_tier_handler, delete_handler, get_handler, health_handler,
    invalidate_pattern_handler, invalidate_resource_handler, keys_handler, set_handler,
    stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /tiers/:tier/entries` - Store a value
/// - `GET /tiers/:tier/entries/:key` - Read a value
/// - `DELETE /tiers/:tier/entries/:key` - Delete a key
/// - `GET /tiers/:tier/keys` - List in-memory keys
/// - `POST /tiers/:tier/invalidate` - Delete keys matching a pattern
/// - `DELETE /tiers/:tier` - Clear one tier
/// - `DELETE /tiers` - Clear every tier
/// - `POST /resources/:resource/invalidate` - Run a resource's invalidation strategy
/// - `GET /stats` - Per-tier statistics
/// - `GET /health` - Health check
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/tiers", delete(clear_all_handler))
        .route("/tiers/:tier", delete(clear_tier_handler))
        .route("/tiers/:tier/entries", put(set_handler))
        .route(
            "/tiers/:tier/entries/:key",
            get(get_handler).delete(delete_handler),
        )
        .route("/tiers/:tier/keys", get(keys_handler))
        .route("/tiers/:tier/invalidate", post(invalidate_pattern_handler))
        .route(
            "/resources/:resource/invalidate",
            post(invalidate_resource_handler),
        )
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
