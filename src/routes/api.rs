use crate::{handlers::{health_check, ready_check, stats}, routes::admin_middleware::admin_middleware};
use crate::config::Config;
use crate::docs::ApiDoc;
use crate::ws::handler::websocket_handler;
use crate::AppState;
use axum::http::{HeaderValue, Method};
use axum::{routing::get, Router, middleware};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create API routes
pub fn create_api_routes(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/v1/stats", get(stats))
        .route_layer(middleware::from_fn(admin_middleware)) // Applies to all routes added above
        .route("/v1/health", get(health_check))
        .route("/v1/ready", get(ready_check))
        .with_state(app_state)
}

/// Assemble the full application router: WebSocket endpoint, API routes,
/// Swagger UI, CORS and tracing layers.
pub fn create_app_routes(app_state: Arc<AppState>, config: &Config) -> Router {
    let api_routes = create_api_routes(app_state.clone());

    Router::new()
        // The live-sync endpoint clients upgrade on
        .route("/ws", get(websocket_handler))
        .with_state(app_state)
        // Mount API routes
        .nest("/api", api_routes)
        // Mount Swagger UI
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors_layer(config))
        // Add tracing layer
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &Config) -> CorsLayer {
    match &config.cors_origins {
        Some(origins) if origins.trim() != "*" => {
            let origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|origin| origin.trim().parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods([Method::GET, Method::POST])
        }
        // Unset or "*" means any origin may connect
        _ => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST]),
    }
}
