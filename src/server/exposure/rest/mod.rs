//! REST API exposure
//!
//! | route | auth |
//! |-------|------|
//! | `POST /login` | rate-limited |
//! | `POST /logout` | bearer |
//! | `GET/POST /orders`, `GET /orders/search` | bearer |
//! | `GET/PUT/DELETE /orders/{id}` | bearer |
//! | `GET /health`, `GET /healthz` | none |
//!
//! Anything else falls through to the static UI directory when one is set.

pub mod orders;
pub mod session;

use crate::auth::middleware::require_auth;
use crate::auth::rate_limit::login_rate_limit;
use crate::core::validation::MAX_BODY_BYTES;
use crate::server::host::AppState;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue, header};
use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use serde_json::{Value, json};
use std::path::PathBuf;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

pub struct RestExposure;

impl RestExposure {
    /// Build the full router with its middleware stack
    pub fn build_router(state: AppState, static_dir: Option<PathBuf>) -> Router {
        let protected = Router::new()
            .route("/logout", post(session::logout))
            .route("/orders", get(orders::list_orders).post(orders::create_order))
            .route("/orders/search", get(orders::search_orders))
            .route(
                "/orders/{id}",
                get(orders::get_order)
                    .put(orders::update_order)
                    .delete(orders::delete_order),
            )
            .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

        let login = Router::new()
            .route("/login", post(session::login))
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                login_rate_limit,
            ));

        let mut app = Self::health_routes()
            .merge(login)
            .merge(protected)
            .with_state(state);

        if let Some(dir) = static_dir {
            tracing::info!(dir = %dir.display(), "serving static files");
            app = app.fallback_service(ServeDir::new(dir));
        }

        app.layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(Self::security_header(header::REFERRER_POLICY, "no-referrer"))
                .layer(Self::security_header(header::X_FRAME_OPTIONS, "SAMEORIGIN"))
                .layer(Self::security_header(
                    header::X_CONTENT_TYPE_OPTIONS,
                    "nosniff",
                ))
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
    }

    fn security_header(
        name: HeaderName,
        value: &'static str,
    ) -> SetResponseHeaderLayer<HeaderValue> {
        SetResponseHeaderLayer::if_not_present(name, HeaderValue::from_static(value))
    }

    /// Build health check routes
    fn health_routes() -> Router<AppState> {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    /// Health check endpoint handler
    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "repair-desk"
        }))
    }
}
