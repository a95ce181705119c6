//! cliento-server library crate
//!
//! Exposes `build_app`, `config`, `db` and `seed` for the binaries and the
//! integration tests.

pub mod auth;
pub mod config;
pub mod db;
mod error;
mod middleware;
mod routes;
pub mod seed;

pub use error::AppError;

use axum::{Extension, Router, middleware as axum_mw, routing::get};
use deadpool_postgres::Pool;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use auth::AuthSettings;
use config::Config;

/// Build the full application router with all routes and middleware.
///
/// Extracted from `main()` so integration tests can construct the app
/// without binding to a TCP port.
pub fn build_app(pool: Pool, config: &Config) -> Router {
    let settings = AuthSettings {
        token_ttl_hours: config.token_ttl_hours,
        password_iterations: config.password_iterations,
    };

    let rate_limiter = middleware::create_rate_limiter(config.rate_limit_rps);

    // Entity routes require a bearer token
    let protected_routes = routes::api_routes().layer(axum_mw::from_fn_with_state(
        pool.clone(),
        middleware::auth_middleware,
    ));

    let api_routes = Router::new()
        .merge(protected_routes)
        .merge(routes::auth_routes())
        .layer(Extension(settings))
        .layer(axum_mw::from_fn(middleware::rate_limit_middleware))
        .layer(Extension(rate_limiter));

    let public_routes = Router::new()
        .route("/", get(routes::metadata::get))
        .route("/health", get(routes::health::check))
        .route("/metrics", get(routes::metrics::get))
        .layer(Extension(prometheus_handle()));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .with_state(pool)
        .layer(axum_mw::from_fn(middleware::audit_middleware))
        .layer(axum_mw::from_fn(middleware::request_id_middleware))
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .layer(axum_mw::from_fn(middleware::metrics_middleware))
}

/// Install the global Prometheus recorder and return its render handle.
///
/// Only the first install wins; later calls (one per test app) still get a
/// usable handle instead of a panic.
fn prometheus_handle() -> PrometheusHandle {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    if metrics::set_global_recorder(recorder).is_err() {
        tracing::debug!("Metrics recorder already installed");
    }
    handle
}

/// `*` opens the API to any origin; anything else is an allow-list.
/// Unparseable origins are skipped.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins.iter().filter_map(|o| o.parse().ok()))
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, header},
    };
    use tower::ServiceExt;

    async fn preflight(origins: &[&str], origin: &str) -> Option<String> {
        let origins: Vec<String> = origins.iter().map(|o| o.to_string()).collect();
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(cors_layer(&origins));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn wildcard_allows_any_origin() {
        assert_eq!(
            preflight(&["*"], "http://localhost:5173").await.as_deref(),
            Some("*")
        );
    }

    #[tokio::test]
    async fn allow_list_rejects_other_origins() {
        let allowed = ["http://localhost:5173"];
        assert_eq!(
            preflight(&allowed, "http://localhost:5173").await.as_deref(),
            Some("http://localhost:5173")
        );
        assert_eq!(preflight(&allowed, "http://evil.test").await, None);
    }
}
