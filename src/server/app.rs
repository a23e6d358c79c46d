use axum::body::Body;
use axum::handler::HandlerWithoutStateExt;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::Response;
use axum::{extract::FromRef, extract::State, routing::get, Router};
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::error::ApiError;
use super::routes::{category_router, questions_router, quizzes_router};
use crate::settings::{CorsSettings, ServerSettings, Settings};
use crate::telemetry::Metrics;
use crate::trivia::quiz::SharedRng;

#[derive(FromRef, Clone)]
pub struct AppState {
    pool: SqlitePool,
    rng: SharedRng,
    metrics: Metrics,
}

impl AppState {
    pub fn new(pool: SqlitePool, rng: SharedRng, metrics: Metrics) -> Self {
        Self { pool, rng, metrics }
    }
}

pub fn build_router(state: AppState, server: &ServerSettings, cors: &CorsSettings) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .with_state(state.clone())
        .merge(category_router(state.clone()))
        .merge(questions_router(state.clone()))
        .merge(quizzes_router(state));

    let router = match &server.static_dir {
        Some(dir) => router.fallback_service(
            ServeDir::new(dir)
                .call_fallback_on_method_not_allowed(true)
                .not_found_service(not_found.into_service()),
        ),
        None => router.fallback(not_found),
    };

    router
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(state: AppState, settings: &Settings) -> anyhow::Result<()> {
    let addr = settings.server.address();
    let app = build_router(state, &settings.server, &settings.cors);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Serving on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

fn cors_layer(settings: &CorsSettings) -> CorsLayer {
    let origins = if settings.allows_any_origin() {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = settings
            .allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin: {e}");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };
    CorsLayer::new()
        .allow_origin(origins)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_methods([
            Method::GET,
            Method::PATCH,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
}

async fn health() -> &'static str {
    "ok"
}

async fn metrics(State(metrics): State<Metrics>) -> Result<Response, ApiError> {
    let (content_type, buf) = metrics
        .encode()
        .map_err(|e| ApiError::internal(format!("metrics encoding failed: {e}")))?;
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(buf))
        .map_err(|e| ApiError::internal(format!("metrics response failed: {e}")))
}

async fn not_found() -> ApiError {
    tracing::info!("Fallback");
    ApiError::not_found("no route")
}
