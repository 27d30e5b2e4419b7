//! HTTP side of the service: API docs plus a JSON error envelope.
//!
//! There is no CRUD over HTTP; concerts are managed through the bot.

use std::{any::Any, net::SocketAddr};

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer};

use bakr_core::{config::Config, errors::Error};

const SWAGGER_UI_HTML: &str = include_str!("../assets/swagger-ui.html");
const SWAGGER_JSON: &str = include_str!("../assets/swagger.json");

const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    success: bool,
    message: String,
    status_code: u16,
}

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorBody {
            success: false,
            message,
            status_code: status.as_u16(),
        });
        (status, body).into_response()
    }
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Not Found".to_string())
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("handler panicked: {detail}");
    ApiError::Internal("Internal Server Error".to_string()).into_response()
}

// ============================================================
// Routes
// ============================================================

async fn swagger_ui() -> Html<&'static str> {
    Html(SWAGGER_UI_HTML)
}

async fn swagger_json() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], SWAGGER_JSON)
}

fn docs_routes() -> Router {
    Router::new()
        .route("/swagger-ui", get(swagger_ui))
        .route("/swagger-ui/", get(swagger_ui))
        .route("/swagger-ui/swagger.json", get(swagger_json))
}

fn cors(origins: &[String]) -> Result<CorsLayer, Error> {
    let origins = origins
        .iter()
        .map(|o| {
            HeaderValue::from_str(o)
                .map_err(|e| Error::Config(format!("invalid CORS origin {o:?}: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true))
}

fn with_layers(routes: Router, cors_origins: &[String]) -> Result<Router, Error> {
    Ok(routes
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors(cors_origins)?))
}

/// Docs routes with the JSON fallback, body limit, panic guard and CORS.
pub fn router(cors_origins: &[String]) -> Result<Router, Error> {
    with_layers(docs_routes(), cors_origins)
}

/// Serve until `shutdown` is cancelled.
pub async fn serve(cfg: &Config, shutdown: CancellationToken) -> anyhow::Result<()> {
    let app = router(&cfg.cors_origins)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.http_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("http server stopped");
    Ok(())
}
