// Growth Points - Web Server
// REST API with Axum: parse utterances against the configured children

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use growth_points::{Child, ChildRegistry, CommandParser, ParseResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Shared application state (read-only: every parse is independent)
#[derive(Clone)]
struct AppState {
    registry: Arc<ChildRegistry>,
    parser: Arc<CommandParser>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

/// Parse request
#[derive(Deserialize)]
struct ParseRequest {
    utterance: String,
    /// Overrides the configured registry for this call only
    #[serde(default)]
    children: Option<Vec<Child>>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/children - Configured registry, in resolution order
async fn get_children(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.registry.children().to_vec()))
}

/// POST /api/parse - Parse one utterance
async fn parse_utterance(
    State(state): State<AppState>,
    Json(request): Json<ParseRequest>,
) -> impl IntoResponse {
    let children = request
        .children
        .as_deref()
        .unwrap_or_else(|| state.registry.children());

    let response: ParseResponse = state.parser.parse(&request.utterance, children).into();
    tracing::info!(success = response.is_success(), "parsed utterance");

    (StatusCode::OK, Json(response))
}

fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/children", get(get_children))
        .route("/parse", post(parse_utterance))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

fn load_registry() -> anyhow::Result<ChildRegistry> {
    match std::env::var("GROWTH_POINTS_REGISTRY") {
        Ok(path) => ChildRegistry::from_file(path),
        Err(_) => Ok(ChildRegistry::with_defaults()),
    }
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    println!("🌐 Growth Points - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let registry = load_registry()?;
    println!("✓ Registry loaded: {} children", registry.count());
    if registry.is_empty() {
        println!("⚠️  Registry is empty: requests must send their own children");
    }

    let state = AppState {
        registry: Arc::new(registry),
        parser: Arc::new(CommandParser::new()),
    };

    let app = build_router(state);

    let addr = std::env::var("GROWTH_POINTS_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", addr, e))?;

    println!("\n🚀 Server running on http://{}", addr);
    println!("   API: POST /api/parse");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app).await?;

    Ok(())
}
