//! Atelier Server Library
//!
//! Provides the HTTP/WebSocket front door to the Atelier orchestrator.

pub mod routes;
pub mod state;

use atelier_core::AtelierConfig;
use axum::{
    response::{IntoResponse, Json},
    routing::{get, post, put},
    Router,
};
use std::sync::Once;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use state::AppState;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing subscriber (only once)
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::new(
                std::env::var("RUST_LOG").unwrap_or_else(|_| {
                    "atelier_server=debug,atelier_core=info,tower_http=debug".into()
                }),
            ))
            .with(tracing_subscriber::fmt::layer())
            .init();
    });
}

/// Build the Axum router with all routes
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        // Model routes
        .route("/api/models", get(routes::list_model_capabilities))
        .route("/api/models/:id", get(routes::get_model))
        .route("/api/route", get(routes::route_model))
        // Agent routes
        .route("/api/agents", get(routes::list_agents).post(routes::create_agent))
        .route("/api/agents/initialize", post(routes::initialize))
        .route("/api/agents/available", get(routes::available_agents))
        .route("/api/agents/select", post(routes::select_agent))
        .route("/api/agents/from-template", post(routes::create_from_template))
        .route("/api/agents/:id", get(routes::get_agent))
        .route("/api/agents/:id/status", put(routes::update_agent_status))
        .route("/api/agents/:id/assign", post(routes::assign_task))
        // Workflow routes
        .route(
            "/api/workflows",
            get(routes::list_workflows).post(routes::create_workflow),
        )
        .route("/api/workflows/:id", get(routes::get_workflow))
        .route("/api/workflows/:id/execute", post(routes::execute_workflow))
        // Tool routes
        .route("/api/tools", get(routes::list_tools).post(routes::register_tool))
        .route("/api/tools/dynamic", post(routes::create_dynamic_tool))
        .route("/api/tools/:id", get(routes::get_tool))
        .route("/api/tools/:id/evolve", post(routes::evolve_tool))
        // Event stream
        .route("/api/events", get(routes::events_handler))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Run the Atelier server with the given configuration
pub async fn run_server(config: AtelierConfig) -> anyhow::Result<()> {
    init_tracing();

    tracing::info!("Starting Atelier Server...");

    let addr = config.server.bind_addr();
    let state = AppState::new(config);
    state.spawn_event_bridge();
    state.orchestrator.initialize();

    let app = build_router(state);

    tracing::info!("Listening on http://{}", addr);
    tracing::info!("Event stream: ws://{}/api/events", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": atelier_core::version()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        let state = AppState::new(AtelierConfig::instant());
        state.orchestrator.initialize();
        build_router(state)
    }

    async fn call(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = call(app(), "GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_model_lookup() {
        let (status, body) = call(app(), "GET", "/api/models/glm-4.6", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["model"]["model"], "glm-4.6");

        let (status, _) = call(app(), "GET", "/api/models/gpt-9", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_route_query() {
        let (status, body) = call(app(), "GET", "/api/route?task=vision", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["model"], "qwen3-vl-plus");

        let (status, _) = call(app(), "GET", "/api/route?task=vision&context=5", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_assign_to_unknown_agent() {
        let (status, body) = call(
            app(),
            "POST",
            "/api/agents/ghost/assign",
            Some(json!({"type": "routing"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Agent ghost not found");
    }

    #[tokio::test]
    async fn test_assign_and_execute() {
        let (status, body) = call(
            app(),
            "POST",
            "/api/agents/nextjs-developer/assign?execute=true",
            Some(json!({"type": "component-creation", "description": "Create navbar"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["workflow"]["status"], "completed");
        assert_eq!(body["workflow"]["progress"], 100);
    }

    #[tokio::test]
    async fn test_invalid_workflow_is_bad_request() {
        let (status, _) = call(
            app(),
            "POST",
            "/api/workflows",
            Some(json!({
                "name": "w",
                "steps": [{"name": "Build", "agent_id": "nextjs-developer", "dependencies": ["step-3"]}]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_select_agent() {
        let (status, body) = call(
            app(),
            "POST",
            "/api/agents/select",
            Some(json!({"task_type": "component-creation"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["agent"]["id"], "nextjs-developer");
    }
}
