//! API route handlers

use atelier_core::{
    capabilities_for, list_models, select_model_for_agent_type, select_model_for_context_size,
    select_model_for_task, AgentKind, AgentOverrides, AgentStatus, AgentTemplate, AtelierError,
    StepSpec, TaskRequest, TaskRequirements, ToolSpec, UsageOutcome,
};
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::broadcast::error::RecvError;

use crate::state::AppState;

type JsonResponse = (StatusCode, Json<Value>);

/// Map a core error onto an HTTP status
pub fn error_status(err: &AtelierError) -> StatusCode {
    if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else if matches!(err, AtelierError::InvalidOperation(_)) {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn error_response(err: AtelierError) -> JsonResponse {
    (
        error_status(&err),
        Json(json!({
            "success": false,
            "error": err.to_string()
        })),
    )
}

fn not_found(what: &str, id: &str) -> JsonResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("{} {} not found", what, id) })),
    )
}

// ========== Model Routes ==========

/// List the model capability table
pub async fn list_model_capabilities() -> impl IntoResponse {
    Json(json!({ "models": list_models() }))
}

/// Get one model's declared capabilities
pub async fn get_model(Path(id): Path<String>) -> impl IntoResponse {
    match capabilities_for(&id) {
        Ok(capability) => (StatusCode::OK, Json(json!({ "model": capability }))),
        Err(e) => error_response(e),
    }
}

#[derive(Deserialize)]
pub struct RouteQuery {
    task: Option<String>,
    agent_type: Option<String>,
    context: Option<u64>,
}

/// Ask the model router for a model
///
/// Exactly one of `task`, `agent_type` or `context` selects the routing table.
pub async fn route_model(Query(query): Query<RouteQuery>) -> impl IntoResponse {
    let model = match (query.task, query.agent_type, query.context) {
        (Some(task), None, None) => select_model_for_task(&task),
        (None, Some(agent_type), None) => select_model_for_agent_type(&agent_type),
        (None, None, Some(tokens)) => select_model_for_context_size(tokens),
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Specify exactly one of task, agent_type or context" })),
            )
        }
    };

    (
        StatusCode::OK,
        Json(json!({
            "model": model,
            "capabilities": model.capabilities()
        })),
    )
}

// ========== Agent Routes ==========

/// Create the starter agents (idempotent)
pub async fn initialize(State(state): State<AppState>) -> impl IntoResponse {
    let created = state.orchestrator.initialize();
    Json(json!({
        "success": true,
        "initialized": created,
        "agents": state.orchestrator.agents().len()
    }))
}

/// List all agents
pub async fn list_agents(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "agents": state.orchestrator.agents() }))
}

#[derive(Deserialize)]
pub struct AvailableQuery {
    /// Comma-separated capability filter
    capabilities: Option<String>,
}

/// List agents that may take work
pub async fn available_agents(
    State(state): State<AppState>,
    Query(query): Query<AvailableQuery>,
) -> impl IntoResponse {
    let required: Vec<String> = query
        .capabilities
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(String::from)
        .collect();

    Json(json!({ "agents": state.orchestrator.available_agents(&required) }))
}

/// Get agent by ID
pub async fn get_agent(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.orchestrator.agent(&id) {
        Some(agent) => (StatusCode::OK, Json(json!({ "agent": agent }))),
        None => not_found("Agent", &id),
    }
}

#[derive(Deserialize)]
pub struct CreateAgentRequest {
    #[serde(rename = "type")]
    kind: AgentKind,
    #[serde(flatten)]
    overrides: AgentOverrides,
}

/// Create an ad hoc agent
pub async fn create_agent(
    State(state): State<AppState>,
    Json(req): Json<CreateAgentRequest>,
) -> impl IntoResponse {
    let agent = state.orchestrator.create_agent(req.kind, req.overrides);
    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "agent": agent })),
    )
}

#[derive(Deserialize)]
pub struct FromTemplateRequest {
    template: AgentTemplate,
}

/// Create an agent from a template under a fresh id
pub async fn create_from_template(
    State(state): State<AppState>,
    Json(req): Json<FromTemplateRequest>,
) -> impl IntoResponse {
    let agent = state.orchestrator.create_from_template(req.template);
    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "agent": agent })),
    )
}

#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    status: AgentStatus,
    current_task: Option<String>,
}

/// Set an agent's status
pub async fn update_agent_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> impl IntoResponse {
    // The orchestrator ignores unknown ids; report them to HTTP callers
    if state.orchestrator.agent(&id).is_none() {
        return not_found("Agent", &id);
    }
    state
        .orchestrator
        .update_agent_status(&id, req.status, req.current_task);
    (
        StatusCode::OK,
        Json(json!({ "success": true, "agent": state.orchestrator.agent(&id) })),
    )
}

#[derive(Deserialize)]
pub struct SelectAgentRequest {
    task_type: String,
    #[serde(default)]
    requirements: TaskRequirements,
}

/// Pick the best available agent for a task type
pub async fn select_agent(
    State(state): State<AppState>,
    Json(req): Json<SelectAgentRequest>,
) -> impl IntoResponse {
    match state
        .orchestrator
        .best_agent_for_task(&req.task_type, &req.requirements)
    {
        Some(agent) => (StatusCode::OK, Json(json!({ "agent": agent }))),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "No available agent" })),
        ),
    }
}

#[derive(Deserialize)]
pub struct AssignQuery {
    #[serde(default)]
    execute: bool,
}

/// Assign a task to an agent, optionally running the resulting workflow
pub async fn assign_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<AssignQuery>,
    Json(task): Json<TaskRequest>,
) -> impl IntoResponse {
    let workflow_id = match state.orchestrator.assign_task(&id, task) {
        Ok(workflow_id) => workflow_id,
        Err(e) => return error_response(e),
    };

    if !query.execute {
        return (
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "workflow_id": workflow_id,
                "workflow": state.orchestrator.workflow(workflow_id.as_str())
            })),
        );
    }

    match state
        .orchestrator
        .execute_workflow(workflow_id.as_str(), None)
        .await
    {
        Ok(workflow) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "workflow_id": workflow_id,
                "workflow": workflow
            })),
        ),
        Err(e) => error_response(e),
    }
}

// ========== Workflow Routes ==========

/// List all workflows
pub async fn list_workflows(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "workflows": state.orchestrator.workflows() }))
}

/// Get workflow by ID
pub async fn get_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.orchestrator.workflow(&id) {
        Some(workflow) => (StatusCode::OK, Json(json!({ "workflow": workflow }))),
        None => not_found("Workflow", &id),
    }
}

#[derive(Deserialize)]
pub struct CreateWorkflowRequest {
    name: String,
    #[serde(default)]
    description: String,
    steps: Vec<StepSpec>,
}

/// Create a pending workflow
pub async fn create_workflow(
    State(state): State<AppState>,
    Json(req): Json<CreateWorkflowRequest>,
) -> impl IntoResponse {
    match state
        .orchestrator
        .create_workflow(&req.name, &req.description, req.steps)
    {
        Ok(id) => (
            StatusCode::CREATED,
            Json(json!({
                "success": true,
                "workflow": state.orchestrator.workflow(id.as_str())
            })),
        ),
        Err(e) => error_response(e),
    }
}

#[derive(Deserialize, Default)]
pub struct ExecuteWorkflowRequest {
    input: Option<Value>,
}

/// Run a workflow and return its final state
pub async fn execute_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<ExecuteWorkflowRequest>>,
) -> impl IntoResponse {
    let input = body.and_then(|Json(req)| req.input);
    match state.orchestrator.execute_workflow(&id, input).await {
        Ok(workflow) => (
            StatusCode::OK,
            Json(json!({ "success": true, "workflow": workflow })),
        ),
        Err(e) => error_response(e),
    }
}

// ========== Tool Routes ==========

/// List all tools
pub async fn list_tools(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({ "tools": state.orchestrator.tools() }))
}

/// Get tool by ID
pub async fn get_tool(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.orchestrator.tool(&id) {
        Some(tool) => (StatusCode::OK, Json(json!({ "tool": tool }))),
        None => not_found("Tool", &id),
    }
}

/// Register a tool
pub async fn register_tool(
    State(state): State<AppState>,
    Json(spec): Json<ToolSpec>,
) -> impl IntoResponse {
    let id = state.orchestrator.register_tool(spec);
    (
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "tool": state.orchestrator.tool(id.as_str())
        })),
    )
}

#[derive(Deserialize)]
pub struct DynamicToolRequest {
    description: String,
    #[serde(default)]
    requirements: Value,
}

/// Register a generated placeholder tool
pub async fn create_dynamic_tool(
    State(state): State<AppState>,
    Json(req): Json<DynamicToolRequest>,
) -> impl IntoResponse {
    let tool = state
        .orchestrator
        .create_dynamic_tool(&req.description, &req.requirements);
    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "tool": tool })),
    )
}

/// Report one tool use
pub async fn evolve_tool(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(outcome): Json<UsageOutcome>,
) -> impl IntoResponse {
    if state.orchestrator.tool(&id).is_none() {
        return not_found("Tool", &id);
    }
    state.orchestrator.evolve_tool(&id, outcome);
    (
        StatusCode::OK,
        Json(json!({ "success": true, "tool": state.orchestrator.tool(&id) })),
    )
}

// ========== WebSocket Handler ==========

/// WebSocket stream of orchestrator events
pub async fn events_handler(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_events(socket, state))
}

async fn handle_events(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let mut events = state.events.subscribe();

    tracing::info!("Event stream connected");

    let hello = json!({
        "type": "connected",
        "version": atelier_core::version(),
        "initialized": state.orchestrator.is_initialized()
    });
    if sender.send(Message::Text(hello.to_string())).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    let text = match serde_json::to_string(&event) {
                        Ok(text) => text,
                        Err(e) => {
                            tracing::error!("Failed to serialize event: {}", e);
                            continue;
                        }
                    };
                    if sender.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event stream lagging");
                    let notice = json!({ "type": "lagged", "skipped": skipped });
                    let _ = sender.send(Message::Text(notice.to_string())).await;
                }
                Err(RecvError::Closed) => break,
            },
            msg = receiver.next() => match msg {
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("Event stream closed");
                    break;
                }
                Some(Err(e)) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
                Some(Ok(_)) => {}
            },
        }
    }
}
