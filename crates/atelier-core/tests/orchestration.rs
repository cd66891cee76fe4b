//! Orchestration scenarios driven through the public API

use atelier_core::orchestration::{AgentTemplate, ToolKind};
use atelier_core::{
    capabilities_for, select_model_for_context_size, select_model_for_task, AgentKind,
    AgentOverrides, AgentStatus, AiModel, AtelierConfig, AtelierError, Orchestrator, StepSpec,
    StepStatus, TaskRequest, TaskRequirements, ToolSpec, UsageOutcome, WorkflowStatus,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn ready() -> Orchestrator {
    let orchestrator = Orchestrator::new(&AtelierConfig::instant());
    orchestrator.initialize();
    orchestrator
}

#[test]
fn unmatched_inputs_route_to_default_model() {
    assert_eq!(select_model_for_task("interpretive-dance"), AiModel::Glm46);
    assert_eq!(select_model_for_context_size(0), AiModel::Glm46);
    assert_eq!(select_model_for_context_size(100_000), AiModel::DeepseekV32);
    assert_eq!(select_model_for_context_size(100_001), AiModel::KimiK2);
}

#[test]
fn unknown_model_identifier_is_rejected() {
    let err = capabilities_for("gpt-9").unwrap_err();
    assert!(matches!(err, AtelierError::UnknownModel(_)));
    assert_eq!(capabilities_for("glm-4.6").unwrap().model, AiModel::Glm46);
}

#[test]
fn starter_set_survives_repeated_initialize() {
    let orchestrator = ready();
    orchestrator.initialize();
    assert_eq!(orchestrator.agents().len(), AgentTemplate::STARTER.len());
}

#[test]
fn created_agents_are_offered_work() {
    let orchestrator = ready();
    let overrides = AgentOverrides {
        capabilities: Some(vec!["pipeline-design".to_string()]),
        ..Default::default()
    };
    let agent = orchestrator.create_agent(AgentKind::DevopsInfrastructure, overrides);

    let available = orchestrator.available_agents(&["pipeline-design".to_string()]);
    assert_eq!(available.len(), 1);
    assert_eq!(available[0].id, agent.id);

    let best = orchestrator
        .best_agent_for_task(
            "pipeline-design",
            &TaskRequirements {
                capabilities: vec!["pipeline-design".to_string()],
            },
        )
        .unwrap();
    assert_eq!(best.id, agent.id);
}

#[test]
fn offline_and_errored_agents_are_never_best() {
    let orchestrator = ready();
    for agent in orchestrator.agents() {
        if agent.id.as_str() != "requirement-analyst" {
            orchestrator.update_agent_status(agent.id.as_str(), AgentStatus::Offline, None);
        }
    }
    orchestrator.update_agent_status("requirement-analyst", AgentStatus::Error, None);

    assert!(orchestrator
        .best_agent_for_task("routing", &TaskRequirements::default())
        .is_none());
}

#[tokio::test]
async fn assigned_task_runs_to_completion() {
    let orchestrator = ready();
    let agent = orchestrator
        .best_agent_for_task("component-creation", &TaskRequirements::default())
        .unwrap();
    assert_eq!(agent.id.as_str(), "nextjs-developer");

    let workflow_id = orchestrator
        .assign_task(
            agent.id.as_str(),
            TaskRequest::of_type("component-creation").with_description("Create navbar"),
        )
        .unwrap();
    assert_eq!(
        orchestrator.agent("nextjs-developer").unwrap().status,
        AgentStatus::Active
    );

    let workflow = orchestrator
        .execute_workflow(workflow_id.as_str(), None)
        .await
        .unwrap();
    assert_eq!(workflow.status, WorkflowStatus::Completed);
    assert_eq!(workflow.progress, 100);
    assert_eq!(workflow.steps[0].status, StepStatus::Completed);

    let agent = orchestrator.agent("nextjs-developer").unwrap();
    assert_eq!(agent.status, AgentStatus::Idle);
    assert_eq!(agent.current_task, None);
    assert_eq!(agent.performance.tasks_completed, 1);
}

#[tokio::test]
async fn multi_step_workflow_with_dependencies() {
    let orchestrator = ready();
    let steps = vec![
        StepSpec::new("Gather requirements", "requirement-analyst"),
        StepSpec::new("Design layout", "ui-designer").depends_on("step-0"),
        StepSpec::new("Build page", "nextjs-developer")
            .with_input(json!({"route": "/about"}))
            .depends_on("step-0")
            .depends_on("step-1"),
    ];
    let id = orchestrator
        .create_workflow("About page", "Ship the about page", steps)
        .unwrap();

    let workflow = orchestrator.execute_workflow(id.as_str(), None).await.unwrap();
    let statuses: Vec<StepStatus> = workflow.steps.iter().map(|s| s.status).collect();
    assert_eq!(statuses, vec![StepStatus::Completed; 3]);
    assert!(orchestrator
        .agents()
        .iter()
        .all(|a| a.status == AgentStatus::Idle));
}

#[test]
fn forward_dependencies_are_rejected() {
    let orchestrator = ready();
    let steps = vec![
        StepSpec::new("Build", "nextjs-developer").depends_on("step-1"),
        StepSpec::new("Design", "ui-designer"),
    ];
    let err = orchestrator.create_workflow("w", "d", steps).unwrap_err();
    assert!(matches!(err, AtelierError::InvalidOperation(_)));
    assert!(orchestrator.workflows().is_empty());
}

#[test]
fn tool_statistics_evolve() {
    let orchestrator = ready();
    let id = orchestrator.register_tool(ToolSpec {
        name: "image-optimizer".to_string(),
        description: "Compress images".to_string(),
        kind: ToolKind::Static,
        category: "assets".to_string(),
        is_custom: false,
        is_dynamic: false,
        parameters: Vec::new(),
        created_by: None,
    });
    orchestrator.evolve_tool(
        id.as_str(),
        UsageOutcome {
            success: Some(true),
            execution_time: Some(500.0),
        },
    );

    let tool = orchestrator.tool(id.as_str()).unwrap();
    assert_eq!(tool.performance.usage_count, 1);
    assert_eq!(tool.performance.success_rate, 100.0);
    assert_eq!(tool.performance.average_execution_time, 250.0);
}
