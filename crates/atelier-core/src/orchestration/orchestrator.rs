//! Orchestrator
//!
//! Single owner of the agent registry, tool registry and workflow store.
//! Callers hold it by handle (usually `Arc<Orchestrator>`).
//!
//! Lock order is agents, then tools, then workflows. No guard is held across
//! an await point.

use super::agents::AgentRegistry;
use super::runner::{SimulatedRunner, StepOutcome, StepRequest, StepRunner};
use super::templates::AgentTemplate;
use super::tools::ToolRegistry;
use super::types::{
    now_millis, AgentKind, AgentOverrides, AgentRecord, AgentStatus, StepSpec, StepStatus,
    TaskRequest, TaskRequirements, ToolId, ToolRecord, ToolSpec, UsageOutcome, Workflow,
    WorkflowId, WorkflowStatus,
};
use super::workflow::WorkflowStore;
use crate::config::AtelierConfig;
use crate::error::{AtelierError, Result};
use crate::events::{EventBus, OrchestratorEvent};
use crossbeam_channel::Receiver;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Coordinates agents, tools and workflows
pub struct Orchestrator {
    agents: RwLock<AgentRegistry>,
    tools: RwLock<ToolRegistry>,
    workflows: RwLock<WorkflowStore>,
    initialized: AtomicBool,
    runner: Arc<dyn StepRunner>,
    events: EventBus,
    starter_agents: Vec<AgentTemplate>,
    static_tools: Vec<ToolSpec>,
}

impl Orchestrator {
    /// Create an orchestrator using the simulated step runner
    pub fn new(config: &AtelierConfig) -> Self {
        let delay = Duration::from_millis(config.orchestrator.step_delay_ms);
        Self::with_runner(config, Arc::new(SimulatedRunner::new(delay)))
    }

    /// Create an orchestrator that delegates step work to `runner`
    pub fn with_runner(config: &AtelierConfig, runner: Arc<dyn StepRunner>) -> Self {
        Self {
            agents: RwLock::new(AgentRegistry::new()),
            tools: RwLock::new(ToolRegistry::new()),
            workflows: RwLock::new(WorkflowStore::new()),
            initialized: AtomicBool::new(false),
            runner,
            events: EventBus::new(config.orchestrator.event_capacity),
            starter_agents: config.orchestrator.starter_agents.clone(),
            static_tools: config.tools.clone(),
        }
    }

    /// Subscribe to orchestrator events
    pub fn subscribe(&self) -> Receiver<OrchestratorEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: OrchestratorEvent) {
        self.events.emit(event);
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    // ========== Agents ==========

    /// Create the starter agents and static tools
    ///
    /// Idempotent: returns false without changes when already initialized.
    pub fn initialize(&self) -> bool {
        let mut agents = self.agents.write();
        if self.is_initialized() {
            return false;
        }

        tracing::info!("Initializing agent orchestrator");
        let now = now_millis();

        let mut created = Vec::new();
        for template in &self.starter_agents {
            if agents.insert_template(*template, now) {
                if let Some(agent) = agents.get(template.key()) {
                    created.push((agent.id.clone(), agent.name.clone()));
                }
            }
        }

        let mut registered = Vec::new();
        {
            let mut tools = self.tools.write();
            for spec in &self.static_tools {
                let name = spec.name.clone();
                registered.push((tools.register(spec.clone(), now), name));
            }
        }

        let agent_count = agents.len();
        self.initialized.store(true, Ordering::Release);
        drop(agents);

        for (id, name) in created {
            self.emit(OrchestratorEvent::AgentCreated { id, name });
        }
        let tool_count = registered.len();
        for (id, name) in registered {
            self.emit(OrchestratorEvent::ToolRegistered { id, name });
        }
        self.emit(OrchestratorEvent::Initialized {
            agents: agent_count,
            tools: tool_count,
        });

        tracing::info!(
            agents = agent_count,
            tools = tool_count,
            "Agent orchestrator initialized"
        );
        true
    }

    /// Create an ad hoc agent of category `kind`
    pub fn create_agent(&self, kind: AgentKind, overrides: AgentOverrides) -> AgentRecord {
        let agent = self.agents.write().create(kind, overrides, now_millis());
        self.announce_agent(&agent);
        agent
    }

    /// Create an agent from any template under a fresh id
    pub fn create_from_template(&self, template: AgentTemplate) -> AgentRecord {
        let agent = self.agents.write().spawn_template(template, now_millis());
        self.announce_agent(&agent);
        agent
    }

    fn announce_agent(&self, agent: &AgentRecord) {
        tracing::info!(id = %agent.id, kind = %agent.kind, "Created agent {}", agent.name);
        self.emit(OrchestratorEvent::AgentCreated {
            id: agent.id.clone(),
            name: agent.name.clone(),
        });
    }

    /// Set an agent's status and current task; unknown ids are ignored
    pub fn update_agent_status(
        &self,
        agent_id: &str,
        status: AgentStatus,
        current_task: Option<String>,
    ) {
        let updated = self
            .agents
            .write()
            .update_status(agent_id, status, current_task.clone(), now_millis());

        if updated {
            self.emit(OrchestratorEvent::AgentStatusChanged {
                id: agent_id.into(),
                status,
                current_task,
            });
        } else {
            tracing::debug!(agent_id, "status update for unknown agent ignored");
        }
    }

    /// Agents not offline or in error, optionally sharing a required capability
    pub fn available_agents(&self, required_capabilities: &[String]) -> Vec<AgentRecord> {
        self.agents
            .read()
            .available(required_capabilities)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Highest-scoring available agent for `task_type`
    pub fn best_agent_for_task(
        &self,
        task_type: &str,
        requirements: &TaskRequirements,
    ) -> Option<AgentRecord> {
        self.agents
            .read()
            .best_for_task(task_type, requirements)
            .cloned()
    }

    pub fn agent(&self, agent_id: &str) -> Option<AgentRecord> {
        self.agents.read().get(agent_id).cloned()
    }

    pub fn agents(&self) -> Vec<AgentRecord> {
        self.agents.read().iter().cloned().collect()
    }

    /// Mark an agent active on `task` and wrap the task in a one-step workflow
    ///
    /// The workflow is left pending; run it with [`Orchestrator::execute_workflow`].
    pub fn assign_task(&self, agent_id: &str, task: TaskRequest) -> Result<WorkflowId> {
        let input = serde_json::to_value(&task)?;
        let summary = task.summary();
        let task_type = task.type_label();

        let workflow_id = {
            let mut agents = self.agents.write();
            if !agents.contains(agent_id) {
                return Err(AtelierError::agent_not_found(agent_id));
            }

            let steps = vec![StepSpec::new("Execute Task", agent_id).with_input(input)];
            let workflow_id = self.workflows.write().create(
                &format!("Task: {}", task_type),
                &format!("Executing {} task", task_type),
                steps,
            )?;

            agents.update_status(
                agent_id,
                AgentStatus::Active,
                Some(summary.clone()),
                now_millis(),
            );
            workflow_id
        };

        tracing::info!(agent_id, workflow_id = %workflow_id, "Assigned task: {}", summary);
        self.emit(OrchestratorEvent::AgentStatusChanged {
            id: agent_id.into(),
            status: AgentStatus::Active,
            current_task: Some(summary.clone()),
        });
        self.emit(OrchestratorEvent::WorkflowCreated {
            id: workflow_id.clone(),
            name: format!("Task: {}", task_type),
            steps: 1,
        });
        self.emit(OrchestratorEvent::TaskAssigned {
            agent_id: agent_id.into(),
            workflow_id: workflow_id.clone(),
            task: summary,
        });

        Ok(workflow_id)
    }

    // ========== Tools ==========

    pub fn register_tool(&self, spec: ToolSpec) -> ToolId {
        let name = spec.name.clone();
        let id = self.tools.write().register(spec, now_millis());
        tracing::info!(id = %id, "Registered tool {}", name);
        self.emit(OrchestratorEvent::ToolRegistered {
            id: id.clone(),
            name,
        });
        id
    }

    /// Register a placeholder for a tool generated from `description`
    ///
    /// `requirements` is accepted for the generation backend and not stored.
    pub fn create_dynamic_tool(&self, description: &str, requirements: &Value) -> ToolRecord {
        tracing::debug!(%requirements, "creating dynamic tool");
        let tool = self.tools.write().create_dynamic(description, now_millis());
        tracing::info!(id = %tool.id, "Created dynamic tool {}", tool.name);
        self.emit(OrchestratorEvent::ToolRegistered {
            id: tool.id.clone(),
            name: tool.name.clone(),
        });
        tool
    }

    /// Fold a usage outcome into a tool's statistics; unknown ids are ignored
    pub fn evolve_tool(&self, tool_id: &str, outcome: UsageOutcome) {
        let evolved = self
            .tools
            .write()
            .evolve(tool_id, outcome, now_millis())
            .map(|tool| (tool.id.clone(), tool.performance.clone()));

        match evolved {
            Some((id, perf)) => {
                tracing::debug!(
                    id = %id,
                    usage = perf.usage_count,
                    success_rate = perf.success_rate,
                    "Evolved tool"
                );
                self.emit(OrchestratorEvent::ToolEvolved {
                    id,
                    usage_count: perf.usage_count,
                    success_rate: perf.success_rate,
                });
            }
            None => tracing::debug!(tool_id, "evolve for unknown tool ignored"),
        }
    }

    pub fn tool(&self, tool_id: &str) -> Option<ToolRecord> {
        self.tools.read().get(tool_id).cloned()
    }

    pub fn tools(&self) -> Vec<ToolRecord> {
        self.tools.read().iter().cloned().collect()
    }

    // ========== Workflows ==========

    /// Create a pending workflow
    pub fn create_workflow(
        &self,
        name: &str,
        description: &str,
        steps: Vec<StepSpec>,
    ) -> Result<WorkflowId> {
        let step_count = steps.len();
        let id = self.workflows.write().create(name, description, steps)?;

        tracing::info!(id = %id, steps = step_count, "Created workflow {}", name);
        self.emit(OrchestratorEvent::WorkflowCreated {
            id: id.clone(),
            name: name.to_string(),
            steps: step_count,
        });
        Ok(id)
    }

    pub fn workflow(&self, workflow_id: &str) -> Option<Workflow> {
        self.workflows.read().get(workflow_id).cloned()
    }

    pub fn workflows(&self) -> Vec<Workflow> {
        self.workflows.read().iter().cloned().collect()
    }

    /// Run every step of a workflow in declared order
    ///
    /// Per-step failures are recorded on the step and the run carries on. A
    /// runner error aborts the run and leaves the workflow failed; that is
    /// still reported as `Ok` with the failed workflow.
    pub async fn execute_workflow(
        &self,
        workflow_id: &str,
        input: Option<Value>,
    ) -> Result<Workflow> {
        let (id, name, step_count) = {
            let mut workflows = self.workflows.write();
            let workflow = workflows
                .get_mut(workflow_id)
                .ok_or_else(|| AtelierError::workflow_not_found(workflow_id))?;
            if workflow.status == WorkflowStatus::Running {
                return Err(AtelierError::invalid_operation(format!(
                    "Workflow {} is already running",
                    workflow_id
                )));
            }
            workflow.start(now_millis());
            (workflow.id.clone(), workflow.name.clone(), workflow.steps.len())
        };

        tracing::info!(id = %id, "Executing workflow: {}", name);
        self.emit(OrchestratorEvent::WorkflowStarted { id: id.clone() });

        let mut failure = None;
        for index in 0..step_count {
            if let Err(err) = self.run_step(&id, index, input.as_ref()).await {
                failure = Some(err.to_string());
                break;
            }
        }

        let finished = {
            let mut workflows = self.workflows.write();
            let workflow = workflows
                .get_mut(id.as_str())
                .ok_or_else(|| AtelierError::workflow_not_found(id.as_str()))?;
            workflow.finish(now_millis(), failure);
            workflow.clone()
        };

        match &finished.error {
            Some(error) => tracing::warn!(id = %id, %error, "Workflow failed: {}", name),
            None => tracing::info!(id = %id, "Workflow completed: {}", name),
        }
        self.emit(OrchestratorEvent::WorkflowFinished {
            id,
            status: finished.status,
            error: finished.error.clone(),
        });

        Ok(finished)
    }

    /// Drive step `index` to a terminal status
    ///
    /// Returns `Err` only when the runner itself errored.
    async fn run_step(
        &self,
        workflow_id: &WorkflowId,
        index: usize,
        workflow_input: Option<&Value>,
    ) -> Result<()> {
        let (step, unmet) = {
            let workflows = self.workflows.read();
            let workflow = workflows
                .get(workflow_id.as_str())
                .ok_or_else(|| AtelierError::workflow_not_found(workflow_id.as_str()))?;
            let step = workflow.steps.get(index).cloned().ok_or_else(|| {
                AtelierError::invalid_operation(format!(
                    "Workflow {} has no step {}",
                    workflow_id, index
                ))
            })?;
            (step, workflow.unmet_dependency(index))
        };

        let agent = self.agents.read().get(step.agent_id.as_str()).cloned();
        let Some(agent) = agent else {
            tracing::warn!(step = %step.id, agent_id = %step.agent_id, "Step agent not found");
            let error = AtelierError::agent_not_found(step.agent_id.as_str()).to_string();
            self.finish_step(workflow_id, index, StepStatus::Failed, None, Some(error));
            return Ok(());
        };

        if let Some(dependency) = unmet {
            tracing::debug!(step = %step.id, %dependency, "Skipping step with unmet dependency");
            let error = format!("Dependency {} did not complete", dependency);
            // Not an attempt, but the agent still goes back to idle.
            self.agents.write().update_status(
                step.agent_id.as_str(),
                AgentStatus::Idle,
                None,
                now_millis(),
            );
            self.emit_idle(step.agent_id.as_str());
            self.finish_step(workflow_id, index, StepStatus::Skipped, None, Some(error));
            return Ok(());
        }

        self.with_step(workflow_id, index, |workflow| {
            let step = &mut workflow.steps[index];
            step.status = StepStatus::Running;
            step.started_at = Some(now_millis());
        });
        tracing::debug!(step = %step.id, agent = %agent.id, "Running step {}", step.name);

        let request = StepRequest {
            workflow_id: workflow_id.clone(),
            step_id: step.id.clone(),
            step_name: step.name.clone(),
            agent,
            tool_id: step.tool_id.clone(),
            input: step.input.clone(),
            workflow_input: workflow_input.cloned(),
        };

        match self.runner.run(request).await {
            Ok(outcome) => {
                self.record_outcome(step.agent_id.as_str(), step.tool_id.as_ref(), &outcome);
                let status = if outcome.success {
                    StepStatus::Completed
                } else {
                    StepStatus::Failed
                };
                self.finish_step(workflow_id, index, status, Some(outcome.output), outcome.error);
                Ok(())
            }
            Err(err) => {
                self.agents
                    .write()
                    .record_outcome(step.agent_id.as_str(), false, None, now_millis());
                self.emit_idle(step.agent_id.as_str());
                self.finish_step(
                    workflow_id,
                    index,
                    StepStatus::Failed,
                    None,
                    Some(err.to_string()),
                );
                Err(err)
            }
        }
    }

    fn record_outcome(&self, agent_id: &str, tool_id: Option<&ToolId>, outcome: &StepOutcome) {
        self.agents.write().record_outcome(
            agent_id,
            outcome.success,
            Some(outcome.duration),
            now_millis(),
        );
        self.emit_idle(agent_id);

        if let Some(tool_id) = tool_id {
            self.evolve_tool(
                tool_id.as_str(),
                UsageOutcome {
                    success: Some(outcome.success),
                    execution_time: Some(outcome.duration),
                },
            );
        }
    }

    fn emit_idle(&self, agent_id: &str) {
        self.emit(OrchestratorEvent::AgentStatusChanged {
            id: agent_id.into(),
            status: AgentStatus::Idle,
            current_task: None,
        });
    }

    fn finish_step(
        &self,
        workflow_id: &WorkflowId,
        index: usize,
        status: StepStatus,
        output: Option<Value>,
        error: Option<String>,
    ) {
        let finished = self.with_step(workflow_id, index, |workflow| {
            let step = &mut workflow.steps[index];
            step.status = status;
            step.output = output;
            step.error = error;
            step.completed_at = Some(now_millis());
            workflow.refresh_progress();
            (workflow.steps[index].id.clone(), workflow.progress)
        });

        if let Some((step_id, progress)) = finished {
            self.emit(OrchestratorEvent::StepFinished {
                workflow_id: workflow_id.clone(),
                step_id,
                status,
                progress,
            });
        }
    }

    fn with_step<T>(
        &self,
        workflow_id: &WorkflowId,
        index: usize,
        f: impl FnOnce(&mut Workflow) -> T,
    ) -> Option<T> {
        let mut workflows = self.workflows.write();
        let workflow = workflows.get_mut(workflow_id.as_str())?;
        if index >= workflow.steps.len() {
            return None;
        }
        Some(f(workflow))
    }
}
