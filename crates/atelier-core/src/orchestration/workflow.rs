//! Workflow store
//!
//! Holds workflows by id and validates their step graph on creation. Execution
//! itself is driven by the orchestrator, which owns the agents as well.

use super::types::{
    step_id, StepSpec, StepStatus, Workflow, WorkflowId, WorkflowStatus, WorkflowStep,
};
use crate::error::{AtelierError, Result};
use std::collections::HashMap;

/// Storage for all workflows
pub struct WorkflowStore {
    workflows: HashMap<WorkflowId, Workflow>,
    order: Vec<WorkflowId>,
    next_id: u64,
}

impl WorkflowStore {
    pub fn new() -> Self {
        Self {
            workflows: HashMap::new(),
            order: Vec::new(),
            next_id: 1,
        }
    }

    /// Create a pending workflow from ordered step specs
    ///
    /// Each dependency must name an earlier step of the same workflow.
    pub fn create(
        &mut self,
        name: &str,
        description: &str,
        steps: Vec<StepSpec>,
    ) -> Result<WorkflowId> {
        validate_dependencies(&steps)?;

        let id = WorkflowId::new(format!("workflow-{}", self.next_id));
        self.next_id += 1;

        let workflow = Workflow {
            id: id.clone(),
            name: name.to_string(),
            description: description.to_string(),
            steps: steps
                .into_iter()
                .enumerate()
                .map(|(index, spec)| WorkflowStep::from_spec(index, spec))
                .collect(),
            status: WorkflowStatus::Pending,
            progress: 0,
            started_at: None,
            completed_at: None,
            error: None,
        };

        self.workflows.insert(id.clone(), workflow);
        self.order.push(id.clone());
        Ok(id)
    }

    pub fn get(&self, id: &str) -> Option<&Workflow> {
        self.workflows.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Workflow> {
        self.workflows.get_mut(id)
    }

    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }

    /// All workflows in creation order
    pub fn iter(&self) -> impl Iterator<Item = &Workflow> {
        self.order.iter().filter_map(|id| self.workflows.get(id))
    }
}

impl Default for WorkflowStore {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_dependencies(steps: &[StepSpec]) -> Result<()> {
    for (index, spec) in steps.iter().enumerate() {
        for dependency in &spec.dependencies {
            let earlier = (0..index).any(|i| step_id(i) == *dependency);
            if !earlier {
                return Err(AtelierError::invalid_operation(format!(
                    "Step {} ({}) depends on {}, which is not an earlier step",
                    step_id(index),
                    spec.name,
                    dependency
                )));
            }
        }
    }
    Ok(())
}

impl Workflow {
    /// Reset every step and mark the workflow running
    pub(crate) fn start(&mut self, now: i64) {
        self.status = WorkflowStatus::Running;
        self.started_at = Some(now);
        self.completed_at = None;
        self.error = None;
        self.progress = 0;
        for step in &mut self.steps {
            step.status = StepStatus::Waiting;
            step.output = None;
            step.error = None;
            step.started_at = None;
            step.completed_at = None;
        }
    }

    /// Record the end of the run; `failure` is the message of an aborting error
    pub(crate) fn finish(&mut self, now: i64, failure: Option<String>) {
        match failure {
            Some(message) => {
                self.status = WorkflowStatus::Failed;
                self.error = Some(message);
                self.refresh_progress();
            }
            None => {
                self.status = WorkflowStatus::Completed;
                self.progress = 100;
                self.completed_at = Some(now);
            }
        }
    }

    /// First declared dependency of step `index` that has not completed
    pub(crate) fn unmet_dependency(&self, index: usize) -> Option<String> {
        let step = self.steps.get(index)?;
        step.dependencies
            .iter()
            .find(|dep| {
                self.step(dep)
                    .map(|s| s.status != StepStatus::Completed)
                    .unwrap_or(true)
            })
            .cloned()
    }
}
