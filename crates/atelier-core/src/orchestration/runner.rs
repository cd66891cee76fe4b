//! Step runners
//!
//! A [`StepRunner`] performs the unit of work behind one workflow step. The
//! orchestrator only records what the runner reports; real model invocation
//! belongs to whichever runner the host plugs in.

use super::types::{AgentRecord, ToolId, WorkflowId};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

/// Everything a runner needs to perform one step
#[derive(Debug, Clone)]
pub struct StepRequest {
    pub workflow_id: WorkflowId,
    pub step_id: String,
    pub step_name: String,
    /// Snapshot of the agent taken when the step started
    pub agent: AgentRecord,
    pub tool_id: Option<ToolId>,
    pub input: Value,
    /// Input handed to `execute_workflow`, if any
    pub workflow_input: Option<Value>,
}

/// What a runner reports for a finished step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub success: bool,
    pub output: Value,
    pub error: Option<String>,
    /// Wall time in milliseconds
    pub duration: f64,
}

impl StepOutcome {
    pub fn succeeded(output: Value, duration: f64) -> Self {
        Self {
            success: true,
            output,
            error: None,
            duration,
        }
    }

    pub fn failed(error: impl Into<String>, duration: f64) -> Self {
        Self {
            success: false,
            output: Value::Null,
            error: Some(error.into()),
            duration,
        }
    }
}

/// Performs the work of a workflow step
///
/// `Ok` with `success == false` is a recorded step failure and the workflow
/// carries on. `Err` aborts the workflow.
#[async_trait]
pub trait StepRunner: Send + Sync {
    async fn run(&self, request: StepRequest) -> Result<StepOutcome>;
}

/// Runner that waits a fixed delay and reports success
///
/// The reported duration is the configured delay, not the measured wall time.
#[derive(Debug, Clone)]
pub struct SimulatedRunner {
    delay: Duration,
}

impl SimulatedRunner {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedRunner {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000))
    }
}

#[async_trait]
impl StepRunner for SimulatedRunner {
    async fn run(&self, request: StepRequest) -> Result<StepOutcome> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let output = json!({
            "success": true,
            "result": format!("Task completed by {}", request.agent.name),
        });
        Ok(StepOutcome::succeeded(
            output,
            self.delay.as_secs_f64() * 1000.0,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestration::AgentTemplate;
    use pretty_assertions::assert_eq;

    fn request() -> StepRequest {
        StepRequest {
            workflow_id: WorkflowId::from("workflow-1"),
            step_id: "step-0".to_string(),
            step_name: "Execute Task".to_string(),
            agent: AgentTemplate::NextjsDeveloper.instantiate("nextjs-developer".into(), 0),
            tool_id: None,
            input: Value::Null,
            workflow_input: None,
        }
    }

    #[tokio::test]
    async fn test_simulated_runner_payload() {
        let runner = SimulatedRunner::new(Duration::ZERO);
        let outcome = runner.run(request()).await.unwrap();

        assert!(outcome.success);
        assert_eq!(
            outcome.output,
            json!({"success": true, "result": "Task completed by Next.js Developer"})
        );
        assert_eq!(outcome.error, None);
    }

    #[tokio::test]
    async fn test_simulated_runner_waits() {
        let runner = SimulatedRunner::new(Duration::from_millis(20));
        let outcome = runner.run(request()).await.unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.duration, 20.0);
    }

    #[test]
    fn test_failed_outcome() {
        let outcome = StepOutcome::failed("lint errors", 12.0);
        assert!(!outcome.success);
        assert_eq!(outcome.output, Value::Null);
        assert_eq!(outcome.error.as_deref(), Some("lint errors"));
    }
}
