//! Agent registry
//!
//! Tracks every agent the orchestrator knows about, its status and its running
//! performance. Iteration follows insertion order.

use super::performance::{blend_average, reconstruct_success_rate};
use super::templates::AgentTemplate;
use super::types::{
    AgentId, AgentKind, AgentOverrides, AgentPerformance, AgentRecord, AgentStatus,
    TaskRequirements,
};
use crate::router::select_model_for_agent_type;
use std::collections::HashMap;

/// Manages the lifecycle of all agents
pub struct AgentRegistry {
    /// All agents indexed by ID
    agents: HashMap<AgentId, AgentRecord>,

    /// Insertion order
    order: Vec<AgentId>,

    /// Counter for generating unique IDs
    next_id: u64,
}

impl AgentRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            agents: HashMap::new(),
            order: Vec::new(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self, prefix: &str) -> AgentId {
        loop {
            let id = AgentId::new(format!("{}-{}", prefix, self.next_id));
            self.next_id += 1;
            if !self.agents.contains_key(&id) {
                return id;
            }
        }
    }

    fn insert(&mut self, agent: AgentRecord) {
        if self.agents.insert(agent.id.clone(), agent.clone()).is_none() {
            self.order.push(agent.id);
        }
    }

    /// Insert the agent for `template` under the template key, unless present
    ///
    /// Returns false if an agent with that id already existed.
    pub fn insert_template(&mut self, template: AgentTemplate, now: i64) -> bool {
        let id = AgentId::from(template.key());
        if self.agents.contains_key(&id) {
            return false;
        }
        self.insert(template.instantiate(id, now));
        true
    }

    /// Create an ad hoc agent of `template` under a fresh `{key}-{n}` id
    pub fn spawn_template(&mut self, template: AgentTemplate, now: i64) -> AgentRecord {
        let id = self.allocate_id(template.key());
        let agent = template.instantiate(id, now);
        self.insert(agent.clone());
        agent
    }

    /// Create an ad hoc agent of category `kind`
    pub fn create(&mut self, kind: AgentKind, overrides: AgentOverrides, now: i64) -> AgentRecord {
        let id = self.allocate_id(kind.as_str());
        let model = overrides
            .model
            .unwrap_or_else(|| select_model_for_agent_type(kind.as_str()));

        let agent = AgentRecord {
            id,
            name: overrides.name.unwrap_or_else(|| format!("{} Agent", kind)),
            kind,
            description: overrides
                .description
                .unwrap_or_else(|| format!("Specialized {} agent", kind)),
            capabilities: overrides.capabilities.unwrap_or_default(),
            status: AgentStatus::Idle,
            current_task: None,
            performance: AgentPerformance::fresh(now),
            tools: overrides.tools.unwrap_or_default(),
            model: Some(model),
        };

        self.insert(agent.clone());
        agent
    }

    /// Get an agent by ID
    pub fn get(&self, id: &str) -> Option<&AgentRecord> {
        self.agents.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.agents.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// All agents in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &AgentRecord> {
        self.order.iter().filter_map(|id| self.agents.get(id))
    }

    /// Set status and current task, refreshing `last_active`
    ///
    /// Returns false (and changes nothing) if the agent is unknown.
    pub fn update_status(
        &mut self,
        id: &str,
        status: AgentStatus,
        current_task: Option<String>,
        now: i64,
    ) -> bool {
        let Some(agent) = self.agents.get_mut(id) else {
            return false;
        };
        agent.status = status;
        agent.current_task = current_task;
        agent.performance.last_active = now;
        true
    }

    /// Record a finished step and hand the agent back as idle
    ///
    /// `response_time` (ms) is blended into the average when present.
    pub fn record_outcome(&mut self, id: &str, success: bool, response_time: Option<f64>, now: i64) {
        let Some(agent) = self.agents.get_mut(id) else {
            return;
        };
        let perf = &mut agent.performance;
        if success {
            perf.tasks_completed += 1;
        } else {
            perf.tasks_failed += 1;
        }
        perf.success_rate = reconstruct_success_rate(perf.success_rate, perf.attempts(), success);
        if let Some(ms) = response_time {
            perf.average_response_time = blend_average(perf.average_response_time, ms);
        }
        perf.last_active = now;
        agent.status = AgentStatus::Idle;
        agent.current_task = None;
    }

    /// Agents that may take work, optionally sharing one of `required`
    pub fn available(&self, required: &[String]) -> Vec<&AgentRecord> {
        self.iter()
            .filter(|agent| agent.status.is_available())
            .filter(|agent| required.is_empty() || agent.matches_any(required))
            .collect()
    }

    /// Highest-scoring available agent for `task_type`; ties go to the earliest
    pub fn best_for_task(
        &self,
        task_type: &str,
        requirements: &TaskRequirements,
    ) -> Option<&AgentRecord> {
        let mut best: Option<(&AgentRecord, f64)> = None;
        for agent in self.available(&requirements.capabilities) {
            let score = score(agent, task_type);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((agent, score)),
            }
        }
        best.map(|(agent, _)| agent)
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Suitability score of `agent` for `task_type`
///
/// +50 for an exact capability match, 0.3 per success-rate point, up to 50 for
/// speed (5 per second under a 10 s average, never negative), +20 when idle.
pub fn score(agent: &AgentRecord, task_type: &str) -> f64 {
    let perf = &agent.performance;
    let mut score = 0.0;

    if agent.has_capability(task_type) {
        score += 50.0;
    }

    score += perf.success_rate * 0.3;
    score += (10.0 - perf.average_response_time / 1000.0).max(0.0) * 5.0;

    if agent.status == AgentStatus::Idle {
        score += 20.0;
    }

    score
}
