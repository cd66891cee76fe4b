//! Tool registry
//!
//! Owns every tool record. `evolve` is the only writer of a tool's performance.

use super::performance::{blend_average, reconstruct_success_rate};
use super::types::{ToolId, ToolKind, ToolRecord, ToolSpec, UsageOutcome};
use std::collections::HashMap;

/// Registry of static and dynamically created tools
pub struct ToolRegistry {
    tools: HashMap<ToolId, ToolRecord>,
    order: Vec<ToolId>,
    next_id: u64,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
            next_id: 1,
        }
    }

    /// Register a tool and return its new id
    pub fn register(&mut self, spec: ToolSpec, now: i64) -> ToolId {
        let id = ToolId::new(format!("tool-{}", self.next_id));
        self.next_id += 1;

        let record = ToolRecord::from_spec(id.clone(), spec, now);
        self.tools.insert(id.clone(), record);
        self.order.push(id.clone());
        id
    }

    /// Register a placeholder tool standing in for a generated one
    ///
    /// The generation service that would derive parameters from the
    /// requirements lives outside the core, so the record carries none.
    pub fn create_dynamic(&mut self, description: &str, now: i64) -> ToolRecord {
        let spec = ToolSpec {
            name: format!("Dynamic Tool: {}", description),
            description: description.to_string(),
            kind: ToolKind::Dynamic,
            category: "generated".to_string(),
            is_custom: true,
            is_dynamic: true,
            parameters: Vec::new(),
            created_by: Some("system".to_string()),
        };
        let id = self.register(spec, now);
        // register just inserted it
        self.tools[&id].clone()
    }

    /// Fold one usage outcome into the tool's statistics
    ///
    /// Returns None (and changes nothing) if the tool is unknown.
    pub fn evolve(&mut self, id: &str, outcome: UsageOutcome, now: i64) -> Option<&ToolRecord> {
        let tool = self.tools.get_mut(id)?;
        let perf = &mut tool.performance;

        perf.usage_count += 1;
        perf.last_used = now;

        if let Some(ms) = outcome.execution_time {
            perf.average_execution_time = blend_average(perf.average_execution_time, ms);
        }

        if let Some(success) = outcome.success {
            perf.success_rate =
                reconstruct_success_rate(perf.success_rate, perf.usage_count, success);
        }

        Some(tool)
    }

    pub fn get(&self, id: &str) -> Option<&ToolRecord> {
        self.tools.get(id)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// All tools in registration order
    pub fn iter(&self) -> impl Iterator<Item = &ToolRecord> {
        self.order.iter().filter_map(|id| self.tools.get(id))
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}
