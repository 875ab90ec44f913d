//! Sequential orchestration pattern

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use crate::agents::core::Agent;
use crate::agents::domain::{CrewOutput, TaskOutput, TokenUsage};
use crate::agents::error::{AgentError, AgentResult};
use crate::agents::task::Task;

/// A crew runs its tasks one after another.
///
/// Every task sees the outputs of the tasks before it (or the subset named in
/// [`Task::context`]). The crew's final output is the output of the last task.
pub struct Crew {
    agents: HashMap<String, Arc<dyn Agent>>,
    tasks: Vec<Task>,
}

impl Crew {
    /// Assemble a crew, checking that every task can actually run
    pub fn new(agents: Vec<Arc<dyn Agent>>, tasks: Vec<Task>) -> AgentResult<Self> {
        if tasks.is_empty() {
            return Err(AgentError::Task("A crew needs at least one task".to_string()));
        }

        let agents: HashMap<String, Arc<dyn Agent>> = agents
            .into_iter()
            .map(|agent| (agent.name().to_string(), agent))
            .collect();

        let mut earlier = HashSet::new();
        for task in &tasks {
            if !agents.contains_key(&task.agent) {
                return Err(AgentError::NotFound(format!(
                    "{} (assigned to task '{}')",
                    task.agent, task.name
                )));
            }

            if let Some(names) = &task.context {
                if let Some(missing) = names.iter().find(|n| !earlier.contains(n.as_str())) {
                    return Err(AgentError::Task(format!(
                        "Task '{}' reads '{}', which does not run before it",
                        task.name, missing
                    )));
                }
            }

            if !earlier.insert(task.name.as_str()) {
                return Err(AgentError::Task(format!("Duplicate task name '{}'", task.name)));
            }
        }

        Ok(Self { agents, tasks })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Run every task in order. The first failing task aborts the kickoff.
    pub async fn kickoff(&self) -> AgentResult<CrewOutput> {
        let start_time = Instant::now();
        let mut outputs: Vec<TaskOutput> = Vec::with_capacity(self.tasks.len());
        let mut usage = TokenUsage::default();

        for task in &self.tasks {
            let agent = self
                .agents
                .get(&task.agent)
                .ok_or_else(|| AgentError::NotFound(task.agent.clone()))?;

            tracing::info!(task = %task.name, agent = %task.agent, "Starting task");

            let output = agent.execute_task(task, &outputs).await.map_err(|e| {
                tracing::error!(task = %task.name, agent = %task.agent, "Task failed: {}", e);
                e
            })?;

            usage.add(&output.usage);
            outputs.push(output);
        }

        let raw = outputs.last().map(|o| o.raw.clone()).unwrap_or_default();

        Ok(CrewOutput {
            raw,
            tasks_output: outputs,
            usage,
            execution_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }
}
