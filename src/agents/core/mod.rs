//! Agent implementations
//!
//! An [`Agent`] turns a [`Task`] plus the outputs of earlier tasks into a
//! [`TaskOutput`]. The only implementation is [`ReActAgent`], which alternates
//! between model calls and tool calls until the model answers in plain text.

mod react;

pub use react::ReActAgent;

use std::sync::Arc;

use async_trait::async_trait;

use crate::agents::config::AgentConfig;
use crate::agents::domain::TaskOutput;
use crate::agents::error::AgentResult;
use crate::agents::llm::LlmProvider;
use crate::agents::task::Task;
use crate::domain::ToolPort;

/// Core agent trait
#[async_trait]
pub trait Agent: Send + Sync {
    /// Get the agent configuration
    fn config(&self) -> &AgentConfig;

    /// Get the agent name
    fn name(&self) -> &str {
        &self.config().name
    }

    /// Work on a task, reading the outputs of the tasks it depends on
    async fn execute_task(&self, task: &Task, context: &[TaskOutput]) -> AgentResult<TaskOutput>;
}

/// Build the persona prompt sent as the system message
pub fn render_system_prompt(config: &AgentConfig) -> String {
    let mut prompt = format!("You are {}. {}", config.role.trim(), config.backstory.trim());
    prompt.push_str("\nYour personal goal is: ");
    prompt.push_str(config.goal.trim());
    prompt
}

/// Build the user message for a task.
///
/// Outputs of earlier tasks are appended under a context section, each one
/// separated by a divider line.
pub fn render_task_prompt(task: &Task, context: &[TaskOutput]) -> String {
    let mut prompt = format!("Current Task: {}", task.description.trim());

    prompt.push_str("\n\nThis is the expected criteria for your final answer: ");
    prompt.push_str(task.expected_output.trim());
    prompt.push_str(
        "\nYou MUST return the actual complete content as the final answer, not a summary.",
    );

    let shared: Vec<&str> = context
        .iter()
        .filter(|output| task.reads(&output.task))
        .map(|output| output.raw.trim())
        .filter(|raw| !raw.is_empty())
        .collect();

    if !shared.is_empty() {
        prompt.push_str("\n\nThis is the context you're working with:\n");
        prompt.push_str(&shared.join("\n\n----------\n\n"));
    }

    prompt.push_str("\n\nBegin! This is VERY important to you, use the tools available and give your best Final Answer, your job depends on it!");
    prompt
}

/// Create an agent from configuration
pub fn create_agent(
    config: AgentConfig,
    llm: Arc<dyn LlmProvider>,
    tool_handler: Arc<dyn ToolPort>,
) -> Arc<dyn Agent> {
    Arc::new(ReActAgent::new(config, llm, tool_handler))
}
