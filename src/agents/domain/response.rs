//! Task and crew output types

use serde::{Deserialize, Serialize};

use super::ToolCallResult;

/// Token usage information
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens used in the prompt/input
    pub prompt_tokens: u32,
    /// Tokens generated in the response
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn add(&mut self, other: &TokenUsage) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
        self.total_tokens += other.total_tokens;
    }
}

/// Result of one task executed by one agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOutput {
    /// Task name
    pub task: String,
    /// Agent that produced the output
    pub agent: String,
    /// Final text answer
    pub raw: String,
    /// Tool calls made while working on the task
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallResult>,
    /// Number of LLM round-trips
    pub iterations: u32,
    #[serde(default)]
    pub usage: TokenUsage,
    pub execution_time_ms: u64,
}

/// Result of a full crew kickoff
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewOutput {
    /// Output of the last task
    pub raw: String,
    /// Per-task outputs in execution order
    pub tasks_output: Vec<TaskOutput>,
    #[serde(default)]
    pub usage: TokenUsage,
    pub execution_time_ms: u64,
}

impl CrewOutput {
    /// Number of characters in the final output
    pub fn len(&self) -> usize {
        self.raw.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}
