//! Tool call types for agent interactions

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tool call requested by the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Identifier echoed back in the tool result message
    pub id: String,
    /// Name of the tool being called
    pub name: String,
    /// Arguments passed to the tool (as JSON)
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    /// Generate an ID for providers that omit one
    pub fn generate_id() -> String {
        let id = uuid::Uuid::new_v4().simple().to_string();
        format!("call_{}", &id[..24])
    }
}

/// Outcome of executing a tool on behalf of an agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallResult {
    pub tool_call_id: String,
    pub tool_name: String,
    pub input: Value,
    /// Text handed back to the model
    pub output: String,
    pub execution_time_ms: u64,
    pub success: bool,
}

impl ToolCallResult {
    pub fn success(call: &ToolCall, output: String, execution_time_ms: u64) -> Self {
        Self {
            tool_call_id: call.id.clone(),
            tool_name: call.name.clone(),
            input: call.arguments.clone(),
            output,
            execution_time_ms,
            success: true,
        }
    }

    /// Failed calls still produce text so the model can recover
    pub fn failure(call: &ToolCall, error: impl std::fmt::Display, execution_time_ms: u64) -> Self {
        Self {
            tool_call_id: call.id.clone(),
            tool_name: call.name.clone(),
            input: call.arguments.clone(),
            output: format!("Error: {}", error),
            execution_time_ms,
            success: false,
        }
    }
}

/// Definition of a tool offered to the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema for the tool's parameters
    pub parameters: Value,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}
