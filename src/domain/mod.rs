use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod trip;

pub use trip::{TripPlan, TripRequest};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Tool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Tools that agents may call while working on a task.
///
/// Tool output is plain text for the model. Implementations report tool-level
/// problems (bad expression, empty search) inside that text and reserve `Err`
/// for calls that cannot be dispatched at all.
#[async_trait]
pub trait ToolPort: Send + Sync {
    async fn execute_tool(&self, name: &str, args: Value) -> anyhow::Result<String>;
    async fn list_tools(&self) -> anyhow::Result<Vec<Tool>>;
}
