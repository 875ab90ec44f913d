use crate::adapters::calculator::CalculatorTool;
use crate::adapters::search::SerperSearchTool;
use crate::config::SearchSettings;
use crate::domain::{Tool, ToolPort};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// A tool implemented in-process
#[async_trait]
pub trait BuiltinTool: Send + Sync {
    fn tool(&self) -> Tool;
    async fn call(&self, args: &Value) -> String;
}

pub struct BuiltinToolHandler {
    tools: HashMap<String, Arc<dyn BuiltinTool>>,
}

impl BuiltinToolHandler {
    pub fn new(tools: Vec<Arc<dyn BuiltinTool>>) -> Self {
        let tools = tools
            .into_iter()
            .map(|tool| (tool.tool().name, tool))
            .collect();
        Self { tools }
    }

    /// Register the search and calculator tools
    pub fn from_settings(search: &SearchSettings) -> anyhow::Result<Self> {
        Ok(Self::new(vec![
            Arc::new(SerperSearchTool::new(search)?),
            Arc::new(CalculatorTool::new()),
        ]))
    }
}

#[async_trait]
impl ToolPort for BuiltinToolHandler {
    async fn execute_tool(&self, name: &str, args: Value) -> anyhow::Result<String> {
        match self.tools.get(name) {
            Some(tool) => Ok(tool.call(&args).await),
            None => Err(anyhow::anyhow!("Tool not found: {}", name)),
        }
    }

    async fn list_tools(&self) -> anyhow::Result<Vec<Tool>> {
        let mut tools: Vec<Tool> = self.tools.values().map(|t| t.tool()).collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tools)
    }
}
