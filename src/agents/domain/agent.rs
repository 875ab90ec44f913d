//! Agent domain types

use serde::{Deserialize, Serialize};

use crate::agents::config::{AgentConfig, LlmProviderConfig};

/// Agent information returned from list operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentInfo {
    /// Unique agent name
    pub name: String,
    pub role: String,
    pub goal: String,
    /// Tools the agent may call
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<String>,
    /// LLM provider being used
    pub llm_provider: String,
    /// LLM model being used
    pub llm_model: String,
}

impl AgentInfo {
    /// Describe a persona, resolving its LLM against the crew default
    pub fn from_config(config: &AgentConfig, default_llm: &LlmProviderConfig) -> Self {
        let llm = config.llm.as_ref().unwrap_or(default_llm);
        Self {
            name: config.name.clone(),
            role: config.role.clone(),
            goal: config.goal.clone(),
            tools: config.tools.clone(),
            llm_provider: llm.provider.to_string(),
            llm_model: llm.model.clone(),
        }
    }
}
