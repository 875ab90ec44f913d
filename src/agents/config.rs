//! Configuration types for agent personas and LLM providers

use serde::{Deserialize, Serialize};

/// Configuration for an agent persona
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AgentConfig {
    /// Unique agent name (used by tasks to reference the agent)
    pub name: String,
    /// Role the agent plays, e.g. "Local Tour Guide"
    pub role: String,
    /// What the agent is trying to achieve
    pub goal: String,
    /// Background story that shapes the agent's voice
    pub backstory: String,
    /// Tools the agent may call (tool names from the tool registry)
    #[serde(default)]
    pub tools: Vec<String>,
    /// LLM override for this agent (falls back to the crew default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm: Option<LlmProviderConfig>,
    /// Maximum reasoning/tool iterations per task
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    /// Temperature override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

pub(crate) fn default_max_iterations() -> u32 {
    10
}

impl AgentConfig {
    /// Create a persona with the default iteration budget and no tools
    pub fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            tools: Vec::new(),
            llm: None,
            max_iterations: default_max_iterations(),
            temperature: None,
        }
    }

    /// Grant the persona access to the named tools
    pub fn with_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tools = tools.into_iter().map(Into::into).collect();
        self
    }

    /// Set the iteration budget
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmProviderConfig {
    /// Provider type
    #[serde(default)]
    pub provider: LlmProviderType,
    /// Model name/identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable containing the API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    /// Custom base URL (for self-hosted or proxied endpoints)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Default temperature for completions
    #[serde(default = "default_temperature", skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Default max tokens for completions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_temperature() -> Option<f32> {
    Some(0.7)
}

fn default_timeout() -> u64 {
    120
}

impl Default for LlmProviderConfig {
    fn default() -> Self {
        Self {
            provider: LlmProviderType::default(),
            model: default_model(),
            api_key_env: None,
            base_url: None,
            temperature: default_temperature(),
            max_tokens: None,
            timeout_seconds: default_timeout(),
        }
    }
}

/// Supported LLM providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderType {
    /// OpenAI or any OpenAI-compatible chat completions endpoint
    #[default]
    #[serde(alias = "openai_compatible")]
    OpenAI,
}

impl std::fmt::Display for LlmProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProviderType::OpenAI => write!(f, "openai"),
        }
    }
}
