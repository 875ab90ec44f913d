use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

pub mod validator;

use crate::agents::config::{AgentConfig, LlmProviderConfig};
use crate::cli::Cli;

/// Note appended when the crew never produced a long enough itinerary
pub const DEFAULT_FALLBACK_NOTE: &str = "Additional insights and data are currently being gathered. Please check back later or contact support for more details.";

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    /// Default LLM used by every persona without its own override
    #[serde(default)]
    pub llm: LlmProviderConfig,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub crew: CrewSettings,
    /// Persona overrides, matched by name against the built-in travel agents
    #[serde(default)]
    pub agents: Vec<AgentConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SearchSettings {
    /// Serper search endpoint
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,
    /// Environment variable holding the Serper API key
    #[serde(default = "default_search_key_env")]
    pub api_key_env: String,
    /// How many organic results are handed to the model
    #[serde(default = "default_top_results")]
    pub top_results: usize,
    #[serde(default = "default_search_timeout")]
    pub timeout_seconds: u64,
}

fn default_search_endpoint() -> String {
    "https://google.serper.dev/search".to_string()
}

fn default_search_key_env() -> String {
    "SERPER_API_KEY".to_string()
}

fn default_top_results() -> usize {
    4
}

fn default_search_timeout() -> u64 {
    30
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: default_search_endpoint(),
            api_key_env: default_search_key_env(),
            top_results: default_top_results(),
            timeout_seconds: default_search_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CrewSettings {
    /// Results shorter than this (in characters) trigger another kickoff
    #[serde(default = "default_min_result_chars")]
    pub min_result_chars: usize,
    /// Upper bound on kickoffs per request, first run included
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Add the report-structuring task after the three research tasks
    #[serde(default)]
    pub structure_report: bool,
    /// Reasoning/tool iterations allowed per task
    #[serde(default = "crate::agents::config::default_max_iterations")]
    pub max_iterations: u32,
    #[serde(default = "default_fallback_note")]
    pub fallback_note: String,
}

fn default_min_result_chars() -> usize {
    1500
}

fn default_max_attempts() -> u32 {
    5
}

fn default_fallback_note() -> String {
    DEFAULT_FALLBACK_NOTE.to_string()
}

impl Default for CrewSettings {
    fn default() -> Self {
        Self {
            min_result_chars: default_min_result_chars(),
            max_attempts: default_max_attempts(),
            structure_report: false,
            max_iterations: crate::agents::config::default_max_iterations(),
            fallback_note: default_fallback_note(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, anyhow::Error> {
        Self::from_root(".")
    }

    /// Create settings from CLI arguments (config file, environment, then CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let root = cli
            .config
            .parent()
            .and_then(|p| p.to_str())
            .filter(|p| !p.is_empty())
            .unwrap_or(".");

        let mut settings = Self::load(File::from(cli.config.clone()).required(false), root)?;

        // CLI > env vars > config file
        settings.apply_cli_overrides(cli);

        Self::validate(&settings)?;
        Ok(settings)
    }

    pub fn from_root(root: &str) -> Result<Self, anyhow::Error> {
        let config_path = std::path::Path::new(root).join("trip_planner");
        let settings = Self::load(File::from(config_path).required(false), root)?;
        Self::validate(&settings)?;
        Ok(settings)
    }

    fn load<S>(file: S, root: &str) -> Result<Self, anyhow::Error>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let s = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("TRIP_PLANNER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut settings: Settings = s.try_deserialize()?;
        settings.load_agents_from_dir(&format!("{}/config/agents", root))?;
        Ok(settings)
    }

    fn validate(settings: &Settings) -> Result<(), anyhow::Error> {
        validator::ConfigValidator::validate(settings).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })
    }

    /// Apply CLI argument overrides to settings
    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(model) = &cli.model {
            self.llm.model = model.clone();
        }
    }

    fn load_agents_from_dir(&mut self, path: &str) -> Result<(), anyhow::Error> {
        let pattern = format!("{}/*", path);
        for entry in glob::glob(&pattern)? {
            match entry {
                Ok(path) => {
                    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                        if matches!(ext, "json" | "yaml" | "yml" | "toml") {
                            let content = std::fs::read_to_string(&path)?;
                            let agent: AgentConfig = match ext {
                                "json" => serde_json::from_str(&content)?,
                                "toml" => toml::from_str(&content)?,
                                _ => serde_yaml::from_str(&content)?,
                            };
                            tracing::debug!(agent = %agent.name, file = %path.display(), "Loaded agent override");
                            self.agents.push(agent);
                        }
                    }
                }
                Err(e) => tracing::warn!("Failed to read glob entry: {}", e),
            }
        }
        Ok(())
    }
}
