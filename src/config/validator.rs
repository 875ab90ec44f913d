use std::collections::HashMap;
use thiserror::Error;

use crate::adapters::{calculator, search};
use crate::agents::config::{AgentConfig, LlmProviderConfig};
use crate::config::{CrewSettings, SearchSettings, Settings};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Cross-reference error: {0}")]
    CrossReference(String),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        Self::validate_server(&settings.server, &mut errors);
        Self::validate_llm("llm", &settings.llm, &mut errors);
        Self::validate_search(&settings.search, &mut errors);
        Self::validate_crew(&settings.crew, &mut errors);
        Self::validate_agents(&settings.agents, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_server(server: &crate::config::ServerSettings, errors: &mut Vec<ValidationError>) {
        if server.host.is_empty() {
            errors.push(ValidationError::MissingField("server.host".to_string()));
        }

        if server.port == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }
    }

    fn validate_llm(prefix: &str, llm: &LlmProviderConfig, errors: &mut Vec<ValidationError>) {
        if llm.model.trim().is_empty() {
            errors.push(ValidationError::MissingField(format!("{}.model", prefix)));
        }

        if let Some(temperature) = llm.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                errors.push(ValidationError::InvalidValue {
                    field: format!("{}.temperature", prefix),
                    reason: "Temperature must be between 0.0 and 2.0".to_string(),
                });
            }
        }

        if llm.timeout_seconds == 0 {
            errors.push(ValidationError::InvalidValue {
                field: format!("{}.timeout_seconds", prefix),
                reason: "Timeout must be greater than 0".to_string(),
            });
        }
    }

    fn validate_search(search: &SearchSettings, errors: &mut Vec<ValidationError>) {
        if !(search.endpoint.starts_with("http://") || search.endpoint.starts_with("https://")) {
            errors.push(ValidationError::InvalidValue {
                field: "search.endpoint".to_string(),
                reason: "Endpoint must be an http(s) URL".to_string(),
            });
        }

        if search.api_key_env.is_empty() {
            errors.push(ValidationError::MissingField("search.api_key_env".to_string()));
        }

        if search.top_results == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "search.top_results".to_string(),
                reason: "At least one result must be returned".to_string(),
            });
        }
    }

    fn validate_crew(crew: &CrewSettings, errors: &mut Vec<ValidationError>) {
        if crew.max_attempts == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "crew.max_attempts".to_string(),
                reason: "The crew must run at least once".to_string(),
            });
        }

        if crew.max_iterations == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "crew.max_iterations".to_string(),
                reason: "Agents need at least one iteration".to_string(),
            });
        }
    }

    fn validate_agents(agents: &[AgentConfig], errors: &mut Vec<ValidationError>) {
        let known_tools = [calculator::TOOL_NAME, search::TOOL_NAME];
        let mut seen_names = HashMap::new();

        for (idx, agent) in agents.iter().enumerate() {
            if let Some(prev_idx) = seen_names.insert(&agent.name, idx) {
                errors.push(ValidationError::Duplicate(format!(
                    "Agent '{}' appears at indices {} and {}",
                    agent.name, prev_idx, idx
                )));
            }

            if agent.name.is_empty() {
                errors.push(ValidationError::MissingField(format!("agents[{}].name", idx)));
            }

            if agent.role.trim().is_empty() {
                errors.push(ValidationError::MissingField(format!("agents[{}].role", idx)));
            }

            for tool in &agent.tools {
                if !known_tools.contains(&tool.as_str()) {
                    errors.push(ValidationError::CrossReference(format!(
                        "Agent '{}' references unknown tool '{}'",
                        agent.name, tool
                    )));
                }
            }

            if let Some(llm) = &agent.llm {
                Self::validate_llm(&format!("agents[{}].llm", idx), llm, errors);
            }
        }
    }
}
