//! Trip planning crew
//!
//! [`CrewRuntime`] owns everything that outlives a request (LLM clients, the
//! tool registry, crew settings). [`TripCrew`] wires the travel personas and
//! tasks for one request and retries the whole crew until the itinerary is
//! long enough.

pub mod agents;
pub mod tasks;

pub use agents::TravelAgents;
pub use tasks::TravelTasks;

use std::collections::HashMap;
use std::sync::Arc;

use crate::agents::config::LlmProviderConfig;
use crate::agents::core::{create_agent, Agent};
use crate::agents::domain::AgentInfo;
use crate::agents::error::AgentResult;
use crate::agents::llm::{create_provider, LlmProvider};
use crate::agents::orchestration::Crew;
use crate::config::{CrewSettings, Settings};
use crate::domain::{ToolPort, TripRequest};

/// Shared dependencies of every trip crew
pub struct CrewRuntime {
    llm: Arc<dyn LlmProvider>,
    llm_config: LlmProviderConfig,
    agent_llms: HashMap<String, Arc<dyn LlmProvider>>,
    tools: Arc<dyn ToolPort>,
    personas: TravelAgents,
    settings: CrewSettings,
}

impl CrewRuntime {
    /// Build the runtime, creating a dedicated client for every persona that
    /// overrides the default LLM.
    pub fn new(
        settings: &Settings,
        llm: Arc<dyn LlmProvider>,
        tools: Arc<dyn ToolPort>,
    ) -> AgentResult<Self> {
        let personas = TravelAgents::new(&settings.agents, settings.crew.max_iterations);

        let mut agent_llms = HashMap::new();
        for persona in personas.all() {
            if let Some(llm_config) = &persona.llm {
                tracing::info!(agent = %persona.name, model = %llm_config.model, "Using dedicated LLM");
                agent_llms.insert(persona.name.clone(), create_provider(llm_config)?);
            }
        }

        Ok(Self {
            llm,
            llm_config: settings.llm.clone(),
            agent_llms,
            tools,
            personas,
            settings: settings.crew.clone(),
        })
    }

    pub fn settings(&self) -> &CrewSettings {
        &self.settings
    }

    pub fn llm(&self) -> &Arc<dyn LlmProvider> {
        &self.llm
    }

    /// Describe the personas for the API
    pub fn agent_infos(&self) -> Vec<AgentInfo> {
        self.personas
            .all()
            .iter()
            .map(|persona| AgentInfo::from_config(persona, &self.llm_config))
            .collect()
    }

    fn agents(&self) -> Vec<Arc<dyn Agent>> {
        self.personas
            .all()
            .into_iter()
            .map(|persona| {
                let llm = self
                    .agent_llms
                    .get(&persona.name)
                    .cloned()
                    .unwrap_or_else(|| self.llm.clone());
                create_agent(persona, llm, self.tools.clone())
            })
            .collect()
    }
}

/// One trip planning job
pub struct TripCrew {
    request: TripRequest,
    runtime: Arc<CrewRuntime>,
}

impl TripCrew {
    pub fn new(request: TripRequest, runtime: Arc<CrewRuntime>) -> Self {
        Self { request, runtime }
    }

    /// Assemble the crew: three research tasks, plus the report task when enabled
    pub fn build_crew(&self) -> AgentResult<Crew> {
        let tasks = TravelTasks::new(&self.request);

        let mut task_list = vec![
            tasks.plan_itinerary()?,
            tasks.identify_city()?,
            tasks.gather_city_info()?,
        ];
        if self.runtime.settings.structure_report {
            task_list.push(tasks.structure_info()?);
        }

        Crew::new(self.runtime.agents(), task_list)
    }

    /// Run the crew until the result is long enough or attempts run out.
    ///
    /// A short final result gets the fallback note appended. Any agent error
    /// aborts the run.
    pub async fn run(&self) -> AgentResult<String> {
        let settings = &self.runtime.settings;
        let crew = self.build_crew()?;

        let mut result = crew.kickoff().await?.raw;
        let mut attempts = 1;

        while result.chars().count() < settings.min_result_chars && attempts < settings.max_attempts {
            tracing::warn!(
                attempt = attempts,
                length = result.chars().count(),
                min_length = settings.min_result_chars,
                "Result too short, retrying crew"
            );
            result = crew.kickoff().await?.raw;
            attempts += 1;
        }

        let length = result.chars().count();
        if length < settings.min_result_chars {
            tracing::warn!(attempts, length, "Result still short after all attempts");
            result.push_str("\n\n");
            result.push_str(&settings.fallback_note);
        } else {
            tracing::info!(attempts, length, "Trip plan ready");
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::calculator::CalculatorTool;
    use crate::adapters::tool_handler::BuiltinToolHandler;
    use crate::agents::domain::Message;
    use crate::agents::error::{LlmError, LlmResult};
    use crate::agents::llm::{CompletionRequest, CompletionResponse, FinishReason};
    use crate::config::DEFAULT_FALLBACK_NOTE;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers every completion with a fixed text and counts calls
    struct FixedLlm {
        answer: String,
        calls: AtomicUsize,
    }

    impl FixedLlm {
        fn new(answer: impl Into<String>) -> Arc<Self> {
            Arc::new(Self {
                answer: answer.into(),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl LlmProvider for FixedLlm {
        fn name(&self) -> &str {
            "fixed"
        }

        fn model(&self) -> &str {
            "fixed-model"
        }

        async fn complete(&self, _request: CompletionRequest) -> LlmResult<CompletionResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(CompletionResponse {
                message: Message::assistant(self.answer.clone()),
                finish_reason: FinishReason::Stop,
                usage: None,
            })
        }
    }

    struct DownLlm;

    #[async_trait]
    impl LlmProvider for DownLlm {
        fn name(&self) -> &str {
            "down"
        }

        fn model(&self) -> &str {
            "down"
        }

        async fn complete(&self, _request: CompletionRequest) -> LlmResult<CompletionResponse> {
            Err(LlmError::Network("connection refused".to_string()))
        }
    }

    fn runtime(settings: &Settings, llm: Arc<dyn LlmProvider>) -> Arc<CrewRuntime> {
        let tools = Arc::new(BuiltinToolHandler::new(vec![Arc::new(CalculatorTool::new())]));
        Arc::new(CrewRuntime::new(settings, llm, tools).unwrap())
    }

    fn request() -> TripRequest {
        TripRequest::new("Berlin", vec!["Lisbon".to_string()], "May 1-8", "surfing")
    }

    #[tokio::test]
    async fn test_long_result_needs_one_attempt() {
        let llm = FixedLlm::new("x".repeat(2000));
        let crew = TripCrew::new(request(), runtime(&Settings::default(), llm.clone()));

        let result = crew.run().await.unwrap();
        assert_eq!(result.len(), 2000);
        assert_eq!(llm.calls(), 3);
    }

    #[tokio::test]
    async fn test_short_result_retries_and_appends_note() {
        let llm = FixedLlm::new("too short");
        let crew = TripCrew::new(request(), runtime(&Settings::default(), llm.clone()));

        let result = crew.run().await.unwrap();
        assert_eq!(result, format!("too short\n\n{}", DEFAULT_FALLBACK_NOTE));
        assert_eq!(llm.calls(), 3 * 5);
    }

    #[tokio::test]
    async fn test_structure_report_adds_task() {
        let mut settings = Settings::default();
        settings.crew.structure_report = true;
        settings.crew.max_attempts = 1;
        let llm = FixedLlm::new("short");
        let crew = TripCrew::new(request(), runtime(&settings, llm.clone()));

        assert_eq!(crew.build_crew().unwrap().tasks().len(), 4);
        crew.run().await.unwrap();
        assert_eq!(llm.calls(), 4);
    }

    #[tokio::test]
    async fn test_llm_failure_aborts() {
        let crew = TripCrew::new(request(), runtime(&Settings::default(), Arc::new(DownLlm)));
        assert!(crew.run().await.is_err());
    }

    #[test]
    fn test_agent_infos_use_default_model() {
        let rt = runtime(&Settings::default(), FixedLlm::new("x"));
        let infos = rt.agent_infos();
        assert_eq!(infos.len(), 4);
        assert!(infos.iter().all(|i| i.llm_model == "gpt-3.5-turbo"));
    }
}
