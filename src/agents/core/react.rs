//! ReAct agent implementation (Reasoning + Acting)

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use super::{render_system_prompt, render_task_prompt, Agent};
use crate::agents::config::AgentConfig;
use crate::agents::domain::{
    Message, TaskOutput, TokenUsage, ToolCall, ToolCallResult, ToolDefinition,
};
use crate::agents::error::AgentResult;
use crate::agents::llm::{CompletionRequest, CompletionResponse, LlmProvider};
use crate::agents::task::Task;
use crate::domain::ToolPort;

const FINAL_ANSWER_PROMPT: &str =
    "You have run out of tool iterations. Give your best Final Answer now using what you have gathered so far.";

/// ReAct agent: Reasoning + Action loop with tool calling
pub struct ReActAgent {
    config: AgentConfig,
    llm: Arc<dyn LlmProvider>,
    tool_handler: Arc<dyn ToolPort>,
}

impl ReActAgent {
    /// Create a new ReAct agent
    pub fn new(config: AgentConfig, llm: Arc<dyn LlmProvider>, tool_handler: Arc<dyn ToolPort>) -> Self {
        Self {
            config,
            llm,
            tool_handler,
        }
    }

    async fn build_tool_definitions(&self) -> Vec<ToolDefinition> {
        if self.config.tools.is_empty() {
            return Vec::new();
        }

        let all_tools = match self.tool_handler.list_tools().await {
            Ok(tools) => tools,
            Err(e) => {
                tracing::warn!(agent = %self.config.name, "Failed to list tools: {}", e);
                return Vec::new();
            }
        };

        all_tools
            .into_iter()
            .filter(|tool| self.config.tools.contains(&tool.name))
            .map(|tool| ToolDefinition::new(tool.name, tool.description, tool.input_schema))
            .collect()
    }

    async fn complete(
        &self,
        messages: &[Message],
        tools: Option<Vec<ToolDefinition>>,
        usage: &mut TokenUsage,
    ) -> AgentResult<CompletionResponse> {
        let request = CompletionRequest {
            messages: messages.to_vec(),
            temperature: self.config.temperature,
            tools,
            ..Default::default()
        };

        let response = self.llm.complete(request).await?;
        if let Some(u) = &response.usage {
            usage.add(u);
        }
        Ok(response)
    }

    async fn call_tool(&self, call: &ToolCall) -> ToolCallResult {
        let started = Instant::now();

        if !self.config.tools.contains(&call.name) {
            return ToolCallResult::failure(
                call,
                format!("Tool '{}' is not available to {}", call.name, self.config.role),
                0,
            );
        }

        let result = self
            .tool_handler
            .execute_tool(&call.name, call.arguments.clone())
            .await;
        let elapsed = started.elapsed().as_millis() as u64;

        match result {
            Ok(output) => ToolCallResult::success(call, output, elapsed),
            Err(e) => {
                tracing::warn!(agent = %self.config.name, tool = %call.name, "Tool call failed: {}", e);
                ToolCallResult::failure(call, e, elapsed)
            }
        }
    }
}

#[async_trait]
impl Agent for ReActAgent {
    fn config(&self) -> &AgentConfig {
        &self.config
    }

    async fn execute_task(&self, task: &Task, context: &[TaskOutput]) -> AgentResult<TaskOutput> {
        let start_time = Instant::now();

        let mut messages = vec![
            Message::system(render_system_prompt(&self.config)),
            Message::user(render_task_prompt(task, context)),
        ];

        let tools = self.build_tool_definitions().await;
        let mut usage = TokenUsage::default();
        let mut all_tool_calls: Vec<ToolCallResult> = Vec::new();
        let mut final_content = None;
        let mut iterations = 0;

        while iterations < self.config.max_iterations {
            iterations += 1;

            let offered = if tools.is_empty() { None } else { Some(tools.clone()) };
            let response = self.complete(&messages, offered, &mut usage).await?;
            let message = response.message;

            if !message.has_tool_calls() {
                final_content = Some(message.content);
                break;
            }

            let tool_calls = message.tool_calls.clone().unwrap_or_default();
            tracing::debug!(
                agent = %self.config.name,
                task = %task.name,
                iteration = iterations,
                calls = tool_calls.len(),
                "Model requested tools"
            );
            messages.push(message);

            for call in &tool_calls {
                let result = self.call_tool(call).await;
                messages.push(Message::tool_result(&call.id, result.output.clone()));
                all_tool_calls.push(result);
            }
        }

        let raw = match final_content {
            Some(content) => content,
            None => {
                // Iteration budget spent on tools; ask once more without offering any.
                messages.push(Message::user(FINAL_ANSWER_PROMPT));
                iterations += 1;
                self.complete(&messages, None, &mut usage).await?.message.content
            }
        };

        let execution_time_ms = start_time.elapsed().as_millis() as u64;
        tracing::info!(
            agent = %self.config.name,
            task = %task.name,
            iterations,
            tool_calls = all_tool_calls.len(),
            chars = raw.chars().count(),
            elapsed_ms = execution_time_ms,
            "Task completed"
        );

        Ok(TaskOutput {
            task: task.name.clone(),
            agent: self.config.name.clone(),
            raw,
            tool_calls: all_tool_calls,
            iterations,
            usage,
            execution_time_ms,
        })
    }
}
