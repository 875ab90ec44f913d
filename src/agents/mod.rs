//! Agent runtime for the trip planner
//!
//! ## Architecture
//!
//! - `domain/` - Core types (Message, ToolCall, TaskOutput, CrewOutput)
//! - `llm/` - LLM provider abstraction and the OpenAI-compatible client
//! - `core/` - The ReAct agent (reasoning + tool calling)
//! - `task` - Task definitions and description templates
//! - `orchestration/` - Sequential crews

pub mod config;
pub mod core;
pub mod domain;
pub mod error;
pub mod llm;
pub mod orchestration;
pub mod task;

// Re-export commonly used types
pub use config::*;
pub use domain::*;
pub use error::*;
pub use orchestration::Crew;
pub use task::Task;
