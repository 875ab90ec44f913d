//! Domain types for the agent runtime
//!
//! Messages exchanged with the LLM, tool calls, persona descriptions and the
//! outputs produced by tasks and crews.

mod agent;
mod message;
mod response;
mod tool_call;

pub use agent::*;
pub use message::*;
pub use response::*;
pub use tool_call::*;
