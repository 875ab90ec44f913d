pub mod api_handler;
pub mod calculator;
pub mod health_handler;
pub mod search;
pub mod tool_handler;

#[cfg(test)]
mod tool_handler_test;
