use super::tool_handler::{BuiltinTool, BuiltinToolHandler};
use crate::adapters::calculator::CalculatorTool;
use crate::config::SearchSettings;
use crate::domain::{Tool, ToolPort};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

struct EchoTool;

#[async_trait]
impl BuiltinTool for EchoTool {
    fn tool(&self) -> Tool {
        Tool {
            name: "echo".to_string(),
            description: "Echo".to_string(),
            input_schema: json!({}),
        }
    }

    async fn call(&self, args: &Value) -> String {
        args.to_string()
    }
}

#[tokio::test]
async fn test_execute_calculator() {
    let handler = BuiltinToolHandler::new(vec![Arc::new(CalculatorTool::new())]);

    let result = handler
        .execute_tool("calculate", json!({ "operation": "200*7" }))
        .await;
    assert_eq!(result.unwrap(), "1400");
}

#[tokio::test]
async fn test_execute_custom_tool() {
    let handler = BuiltinToolHandler::new(vec![Arc::new(EchoTool)]);

    let result = handler.execute_tool("echo", json!({ "msg": "hello" })).await;
    assert_eq!(result.unwrap(), "{\"msg\":\"hello\"}");
}

#[tokio::test]
async fn test_execute_tool_not_found() {
    let handler = BuiltinToolHandler::new(vec![Arc::new(CalculatorTool::new())]);

    let result = handler.execute_tool("unknown", json!({})).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_calculator_errors_are_not_failures() {
    let handler = BuiltinToolHandler::new(vec![Arc::new(CalculatorTool::new())]);

    let result = handler
        .execute_tool("calculate", json!({ "operation": "5*" }))
        .await;
    assert_eq!(
        result.unwrap(),
        "Error: Invalid syntax in mathematical expression"
    );
}

#[tokio::test]
async fn test_list_builtin_tools() {
    let handler = BuiltinToolHandler::from_settings(&SearchSettings::default()).unwrap();

    let list = handler.list_tools().await.unwrap();
    let names: Vec<&str> = list.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["calculate", "search_internet"]);
    assert!(list.iter().all(|t| t.input_schema["type"] == "object"));
}
