//! Task definitions
//!
//! A task is a rendered prompt bound to the agent that has to answer it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tera::{Context, Tera};

use crate::agents::error::AgentResult;

/// A unit of work for one agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique task name within a crew
    pub name: String,
    /// Fully rendered task description
    pub description: String,
    /// What a complete answer looks like
    pub expected_output: String,
    /// Name of the agent that performs the task
    pub agent: String,
    /// Names of earlier tasks whose output this task reads. `None` means all
    /// earlier tasks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Vec<String>>,
}

impl Task {
    pub fn new(
        name: impl Into<String>,
        agent: impl Into<String>,
        description: impl Into<String>,
        expected_output: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            expected_output: expected_output.into(),
            agent: agent.into(),
            context: None,
        }
    }

    /// Restrict the context to the named earlier tasks
    pub fn with_context<I, S>(mut self, tasks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.context = Some(tasks.into_iter().map(Into::into).collect());
        self
    }

    /// Whether the output of `task` should be shown to this task
    pub fn reads(&self, task: &str) -> bool {
        match &self.context {
            Some(names) => names.iter().any(|n| n == task),
            None => true,
        }
    }
}

/// Render a task description template.
///
/// Templates use Tera syntax; `values` must be a JSON object whose keys become
/// template variables. Strict rendering: an unknown variable is an error. The
/// template is dedented before rendering, so values are inserted verbatim.
pub fn render_description(template: &str, values: &Value) -> AgentResult<String> {
    let context = Context::from_value(values.clone())?;
    let rendered = Tera::one_off(&dedent(template), &context, false)?;
    Ok(rendered.trim_matches('\n').to_string())
}

/// Strip the common leading indentation and surrounding blank lines.
///
/// Only ASCII spaces and tabs count as indentation.
pub fn dedent(text: &str) -> String {
    let indent = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(leading_blanks)
        .min()
        .unwrap_or(0);

    text.lines()
        .map(|line| &line[leading_blanks(line).min(indent)..])
        .collect::<Vec<_>>()
        .join("\n")
        .trim_matches('\n')
        .to_string()
}

fn leading_blanks(line: &str) -> usize {
    line.bytes().take_while(|b| *b == b' ' || *b == b'\t').count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_description() {
        let rendered = render_description(
            "\n    Plan a trip to {{ city }}.\n      - Dates: {{ dates }}\n",
            &json!({ "city": "Rome", "dates": "May" }),
        )
        .unwrap();
        assert_eq!(rendered, "Plan a trip to Rome.\n  - Dates: May");
    }

    #[test]
    fn test_values_are_not_dedented() {
        let rendered = render_description(
            "\n    Interests: {{ interests }}\n    Cities: {{ cities }}\n",
            &json!({
                "interests": "surf\n\u{3000}\u{3000}museums",
                "cities": "\u{3000}Kyoto\n  Nara"
            }),
        )
        .unwrap();
        assert_eq!(
            rendered,
            "Interests: surf\n\u{3000}\u{3000}museums\nCities: \u{3000}Kyoto\n  Nara"
        );
    }

    #[test]
    fn test_dedent_ignores_unicode_whitespace() {
        assert_eq!(dedent("  \u{3000}a\n  b"), "\u{3000}a\nb");
        assert_eq!(dedent("    a\n\u{3000}\n    b"), "a\n\u{3000}\nb");
        assert_eq!(dedent("\t\tx\n\t\t\ty"), "x\n\ty");
    }

    #[test]
    fn test_unknown_variable_is_error() {
        let result = render_description("{{ missing }}", &json!({}));
        assert!(result.is_err());
    }

    #[test]
    fn test_reads_context() {
        let open = Task::new("b", "agent", "d", "e");
        assert!(open.reads("a"));

        let restricted = Task::new("c", "agent", "d", "e").with_context(["a"]);
        assert!(restricted.reads("a"));
        assert!(!restricted.reads("b"));
    }
}
