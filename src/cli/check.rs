//! Validate expressions and evaluate them against JSON trees

use super::{json_to_tree, match_to_json, CliError};
use crate::{output, Expression, MatchType};

/// Options for the check and eval commands
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The expression to evaluate
    pub expression: String,
    /// JSON tree input
    pub input: Option<String>,
    /// Only validate syntax, don't evaluate
    pub syntax_only: bool,
    /// Render matched nodes as outlines instead of JSON
    pub outline: bool,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// Syntax validation passed, with the parsed pipeline structure
    SyntaxValid(String),
    /// Expression evaluated with JSON output
    Success(serde_json::Value),
    /// Expression evaluated with outline output
    Outline(String),
}

/// Execute a check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let expression = Expression::parse(&options.expression)?;

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid(output::describe(expression.template())));
    }

    let json_str = options.input.as_ref().ok_or(CliError::NoInput)?;
    let json_value: serde_json::Value = serde_json::from_str(json_str)?;
    let (tree, root) = json_to_tree(json_value)?;

    let matched = expression.evaluate(&tree, root)?;

    if options.outline && matched.match_type() == MatchType::Node {
        let outlines: Vec<String> = matched
            .nodes()
            .map(|node| output::outline(&tree, node))
            .collect();
        return Ok(CheckResult::Outline(outlines.join("\n")));
    }

    Ok(CheckResult::Success(match_to_json(&tree, &matched)?))
}

/// Evaluate an expression against a JSON tree
pub fn execute_eval(expression: &str, input: &str) -> Result<serde_json::Value, CliError> {
    let options = CheckOptions {
        expression: expression.to_string(),
        input: Some(input.to_string()),
        ..Default::default()
    };
    match execute_check(&options)? {
        CheckResult::Success(json) => Ok(json),
        CheckResult::SyntaxValid(_) | CheckResult::Outline(_) => Ok(serde_json::Value::Null),
    }
}
