//! CLI support for p5x
//!
//! Provides programmatic access to the p5x CLI commands, so other tools can
//! embed them.

mod check;
mod convert;
mod docs;

pub use check::{execute_check, execute_eval, CheckOptions, CheckResult};
pub use convert::{json_to_tree, match_to_json, tree_to_json, value_to_json};
pub use docs::{get_doc_category, get_docs_overview, DocCategory};

use std::io;

/// Errors that can occur during CLI operations
#[derive(Debug)]
pub enum CliError {
    /// Expression parse or evaluation error
    Expression(crate::ExpressionError),
    /// Value conversion error
    Conversion(crate::ConversionError),
    /// JSON parsing error
    Json(serde_json::Error),
    /// JSON that does not describe a node tree
    InvalidTree(String),
    /// IO error
    Io(io::Error),
    /// No input provided
    NoInput,
    /// Unknown documentation category
    UnknownCategory(String),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Expression(e) => write!(f, "{}", e),
            CliError::Conversion(e) => write!(f, "Conversion error: {}", e),
            CliError::Json(e) => write!(f, "Invalid JSON: {}", e),
            CliError::InvalidTree(message) => write!(f, "Invalid tree: {}", message),
            CliError::Io(e) => write!(f, "IO error: {}", e),
            CliError::NoInput => {
                write!(f, "No input provided. Use --input or pipe a JSON tree to stdin.")
            }
            CliError::UnknownCategory(c) => {
                write!(f, "Unknown category: '{}'\nRun 'p5x docs' to see available categories.", c)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Expression(e) => Some(e),
            CliError::Conversion(e) => Some(e),
            CliError::Json(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<crate::ExpressionError> for CliError {
    fn from(e: crate::ExpressionError) -> Self {
        CliError::Expression(e)
    }
}

impl From<crate::ConversionError> for CliError {
    fn from(e: crate::ConversionError) -> Self {
        CliError::Conversion(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Json(e)
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        CliError::Io(e)
    }
}
