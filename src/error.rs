//! Error types for the reference store, contexts, and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by contexts and commands.
///
/// Nothing in the library catches these; they propagate out of
/// `WorkflowContext::run` to whoever drives the sequence.
#[derive(Debug, Error)]
pub enum FlowError {
    /// A required input token has never been stored (or the context was cleared).
    #[error("Token not found: {token}")]
    MissingToken { token: String },

    /// A pattern-driven transform found nothing to return.
    #[error("{transform}: no match found for pattern {pattern}")]
    NoMatch { transform: String, pattern: String },

    #[error("Invalid pattern {pattern}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// A workflow step failed to build or run; `step` is 1-based.
    #[error("Workflow step {step} ({command}) failed: {source}")]
    Workflow {
        step: usize,
        command: String,
        #[source]
        source: Box<FlowError>,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl FlowError {
    pub fn missing_token(token: impl Into<String>) -> Self {
        FlowError::MissingToken {
            token: token.into(),
        }
    }

    pub fn workflow_step(step: usize, command: impl Into<String>, source: FlowError) -> Self {
        FlowError::Workflow {
            step,
            command: command.into(),
            source: Box::new(source),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FlowError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_json::Error> for FlowError {
    fn from(err: serde_json::Error) -> Self {
        FlowError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for FlowError {
    fn from(err: serde_yaml::Error) -> Self {
        FlowError::Serialization(err.to_string())
    }
}
