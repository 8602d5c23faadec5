//! Error Types

use std::time::Duration;

use thiserror::Error;

use crate::message::Message;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent error types
#[derive(Error, Debug)]
pub enum AgentError {
    /// Model call failed (connection, malformed response, refused request)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Provider unavailable or overloaded
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Rate limited by the provider
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Invocation exceeded its wall-time budget
    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// A tool with this name is already registered
    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),

    /// Tool arguments did not match the tool's input shape
    #[error("Invalid arguments for tool '{tool}': {message}")]
    ToolArgument { tool: String, message: String },

    /// Tool handler failed
    #[error("Tool '{tool}' failed: {message}")]
    ToolExecution { tool: String, message: String },

    /// Final output did not decode against the structured-output schema
    #[error("Schema violation: {message} (payload: {payload})")]
    SchemaViolation { message: String, payload: String },

    /// Maximum model calls reached in the agent loop
    #[error("Maximum iterations ({0}) reached")]
    MaxIterations(usize),

    /// Escalation channel closed before an answer arrived
    #[error("Escalation failed: {0}")]
    Escalation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A fatal error, annotated with the last assistant/tool exchange
    #[error("{source}")]
    Aborted {
        #[source]
        source: Box<AgentError>,
        last_exchange: Vec<Message>,
    },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl AgentError {
    /// Wrap a fatal error with the exchange that led to it.
    pub fn with_exchange(self, last_exchange: Vec<Message>) -> Self {
        match self {
            already @ AgentError::Aborted { .. } => already,
            source => AgentError::Aborted {
                source: Box::new(source),
                last_exchange,
            },
        }
    }

    /// The underlying cause, unwrapping `Aborted`
    pub fn root(&self) -> &AgentError {
        match self {
            AgentError::Aborted { source, .. } => source.root(),
            other => other,
        }
    }

    /// Messages recorded when the invocation aborted (empty otherwise)
    pub fn last_exchange(&self) -> &[Message] {
        match self {
            AgentError::Aborted { last_exchange, .. } => last_exchange,
            _ => &[],
        }
    }

    /// Check if error is retryable by an outer policy
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.root(),
            AgentError::ProviderUnavailable(_)
                | AgentError::RateLimited(_)
                | AgentError::Timeout(_)
        )
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self.root() {
            AgentError::Transport(msg) => format!("The AI service encountered an error: {}", msg),
            AgentError::ProviderUnavailable(_) => "The AI service is currently unavailable. Please try again.".into(),
            AgentError::RateLimited(_) => "You've made too many requests. Please wait a moment.".into(),
            AgentError::Timeout(_) => "The request took too long to process. Please try again.".into(),
            AgentError::ToolArgument { tool, .. } => format!("The model called '{}' with invalid input.", tool),
            AgentError::ToolExecution { tool, message } => format!("Tool '{}' failed: {}", tool, message),
            AgentError::SchemaViolation { .. } => "The model returned a response in an unexpected format.".into(),
            AgentError::MaxIterations(_) => "The agent could not produce an acceptable answer. Please try a simpler request.".into(),
            AgentError::Escalation(_) => "No operator answered the agent's question.".into(),
            AgentError::Config(msg) => format!("The agent is misconfigured: {}", msg),
            _ => "An unexpected error occurred.".into(),
        }
    }
}

impl From<anyhow::Error> for AgentError {
    fn from(err: anyhow::Error) -> Self {
        AgentError::Other(err.to_string())
    }
}
