//! Application State

use std::sync::Arc;

use agent_core::LlmProvider;
use weather_agent::WeatherAgent;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// LLM provider (Ollama, etc.)
    pub provider: Arc<dyn LlmProvider>,

    /// Weather agent serving `/api/agent/invoke`
    pub agent: Arc<WeatherAgent>,

    /// Model the agent runs on
    pub model: String,
}
