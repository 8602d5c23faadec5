//! # agent-runtime
//!
//! Runtime providers for the agent loop.
//!
//! ## Providers
//!
//! - **Ollama** (default): local inference through Ollama's OpenAI-compatible
//!   API, with tool calling and strict `json_schema` output
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::OllamaProvider;
//!
//! let provider = OllamaProvider::from_env()?;
//! let agent = Agent::<WeatherReport>::builder()
//!     .provider(Arc::new(provider))
//!     .tools(tools)
//!     .build()?;
//! ```

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "ollama")]
pub use ollama::{OllamaConfig, OllamaProvider};

// Re-export core types for convenience
pub use agent_core::{Agent, AgentError, LlmProvider, Message, Result, Role, ToolRegistry};
