//! Error Types for the Weather Agent

use agent_core::AgentError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WeatherError>;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Temperature unavailable for {0}")]
    TemperatureUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Agent(#[from] AgentError),
}

impl WeatherError {
    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::InvalidRequest(msg) => format!("Invalid request: {}", msg),
            WeatherError::TemperatureUnavailable(location) => {
                format!("No temperature is available for {}.", location)
            }
            WeatherError::Config(_) => "The weather agent is misconfigured.".into(),
            WeatherError::Agent(err) => err.user_message(),
        }
    }
}
