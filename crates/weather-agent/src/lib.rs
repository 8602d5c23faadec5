//! # weather-agent
//!
//! Finds the weather for a number of suburbs near a location. The model
//! calls `GetWeather` for each suburb it picks, answers with a strict
//! `WeatherReport`, and an evaluator sends the report back for fixes until
//! it follows the suburb rules.
//!
//! ```text
//! WeatherRequest ─▶ Agent<WeatherReport> ─▶ GetWeather ×N ─▶ WeatherReport
//!                          ▲                                     │
//!                          └──── correction ◀── suburb rules ◀───┘
//! ```

pub mod agent;
pub mod error;
pub mod model;
pub mod rules;
pub mod source;
pub mod tools;

pub use agent::{WeatherAgent, WeatherAgentBuilder, WeatherAgentConfig};
pub use error::{Result, WeatherError};
pub use model::{OutputWeather, WeatherReport, WeatherRequest};
pub use source::{FixedTemperature, RandomTemperature, TemperatureSource};

/// System prompt for the weather agent
pub const WEATHER_AGENT_PROMPT: &str = r#"You are an AI agent that fills weather requests using tools.
You will be provided with a location, you must find the weather for a count of suburbs within distance of the location.
Only provide data that is retrieved via a tool, do not make up data."#;

/// System prompt when an operator can answer questions
pub const ESCALATION_PROMPT: &str = r#"You are an AI agent that fills weather requests using tools.
Only provide data that is retrieved via a tool, do not make up data.
You have been provided a tool to escalate questions if something is unclear."#;
