//! Weather Agent
//!
//! Wires the weather tools, the suburb rules and an optional operator into
//! an `Agent<WeatherReport>`.

use std::sync::Arc;
use std::time::Duration;

use agent_core::escalation::Operator;
use agent_core::provider::LlmProvider;
use agent_core::reasoning::{Agent, Invocation};

use crate::error::{Result, WeatherError};
use crate::model::{WeatherReport, WeatherRequest};
use crate::rules::suburb_evaluator;
use crate::source::{RandomTemperature, TemperatureSource};
use crate::tools::weather_tools;
use crate::{ESCALATION_PROMPT, WEATHER_AGENT_PROMPT};

/// Weather agent configuration
#[derive(Clone, Debug)]
pub struct WeatherAgentConfig {
    /// Model used by the agent and its evaluator
    pub model: String,

    /// Maximum model calls per request
    pub max_iterations: usize,

    /// Wall-time bound per request
    pub time_budget: Option<Duration>,

    /// Check reports against the suburb rules
    pub evaluate: bool,
}

impl Default for WeatherAgentConfig {
    fn default() -> Self {
        Self {
            model: "llama3.2".into(),
            max_iterations: 10,
            time_budget: None,
            evaluate: true,
        }
    }
}

impl WeatherAgentConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let model = std::env::var("AGENT_MODEL").unwrap_or(defaults.model);
        let max_iterations = std::env::var("AGENT_MAX_ITERATIONS")
            .ok()
            .and_then(|n| n.parse().ok())
            .unwrap_or(defaults.max_iterations);
        let time_budget = time_budget_secs(std::env::var("AGENT_TIME_BUDGET_SECS").ok().as_deref());

        Self {
            model,
            max_iterations,
            time_budget,
            ..defaults
        }
    }
}

/// A zero or unparsable budget means no bound
fn time_budget_secs(value: Option<&str>) -> Option<Duration> {
    value
        .and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

/// Suburb weather agent
pub struct WeatherAgent {
    agent: Agent<WeatherReport>,
}

impl WeatherAgent {
    pub fn builder() -> WeatherAgentBuilder {
        WeatherAgentBuilder::default()
    }

    /// Answer a weather request
    pub async fn invoke(&self, request: &WeatherRequest) -> Result<WeatherReport> {
        self.execute(request).await.map(|invocation| invocation.output)
    }

    /// Answer a weather request, keeping the conversation and loop counters
    pub async fn execute(&self, request: &WeatherRequest) -> Result<Invocation<WeatherReport>> {
        request.validate()?;

        tracing::info!(
            count = request.count,
            distance = request.distance,
            location = %request.location,
            "Weather request"
        );
        let invocation = self.agent.execute(request.prompt()).await?;

        tracing::info!(
            suburbs = invocation.output.weather.len(),
            model_calls = invocation.model_calls,
            rejections = invocation.rejections.len(),
            "Weather report ready"
        );
        Ok(invocation)
    }

    pub fn agent(&self) -> &Agent<WeatherReport> {
        &self.agent
    }
}

/// Builder for `WeatherAgent`
#[derive(Default)]
pub struct WeatherAgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    evaluator_provider: Option<Arc<dyn LlmProvider>>,
    source: Option<Arc<dyn TemperatureSource>>,
    operator: Option<Arc<dyn Operator>>,
    config: WeatherAgentConfig,
}

impl WeatherAgentBuilder {
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Model backend for the evaluator; defaults to the agent's provider
    pub fn evaluator_provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.evaluator_provider = Some(provider);
        self
    }

    /// Temperature source; defaults to `RandomTemperature`
    pub fn source(mut self, source: Arc<dyn TemperatureSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Enable the `AskOperator` escalation tool
    pub fn operator(mut self, operator: Arc<dyn Operator>) -> Self {
        self.operator = Some(operator);
        self
    }

    pub fn config(mut self, config: WeatherAgentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<WeatherAgent> {
        let provider = self
            .provider
            .ok_or_else(|| WeatherError::Config("Provider is required".into()))?;
        let source = self
            .source
            .unwrap_or_else(|| Arc::new(RandomTemperature::default()));

        let tools = weather_tools(source, self.operator.is_some())?;
        let prompt = match self.operator {
            Some(_) => ESCALATION_PROMPT,
            None => WEATHER_AGENT_PROMPT,
        };

        let mut builder = Agent::<WeatherReport>::builder()
            .provider(provider.clone())
            .tools(tools)
            .system_prompt(prompt)
            .model(self.config.model.as_str())
            .max_iterations(self.config.max_iterations);

        if let Some(budget) = self.config.time_budget {
            builder = builder.time_budget(budget);
        }
        if let Some(operator) = self.operator {
            builder = builder.operator(operator);
        }
        if self.config.evaluate {
            let judge = self.evaluator_provider.unwrap_or(provider);
            builder = builder.evaluator(Arc::new(suburb_evaluator(judge, self.config.model.as_str())));
        }

        Ok(WeatherAgent {
            agent: builder.build()?,
        })
    }
}
