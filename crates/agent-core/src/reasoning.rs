//! Agent Loop
//!
//! Drives one invocation from request to accepted structured output:
//!
//! ```text
//! AWAITING_MODEL ──tool calls──▶ DISPATCHING_TOOLS ──▶ AWAITING_MODEL
//!        │
//!        └──final text──▶ VALIDATING ──accepted──▶ DONE
//!                              │
//!                              └──rejected──▶ AWAITING_MODEL (with correction)
//! ```
//!
//! Each iteration makes exactly one model call. Every response is appended to
//! the conversation before it is inspected, tool results are appended in the
//! order the calls were made, and the loop is bounded by `max_iterations` and
//! an optional wall-time budget.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use futures::future;
use serde::de::DeserializeOwned;

use crate::error::{AgentError, Result};
use crate::escalation::Operator;
use crate::evaluator::Evaluate;
use crate::message::{Conversation, Message, ToolCallRequest};
use crate::provider::{GenerationOptions, LlmProvider, ResponseFormat};
use crate::schema::{decode_structured, Shaped};
use crate::tool::{ToolOutput, ToolRegistry};

/// Prefix of the corrective message injected after a rejection
pub const CORRECTION_PREFIX: &str =
    "The following issues have been found with the previous output, please fix: ";

const DEFAULT_SYSTEM_PROMPT: &str = "You are an AI agent that fills requests using tools.
Only provide data that is retrieved via a tool, do not make up data.";

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// Task instructions, sent as the first message
    pub system_prompt: String,

    /// Maximum model calls per invocation before giving up
    pub max_iterations: usize,

    /// Wall-time bound for one invocation
    pub time_budget: Option<Duration>,

    /// Generation options (tools and response format are filled in by the agent)
    pub generation: GenerationOptions,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            max_iterations: 10,
            time_budget: None,
            generation: GenerationOptions::default(),
        }
    }
}

/// A finished invocation
#[derive(Debug)]
pub struct Invocation<T> {
    /// The accepted output
    pub output: T,

    /// Full message history of the invocation
    pub conversation: Conversation,

    /// Calls made to the primary model
    pub model_calls: usize,

    /// Evaluator rejection reasons, in order
    pub rejections: Vec<String>,
}

#[derive(Default)]
struct Progress {
    model_calls: usize,
    rejections: Vec<String>,
}

/// Tool-using agent producing structured output of type `T`
pub struct Agent<T> {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    evaluator: Option<Arc<dyn Evaluate<T>>>,
    operator: Option<Arc<dyn Operator>>,
    config: AgentConfig,
    options: GenerationOptions,
}

impl<T> Agent<T>
where
    T: Shaped + DeserializeOwned + Send + Sync,
{
    /// Start building an agent
    pub fn builder() -> AgentBuilder<T> {
        AgentBuilder::new()
    }

    /// Run the agent on a request and return the accepted output
    pub async fn invoke(&self, request: impl Into<String>) -> Result<T> {
        self.execute(request).await.map(|invocation| invocation.output)
    }

    /// Run the agent on a request, keeping the conversation and loop counters.
    ///
    /// Dropping the returned future cancels the invocation at its current
    /// suspend point; its conversation goes with it.
    pub async fn execute(&self, request: impl Into<String>) -> Result<Invocation<T>> {
        let mut conversation = Conversation::seeded(self.config.system_prompt.as_str(), request);
        let mut progress = Progress::default();

        let outcome = match self.config.time_budget {
            Some(budget) => tokio::time::timeout(budget, self.drive(&mut conversation, &mut progress))
                .await
                .unwrap_or_else(|_| Err(AgentError::Timeout(budget))),
            None => self.drive(&mut conversation, &mut progress).await,
        };

        match outcome {
            Ok(output) => Ok(Invocation {
                output,
                conversation,
                model_calls: progress.model_calls,
                rejections: progress.rejections,
            }),
            Err(err) => {
                tracing::error!(error = %err, model_calls = progress.model_calls, "Invocation aborted");
                Err(err.with_exchange(conversation.last_exchange().to_vec()))
            }
        }
    }

    /// Continue the loop on a caller-owned conversation, e.g. one restored
    /// from storage. The time budget is not applied here.
    pub async fn run(&self, conversation: &mut Conversation) -> Result<T> {
        let mut progress = Progress::default();
        self.drive(conversation, &mut progress)
            .await
            .map_err(|err| err.with_exchange(conversation.last_exchange().to_vec()))
    }

    async fn drive(&self, conversation: &mut Conversation, progress: &mut Progress) -> Result<T> {
        loop {
            if progress.model_calls >= self.config.max_iterations {
                return Err(AgentError::MaxIterations(self.config.max_iterations));
            }
            progress.model_calls += 1;

            tracing::debug!(
                iteration = progress.model_calls,
                messages = conversation.len(),
                tokens = conversation.estimate_tokens(),
                "Requesting completion"
            );
            let completion = self
                .provider
                .complete(conversation.messages(), &self.options)
                .await?;

            let calls = assign_call_ids(completion.tool_calls);
            conversation.push(Message::assistant(completion.content.as_str()).with_tool_calls(calls.clone()));

            if !calls.is_empty() {
                self.dispatch(&calls, conversation).await?;
                continue;
            }

            let candidate: T = decode_structured(&completion.content).inspect_err(|err| {
                tracing::warn!(error = %err, "Final output failed schema validation");
            })?;

            let Some(evaluator) = &self.evaluator else {
                tracing::info!(model_calls = progress.model_calls, "Output accepted");
                return Ok(candidate);
            };

            let verdict = evaluator.evaluate(&candidate).await?;
            if verdict.is_correct {
                tracing::info!(
                    model_calls = progress.model_calls,
                    rejections = progress.rejections.len(),
                    "Output accepted by evaluator"
                );
                return Ok(candidate);
            }

            tracing::warn!(errors = %verdict.errors, "Evaluator rejected output");
            conversation.push(Message::correction(format!("{}{}", CORRECTION_PREFIX, verdict.errors)));
            progress.rejections.push(verdict.errors);
        }
    }

    /// Run every call of one turn and append the results in call order.
    async fn dispatch(&self, calls: &[ToolCallRequest], conversation: &mut Conversation) -> Result<()> {
        let results = if self.options.parallel_tool_calls && calls.len() > 1 {
            future::join_all(calls.iter().map(|call| self.run_tool(call))).await
        } else {
            let mut results = Vec::with_capacity(calls.len());
            for call in calls {
                let result = self.run_tool(call).await;
                let failed = result.is_err();
                results.push(result);
                if failed {
                    break;
                }
            }
            results
        };

        for (call, result) in calls.iter().zip(results) {
            conversation.push(Message::tool(call, result?));
        }
        Ok(())
    }

    async fn run_tool(&self, call: &ToolCallRequest) -> Result<String> {
        tracing::debug!(tool = %call.name, id = %call.id, "Dispatching tool call");

        match self.tools.invoke(&call.name, &call.arguments).await? {
            ToolOutput::Text(text) => Ok(text),
            ToolOutput::Escalate(question) => {
                let operator = self.operator.as_ref().ok_or_else(|| {
                    AgentError::Config(format!("tool '{}' escalates but no operator is set", call.name))
                })?;
                operator.ask(&call.id, &question).await
            }
        }
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Options sent with every model call
    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }
}

/// Providers that omit call ids still need every tool message correlated.
fn assign_call_ids(calls: Vec<ToolCallRequest>) -> Vec<ToolCallRequest> {
    calls
        .into_iter()
        .map(|mut call| {
            if call.id.is_empty() {
                call.id = format!("call_{}", uuid::Uuid::new_v4().simple());
            }
            call
        })
        .collect()
}

/// Builder for Agent configuration
pub struct AgentBuilder<T> {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: Arc<ToolRegistry>,
    evaluator: Option<Arc<dyn Evaluate<T>>>,
    operator: Option<Arc<dyn Operator>>,
    config: AgentConfig,
    _output: PhantomData<fn() -> T>,
}

impl<T> Default for AgentBuilder<T>
where
    T: Shaped + DeserializeOwned + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> AgentBuilder<T>
where
    T: Shaped + DeserializeOwned + Send + Sync,
{
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: Arc::new(ToolRegistry::new()),
            evaluator: None,
            operator: None,
            config: AgentConfig::default(),
            _output: PhantomData,
        }
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = Arc::new(tools);
        self
    }

    /// Use a registry shared with other agents
    pub fn shared_tools(mut self, tools: Arc<ToolRegistry>) -> Self {
        self.tools = tools;
        self
    }

    pub fn evaluator(mut self, evaluator: Arc<dyn Evaluate<T>>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    pub fn operator(mut self, operator: Arc<dyn Operator>) -> Self {
        self.operator = Some(operator);
        self
    }

    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.generation.temperature = temp;
        self
    }

    pub fn parallel_tool_calls(mut self, allow: bool) -> Self {
        self.config.generation.parallel_tool_calls = allow;
        self
    }

    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = max;
        self
    }

    pub fn time_budget(mut self, budget: Duration) -> Self {
        self.config.time_budget = Some(budget);
        self
    }

    pub fn build(self) -> Result<Agent<T>> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        if self.config.max_iterations == 0 {
            return Err(AgentError::Config("max_iterations must be at least 1".into()));
        }
        if self.config.time_budget == Some(Duration::ZERO) {
            return Err(AgentError::Config("time_budget must be greater than zero".into()));
        }
        if self.tools.has_escalation() && self.operator.is_none() {
            return Err(AgentError::Config(
                "an escalation tool is registered but no operator is set".into(),
            ));
        }

        let options = GenerationOptions {
            response_format: ResponseFormat::json_schema::<T>(true),
            tools: self.tools.descriptors(),
            ..self.config.generation.clone()
        };

        Ok(Agent {
            provider,
            tools: self.tools,
            evaluator: self.evaluator,
            operator: self.operator,
            config: self.config,
            options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escalation::ChannelOperator;
    use crate::evaluator::EvaluationResult;
    use crate::message::Role;
    use crate::mock::ScriptedProvider;
    use crate::provider::Completion;
    use crate::schema::{ObjectShape, Shape};
    use async_trait::async_trait;
    use serde::{Deserialize, Serialize};
    use std::sync::Mutex;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Forecast {
        suburb: String,
        degrees_c: f64,
    }

    impl Shaped for Forecast {
        fn shape() -> Shape {
            ObjectShape::new("Forecast")
                .field("suburb", Shape::String)
                .field("degrees_c", Shape::Number)
                .build()
        }
    }

    #[derive(Deserialize)]
    struct Location {
        location: String,
    }

    impl Shaped for Location {
        fn shape() -> Shape {
            ObjectShape::new("Location").field("location", Shape::String).build()
        }
    }

    const FINAL: &str = r#"{"suburb": "Carlton", "degrees_c": 21.5}"#;

    fn weather_tools() -> ToolRegistry {
        let mut tools = ToolRegistry::new();
        tools.register("GetWeather", |_: Location| 21.5_f64).unwrap();
        tools
    }

    fn call(id: &str, name: &str, arguments: &str) -> ToolCallRequest {
        ToolCallRequest::new(id, name, arguments)
    }

    /// Verdicts handed out in order, recording every candidate seen
    struct ScriptedJudge {
        verdicts: Mutex<Vec<EvaluationResult>>,
        seen: Mutex<Vec<String>>,
    }

    impl ScriptedJudge {
        fn new(mut verdicts: Vec<EvaluationResult>) -> Self {
            verdicts.reverse();
            Self {
                verdicts: Mutex::new(verdicts),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Evaluate<Forecast> for ScriptedJudge {
        async fn evaluate(&self, candidate: &Forecast) -> Result<EvaluationResult> {
            self.seen.lock().unwrap().push(candidate.suburb.clone());
            Ok(self
                .verdicts
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(EvaluationResult::accept))
        }
    }

    #[tokio::test]
    async fn test_tool_call_then_final_output() {
        let provider = Arc::new(ScriptedProvider::new([
            Completion::tool_calls(vec![call("call_1", "GetWeather", r#"{"location":"Carlton"}"#)]),
            Completion::text(FINAL),
        ]));
        let agent = Agent::<Forecast>::builder()
            .provider(provider.clone())
            .tools(weather_tools())
            .build()
            .unwrap();

        let invocation = agent.execute("Weather for Carlton").await.unwrap();
        assert_eq!(invocation.output, Forecast { suburb: "Carlton".into(), degrees_c: 21.5 });
        assert_eq!(invocation.model_calls, 2);

        let roles: Vec<Role> = invocation
            .conversation
            .messages()
            .iter()
            .map(|m| m.role.clone())
            .collect();
        assert_eq!(
            roles,
            vec![Role::System, Role::User, Role::Assistant, Role::Tool, Role::Assistant]
        );

        let tool_message = &invocation.conversation.messages()[3];
        assert_eq!(tool_message.content, "21.5");
        assert_eq!(tool_message.tool_call_id.as_deref(), Some("call_1"));

        // the second call saw the first turn and its tool result
        let requests = provider.requests();
        assert_eq!(requests[1].messages.len(), 4);
        assert!(requests[1].messages[2].has_tool_calls());
    }

    #[tokio::test]
    async fn test_request_carries_tools_and_schema() {
        let provider = Arc::new(ScriptedProvider::new([Completion::text(FINAL)]));
        let agent = Agent::<Forecast>::builder()
            .provider(provider.clone())
            .tools(weather_tools())
            .system_prompt("Find the weather")
            .build()
            .unwrap();

        agent.invoke("Weather for Carlton").await.unwrap();

        let request = &provider.requests()[0];
        assert_eq!(request.messages[0].content, "Find the weather");
        assert_eq!(request.messages[1].content, "Weather for Carlton");
        assert_eq!(request.options.tools.len(), 1);
        assert_eq!(request.options.tools[0].name, "GetWeather");
        assert!(matches!(
            request.options.response_format,
            ResponseFormat::JsonSchema { ref name, strict: true, .. } if name == "Forecast"
        ));
    }

    #[tokio::test]
    async fn test_schema_violation_is_fatal() {
        let provider = Arc::new(ScriptedProvider::new([
            Completion::text(r#"{"suburb": "Carlton", "degrees_c": 21.5, "humidity": 40}"#),
            Completion::text(FINAL),
        ]));
        let agent = Agent::<Forecast>::builder()
            .provider(provider.clone())
            .build()
            .unwrap();

        let err = agent.invoke("Weather for Carlton").await.unwrap_err();
        match err.root() {
            AgentError::SchemaViolation { payload, .. } => assert!(payload.contains("humidity")),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(provider.calls(), 1);
        assert_eq!(err.last_exchange().len(), 1);
        assert!(err.last_exchange()[0].content.contains("humidity"));
    }

    #[tokio::test]
    async fn test_rejection_drives_another_iteration() {
        let provider = Arc::new(ScriptedProvider::new([
            Completion::text(r#"{"suburb": "Melbourne", "degrees_c": 19.0}"#),
            Completion::text(FINAL),
        ]));
        let judge = Arc::new(ScriptedJudge::new(vec![
            EvaluationResult::reject("Do not use the word 'Melbourne'"),
            EvaluationResult::accept(),
        ]));
        let agent = Agent::<Forecast>::builder()
            .provider(provider.clone())
            .evaluator(judge.clone())
            .build()
            .unwrap();

        let invocation = agent.execute("Weather near Melbourne").await.unwrap();
        assert_eq!(invocation.output.suburb, "Carlton");
        assert_eq!(provider.calls(), 2);
        assert_eq!(invocation.rejections, vec!["Do not use the word 'Melbourne'".to_string()]);
        assert_eq!(*judge.seen.lock().unwrap(), vec!["Melbourne", "Carlton"]);

        let second_request = &provider.requests()[1].messages;
        let correction = second_request.last().unwrap();
        assert_eq!(correction.role, Role::Assistant);
        assert_eq!(
            correction.content,
            format!("{}Do not use the word 'Melbourne'", CORRECTION_PREFIX)
        );
    }

    #[tokio::test]
    async fn test_unknown_tool_keeps_loop_alive() {
        let provider = Arc::new(ScriptedProvider::new([
            Completion::tool_calls(vec![call("call_1", "GetTide", "{}")]),
            Completion::text(FINAL),
        ]));
        let agent = Agent::<Forecast>::builder()
            .provider(provider.clone())
            .tools(weather_tools())
            .build()
            .unwrap();

        let invocation = agent.execute("Weather for Carlton").await.unwrap();
        assert_eq!(invocation.conversation.messages()[3].content, "Tool GetTide not found");
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_parallel_results_keep_call_order() {
        let mut tools = ToolRegistry::new();
        tools
            .register_async("GetWeather", |input: Location| async move {
                let delay = if input.location == "Slow" { 50 } else { 0 };
                tokio::time::sleep(Duration::from_millis(delay)).await;
                Ok::<_, anyhow::Error>(format!("{}: 20 C", input.location))
            })
            .unwrap();

        let provider = Arc::new(ScriptedProvider::new([
            Completion::tool_calls(vec![
                call("call_a", "GetWeather", r#"{"location":"Slow"}"#),
                call("call_b", "GetWeather", r#"{"location":"Fast"}"#),
            ]),
            Completion::text(FINAL),
        ]));
        let agent = Agent::<Forecast>::builder()
            .provider(provider)
            .tools(tools)
            .build()
            .unwrap();

        let invocation = agent.execute("Weather").await.unwrap();
        let tool_messages: Vec<(&str, &str)> = invocation
            .conversation
            .messages()
            .iter()
            .filter(|m| m.role == Role::Tool)
            .map(|m| (m.tool_call_id.as_deref().unwrap(), m.content.as_str()))
            .collect();
        assert_eq!(
            tool_messages,
            vec![("call_a", "Slow: 20 C"), ("call_b", "Fast: 20 C")]
        );
    }

    #[tokio::test]
    async fn test_tool_argument_error_is_fatal() {
        let provider = Arc::new(ScriptedProvider::new([
            Completion::tool_calls(vec![call("call_1", "GetWeather", r#"{"city":"Carlton"}"#)]),
            Completion::text(FINAL),
        ]));
        let agent = Agent::<Forecast>::builder()
            .provider(provider.clone())
            .tools(weather_tools())
            .build()
            .unwrap();

        let err = agent.invoke("Weather").await.unwrap_err();
        assert!(matches!(err.root(), AgentError::ToolArgument { .. }));
        assert_eq!(provider.calls(), 1);
        assert!(err.last_exchange()[0].has_tool_calls());
    }

    #[tokio::test]
    async fn test_max_iterations_bounds_rejections() {
        let provider = Arc::new(ScriptedProvider::new([
            Completion::text(r#"{"suburb": "First", "degrees_c": 20.0}"#),
            Completion::text(r#"{"suburb": "Second", "degrees_c": 20.0}"#),
            Completion::text(r#"{"suburb": "Third", "degrees_c": 20.0}"#),
            Completion::text(FINAL),
        ]));
        let judge = Arc::new(ScriptedJudge::new(vec![
            EvaluationResult::reject("no"),
            EvaluationResult::reject("no"),
            EvaluationResult::reject("no"),
            EvaluationResult::reject("no"),
        ]));
        let agent = Agent::<Forecast>::builder()
            .provider(provider.clone())
            .evaluator(judge)
            .max_iterations(3)
            .build()
            .unwrap();

        let err = agent.invoke("Weather").await.unwrap_err();
        assert!(matches!(err.root(), AgentError::MaxIterations(3)));
        assert_eq!(provider.calls(), 3);

        // the rejected candidate stays in the exchange, ahead of its correction
        let exchange = err.last_exchange();
        assert_eq!(exchange.len(), 2);
        assert_eq!(exchange[0].role, Role::Assistant);
        assert!(exchange[0].content.contains("Third"));
        assert_eq!(exchange[1].content, format!("{}no", CORRECTION_PREFIX));
    }

    #[tokio::test]
    async fn test_time_budget() {
        let mut tools = ToolRegistry::new();
        tools
            .register_async("GetWeather", |_: Location| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok::<_, anyhow::Error>(20)
            })
            .unwrap();
        let provider = Arc::new(ScriptedProvider::new([Completion::tool_calls(vec![call(
            "call_1",
            "GetWeather",
            r#"{"location":"Carlton"}"#,
        )])]));
        let agent = Agent::<Forecast>::builder()
            .provider(provider)
            .tools(tools)
            .time_budget(Duration::from_millis(20))
            .build()
            .unwrap();

        let err = agent.invoke("Weather").await.unwrap_err();
        assert!(matches!(err.root(), AgentError::Timeout(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_transport_error_surfaces() {
        let provider = Arc::new(ScriptedProvider::default());
        provider.push_error(AgentError::Transport("connection refused".into()));
        let agent = Agent::<Forecast>::builder()
            .provider(provider)
            .build()
            .unwrap();

        let err = agent.invoke("Weather").await.unwrap_err();
        assert!(matches!(err.root(), AgentError::Transport(_)));
    }

    #[tokio::test]
    async fn test_escalation_suspends_until_answered() {
        let mut tools = weather_tools();
        tools.register_escalation("AskOperator").unwrap();
        let (operator, mut questions) = ChannelOperator::new(1);

        let provider = Arc::new(ScriptedProvider::new([
            Completion::tool_calls(vec![call("call_q", "AskOperator", r#"{"question":"Which town?"}"#)]),
            Completion::text(FINAL),
        ]));
        let agent = Agent::<Forecast>::builder()
            .provider(provider)
            .tools(tools)
            .operator(Arc::new(operator))
            .build()
            .unwrap();

        tokio::spawn(async move {
            if let Some(pending) = questions.recv().await {
                pending.answer("Carlton").unwrap();
            }
        });

        let invocation = agent.execute("Weather for my home town").await.unwrap();
        let answer = &invocation.conversation.messages()[3];
        assert_eq!(answer.role, Role::Tool);
        assert_eq!(answer.tool_call_id.as_deref(), Some("call_q"));
        assert_eq!(answer.content, "Carlton");
    }

    #[test]
    fn test_build_requires_operator_for_escalation() {
        let mut tools = ToolRegistry::new();
        tools.register_escalation("AskOperator").unwrap();

        let result = Agent::<Forecast>::builder()
            .provider(Arc::new(ScriptedProvider::default()))
            .tools(tools)
            .build();
        assert!(matches!(result, Err(AgentError::Config(_))));
    }

    #[test]
    fn test_build_requires_provider() {
        assert!(matches!(
            Agent::<Forecast>::builder().build(),
            Err(AgentError::Config(_))
        ));
    }

    #[test]
    fn test_build_rejects_zero_time_budget() {
        let result = Agent::<Forecast>::builder()
            .provider(Arc::new(ScriptedProvider::default()))
            .time_budget(Duration::ZERO)
            .build();
        assert!(matches!(result, Err(AgentError::Config(_))));
    }

    #[test]
    fn test_missing_call_ids_are_assigned() {
        let calls = assign_call_ids(vec![call("", "GetWeather", "{}"), call("keep", "GetWeather", "{}")]);
        assert!(calls[0].id.starts_with("call_"));
        assert_eq!(calls[1].id, "keep");
    }
}
