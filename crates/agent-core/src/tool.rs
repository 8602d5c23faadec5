//! Tool System
//!
//! Typed tool registry. Each tool is registered once with a handler whose
//! input type describes its own shape; the registry derives the parameter
//! schema from that shape, decodes model-supplied arguments against it, runs
//! the handler and renders the result as text for the model.
//!
//! The registry is built up front and then shared read-only
//! (`Arc<ToolRegistry>`), so concurrent `invoke` calls need no locking.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AgentError, Result};
use crate::escalation::EscalationRequest;
use crate::schema::{json_schema, Shape, Shaped};

/// Tool definition advertised to the model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Unique tool identifier
    pub name: String,

    /// Human-readable description (shown to LLM)
    pub description: String,

    /// JSON Schema of the arguments object
    pub parameters: Value,

    /// Whether the model must match the schema exactly
    pub strict: bool,
}

/// What invoking a tool produced
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ToolOutput {
    /// Text to send back as the tool message
    Text(String),

    /// The tool asks a human; the question needs an external answer
    Escalate(String),
}

impl ToolOutput {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ToolOutput::Text(text) => Some(text),
            ToolOutput::Escalate(_) => None,
        }
    }
}

/// Decodes arguments, then runs the typed handler
type ErasedHandler = Arc<
    dyn Fn(Value) -> std::result::Result<BoxFuture<'static, anyhow::Result<Value>>, serde_json::Error>
        + Send
        + Sync,
>;

/// Handler variants, resolved at registration
#[derive(Clone)]
enum ToolHandler {
    Function(ErasedHandler),
    Escalation,
}

struct RegisteredTool {
    descriptor: ToolDescriptor,
    input: Shape,
    handler: ToolHandler,
}

/// Registry for available tools
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a synchronous tool with a strict schema
    pub fn register<T, V, F>(&mut self, name: impl Into<String>, handler: F) -> Result<ToolDescriptor>
    where
        T: Shaped + DeserializeOwned + 'static,
        V: Serialize + 'static,
        F: Fn(T) -> V + Send + Sync + 'static,
    {
        self.register_with(name, true, handler)
    }

    /// Register a synchronous tool, choosing schema strictness
    pub fn register_with<T, V, F>(
        &mut self,
        name: impl Into<String>,
        strict: bool,
        handler: F,
    ) -> Result<ToolDescriptor>
    where
        T: Shaped + DeserializeOwned + 'static,
        V: Serialize + 'static,
        F: Fn(T) -> V + Send + Sync + 'static,
    {
        let erased: ErasedHandler = Arc::new(move |args| {
            let input: T = serde_json::from_value(args)?;
            let output = serde_json::to_value(handler(input)).map_err(anyhow::Error::from);
            Ok(future::ready(output).boxed())
        });
        self.insert(name.into(), T::shape(), strict, ToolHandler::Function(erased))
    }

    /// Register an asynchronous, fallible tool with a strict schema
    pub fn register_async<T, V, F, Fut>(
        &mut self,
        name: impl Into<String>,
        handler: F,
    ) -> Result<ToolDescriptor>
    where
        T: Shaped + DeserializeOwned + 'static,
        V: Serialize + 'static,
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
    {
        let erased: ErasedHandler = Arc::new(move |args| {
            let input: T = serde_json::from_value(args)?;
            let pending = handler(input);
            Ok(async move {
                let output = pending.await?;
                Ok(serde_json::to_value(output)?)
            }
            .boxed())
        });
        self.insert(name.into(), T::shape(), true, ToolHandler::Function(erased))
    }

    /// Register a tool the model calls to ask a human a question
    pub fn register_escalation(&mut self, name: impl Into<String>) -> Result<ToolDescriptor> {
        self.insert(name.into(), EscalationRequest::shape(), true, ToolHandler::Escalation)
    }

    fn insert(
        &mut self,
        name: String,
        input: Shape,
        strict: bool,
        handler: ToolHandler,
    ) -> Result<ToolDescriptor> {
        if self.index.contains_key(&name) {
            return Err(AgentError::DuplicateTool(name));
        }

        let descriptor = ToolDescriptor {
            description: input.description().unwrap_or(&name).to_string(),
            parameters: json_schema(&input),
            name: name.clone(),
            strict,
        };

        tracing::debug!(tool = %name, strict, "Registered tool");
        self.index.insert(name, self.tools.len());
        self.tools.push(RegisteredTool {
            descriptor: descriptor.clone(),
            input,
            handler,
        });

        Ok(descriptor)
    }

    fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    /// Invoke a tool by name with raw JSON arguments.
    ///
    /// An unknown name is not an error: the diagnostic goes back to the model
    /// as tool output so it can correct itself.
    pub async fn invoke(&self, name: &str, arguments: &str) -> Result<ToolOutput> {
        let Some(tool) = self.get(name) else {
            tracing::warn!(tool = %name, "Model called an unregistered tool");
            return Ok(ToolOutput::Text(format!("Tool {} not found", name)));
        };

        let argument_error = |message: String| AgentError::ToolArgument {
            tool: name.to_string(),
            message,
        };

        let arguments = if arguments.trim().is_empty() { "{}" } else { arguments };
        let args: Value = serde_json::from_str(arguments).map_err(|e| argument_error(e.to_string()))?;
        if tool.descriptor.strict {
            tool.input
                .validate(&args)
                .map_err(|violation| argument_error(violation.to_string()))?;
        }

        match &tool.handler {
            ToolHandler::Function(handler) => {
                let pending = handler(args).map_err(|e| argument_error(e.to_string()))?;
                let output = pending.await.map_err(|e| AgentError::ToolExecution {
                    tool: name.to_string(),
                    message: e.to_string(),
                })?;
                Ok(ToolOutput::Text(render_output(output)))
            }
            ToolHandler::Escalation => {
                let request: EscalationRequest =
                    serde_json::from_value(args).map_err(|e| argument_error(e.to_string()))?;
                Ok(ToolOutput::Escalate(request.question))
            }
        }
    }

    /// Descriptors in registration order
    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor.clone()).collect()
    }

    /// Get a tool's descriptor
    pub fn descriptor(&self, name: &str) -> Option<&ToolDescriptor> {
        self.get(name).map(|t| &t.descriptor)
    }

    /// Whether any registered tool escalates to a human
    pub fn has_escalation(&self) -> bool {
        self.tools
            .iter()
            .any(|t| matches!(t.handler, ToolHandler::Escalation))
    }

    /// Get tool names
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.descriptor.name.as_str()).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Scalars go back as plain text, records and lists as JSON.
pub fn render_output(output: Value) -> String {
    match output {
        Value::Null => String::new(),
        Value::String(text) => text,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        structured @ (Value::Array(_) | Value::Object(_)) => structured.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ObjectShape;
    use serde_json::json;

    #[derive(Deserialize)]
    struct Location {
        location: String,
    }

    impl Shaped for Location {
        fn shape() -> Shape {
            ObjectShape::new("Location")
                .describe("Given the name of a location returns the weather")
                .described_field("location", Shape::String, "Location to get the weather for")
                .build()
        }
    }

    #[derive(Serialize)]
    struct Reading {
        location: String,
        degrees_c: f64,
    }

    fn registry() -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry
            .register("GetWeather", |_: Location| 21.5_f64)
            .unwrap();
        registry
            .register("GetReading", |input: Location| Reading {
                location: input.location,
                degrees_c: 18.0,
            })
            .unwrap();
        registry
    }

    #[test]
    fn test_descriptor_from_input_shape() {
        let registry = registry();
        let descriptor = registry.descriptor("GetWeather").unwrap();
        assert_eq!(descriptor.description, "Given the name of a location returns the weather");
        assert_eq!(descriptor.parameters["required"], json!(["location"]));
        assert_eq!(descriptor.parameters["additionalProperties"], json!(false));
        assert!(descriptor.strict);
        assert_eq!(registry.names(), vec!["GetWeather", "GetReading"]);
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = registry();
        let err = registry.register("GetWeather", |_: Location| 0).unwrap_err();
        assert!(matches!(err, AgentError::DuplicateTool(name) if name == "GetWeather"));
        assert_eq!(registry.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_tool_is_reported_as_output() {
        let output = registry().invoke("GetTide", "{}").await.unwrap();
        assert_eq!(output, ToolOutput::Text("Tool GetTide not found".into()));
    }

    #[tokio::test]
    async fn test_scalar_output_is_plain_text() {
        let output = registry()
            .invoke("GetWeather", r#"{"location":"Carlton"}"#)
            .await
            .unwrap();
        assert_eq!(output.as_text(), Some("21.5"));
    }

    #[tokio::test]
    async fn test_structured_output_is_json() {
        let output = registry()
            .invoke("GetReading", r#"{"location":"Carlton"}"#)
            .await
            .unwrap();
        let parsed: Value = serde_json::from_str(output.as_text().unwrap()).unwrap();
        assert_eq!(parsed, json!({"location": "Carlton", "degrees_c": 18.0}));
    }

    #[tokio::test]
    async fn test_malformed_arguments_fail() {
        let registry = registry();

        let err = registry.invoke("GetWeather", r#"{"place":"Carlton"}"#).await.unwrap_err();
        assert!(matches!(err, AgentError::ToolArgument { ref tool, .. } if tool == "GetWeather"));

        let err = registry.invoke("GetWeather", "not json").await.unwrap_err();
        assert!(matches!(err, AgentError::ToolArgument { .. }));
    }

    #[tokio::test]
    async fn test_async_handler_failure() {
        let mut registry = ToolRegistry::new();
        registry
            .register_async("Flaky", |input: Location| async move {
                anyhow::ensure!(input.location != "Nowhere", "no station near {}", input.location);
                Ok("ok".to_string())
            })
            .unwrap();

        let output = registry.invoke("Flaky", r#"{"location":"Carlton"}"#).await.unwrap();
        assert_eq!(output.as_text(), Some("ok"));

        let err = registry.invoke("Flaky", r#"{"location":"Nowhere"}"#).await.unwrap_err();
        match err {
            AgentError::ToolExecution { tool, message } => {
                assert_eq!(tool, "Flaky");
                assert!(message.contains("no station near Nowhere"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_escalation_returns_question() {
        let mut registry = ToolRegistry::new();
        registry.register_escalation("AskOperator").unwrap();
        assert!(registry.has_escalation());

        let output = registry
            .invoke("AskOperator", r#"{"question":"Which town?"}"#)
            .await
            .unwrap();
        assert_eq!(output, ToolOutput::Escalate("Which town?".into()));
    }

    #[test]
    fn test_render_output() {
        assert_eq!(render_output(json!("Carlton: 21 C")), "Carlton: 21 C");
        assert_eq!(render_output(json!(true)), "true");
        assert_eq!(render_output(Value::Null), "");
        assert_eq!(render_output(json!([1, 2])), "[1,2]");
    }
}
