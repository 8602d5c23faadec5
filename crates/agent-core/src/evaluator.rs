//! Output Evaluation
//!
//! An evaluator judges one candidate output at a time and never sees the
//! agent's conversation. `ModelEvaluator` asks a model to check the candidate
//! against a fixed rule set, with its own strict response schema.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::message::Message;
use crate::provider::{GenerationOptions, LlmProvider, ResponseFormat, ToolChoice};
use crate::schema::{decode_structured, ObjectShape, Shape, Shaped};

/// Verdict on a candidate output
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub is_correct: bool,

    /// Reason and recommended fix when `is_correct` is false
    pub errors: String,
}

impl EvaluationResult {
    pub fn accept() -> Self {
        Self {
            is_correct: true,
            errors: String::new(),
        }
    }

    pub fn reject(errors: impl Into<String>) -> Self {
        Self {
            is_correct: false,
            errors: errors.into(),
        }
    }
}

impl Shaped for EvaluationResult {
    fn shape() -> Shape {
        ObjectShape::new("EvaluationResult")
            .describe("Verdict on whether a response follows the rules")
            .described_field(
                "is_correct",
                Shape::Boolean,
                "Set to true if the provided input contains no errors",
            )
            .described_field(
                "errors",
                Shape::String,
                "If is_correct is false, this should contain the reason why",
            )
            .build()
    }
}

/// Judges candidate outputs of type `T`
#[async_trait]
pub trait Evaluate<T>: Send + Sync {
    async fn evaluate(&self, candidate: &T) -> Result<EvaluationResult>;
}

const MISSING_REASON: &str = "The output was rejected without a reason; re-check it against the task instructions.";

/// Model-backed evaluator with a fixed rule set
pub struct ModelEvaluator {
    provider: Arc<dyn LlmProvider>,
    rules: String,
    options: GenerationOptions,
}

impl ModelEvaluator {
    /// Create an evaluator; `rules` becomes its system prompt
    pub fn new(provider: Arc<dyn LlmProvider>, rules: impl Into<String>) -> Self {
        Self::with_options(provider, rules, GenerationOptions::default())
    }

    /// Create with custom generation options. The response format and tool
    /// settings are always overridden.
    pub fn with_options(
        provider: Arc<dyn LlmProvider>,
        rules: impl Into<String>,
        generation: GenerationOptions,
    ) -> Self {
        let options = GenerationOptions {
            response_format: ResponseFormat::json_schema::<EvaluationResult>(true),
            tools: Vec::new(),
            tool_choice: ToolChoice::None,
            ..generation
        };

        Self {
            provider,
            rules: rules.into(),
            options,
        }
    }

    pub fn rules(&self) -> &str {
        &self.rules
    }

    /// Evaluate a candidate already serialized as JSON
    pub async fn evaluate_json(&self, candidate: String) -> Result<EvaluationResult> {
        let messages = [Message::system(&self.rules), Message::user(candidate)];
        let completion = self.provider.complete(&messages, &self.options).await?;

        let mut verdict: EvaluationResult = decode_structured(&completion.content)?;
        if !verdict.is_correct && verdict.errors.trim().is_empty() {
            tracing::warn!("Evaluator rejected without a reason");
            verdict.errors = MISSING_REASON.into();
        }

        tracing::debug!(is_correct = verdict.is_correct, errors = %verdict.errors, "Evaluation result");
        Ok(verdict)
    }
}

#[async_trait]
impl<T: Serialize + Sync> Evaluate<T> for ModelEvaluator {
    async fn evaluate(&self, candidate: &T) -> Result<EvaluationResult> {
        let payload = serde_json::to_string(candidate)?;
        self.evaluate_json(payload).await
    }
}
