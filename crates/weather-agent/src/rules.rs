//! Suburb Rules
//!
//! The evaluator's rule set for weather reports.

use std::sync::Arc;

use agent_core::evaluator::ModelEvaluator;
use agent_core::provider::{GenerationOptions, LlmProvider};

/// Rules the evaluator checks every report against
pub const SUBURB_RULES: &str = r#"You are an AI agent that evaluates a provided response.
Evaluate the following rules:
- Each suburb name should be a single word
- The response should contain at least 3 suburbs
- The response should contain at most 15 suburbs
- The response should not contain the word 'Melbourne'

If the response meets the criteria, return is_correct = true,
otherwise return is_correct = false with a reason why and a recommended fix."#;

/// Model-backed evaluator enforcing `SUBURB_RULES`
pub fn suburb_evaluator(provider: Arc<dyn LlmProvider>, model: impl Into<String>) -> ModelEvaluator {
    ModelEvaluator::with_options(
        provider,
        SUBURB_RULES,
        GenerationOptions {
            model: model.into(),
            ..Default::default()
        },
    )
}
