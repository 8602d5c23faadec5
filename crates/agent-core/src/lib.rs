//! # agent-core
//!
//! Tool-using agent loop with strict structured output, a pluggable output
//! evaluator and human escalation.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                         Agent<T>                               │
//! │  ┌─────────────┐  ┌─────────────┐  ┌───────────────────────┐  │
//! │  │    Agent    │  │    Tool     │  │     LlmProvider       │  │
//! │  │    Loop     │──│  Registry   │──│     (Strategy)        │  │
//! │  └─────────────┘  └─────────────┘  └───────────────────────┘  │
//! │         │                │                                     │
//! │  ┌─────────────┐  ┌─────────────┐  ┌───────────────────────┐  │
//! │  │  Evaluate   │  │  Operator   │  │   Shape / Schema      │  │
//! │  │   (judge)   │  │ (escalation)│  │   (strict output)     │  │
//! │  └─────────────┘  └─────────────┘  └───────────────────────┘  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait keeps the loop independent of the model backend;
//! `mock::ScriptedProvider` drives it in tests without a network.

pub mod error;
pub mod escalation;
pub mod evaluator;
pub mod message;
pub mod mock;
pub mod provider;
pub mod reasoning;
pub mod schema;
pub mod tool;

pub use error::{AgentError, Result};
pub use escalation::{ChannelOperator, EscalationRequest, Operator, PendingQuestion};
pub use evaluator::{Evaluate, EvaluationResult, ModelEvaluator};
pub use message::{Conversation, Message, Role, ToolCallRequest};
pub use provider::{Completion, GenerationOptions, LlmProvider, ResponseFormat, ToolChoice};
pub use reasoning::{Agent, AgentBuilder, AgentConfig, Invocation};
pub use schema::{check_shape, Field, ObjectShape, Shape, Shaped};
pub use tool::{ToolDescriptor, ToolOutput, ToolRegistry};
