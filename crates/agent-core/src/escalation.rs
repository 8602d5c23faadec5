//! Human Escalation
//!
//! Some tool calls are questions for a person rather than computations. The
//! agent loop hands those to an `Operator` and suspends at that await point
//! until an answer arrives; the answer becomes the tool message for the call.
//!
//! `ChannelOperator` is a pending-question channel: questions are pushed onto
//! an mpsc queue and each carries a oneshot reply slot, so a console prompt,
//! a web handler or a ticket queue can answer without the core blocking.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use crate::error::{AgentError, Result};
use crate::schema::{ObjectShape, Shape, Shaped};

/// Arguments of an escalation tool call
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationRequest {
    pub question: String,
}

impl Shaped for EscalationRequest {
    fn shape() -> Shape {
        ObjectShape::new("EscalationRequest")
            .describe("Ask a question if something is unclear or missing")
            .described_field("question", Shape::String, "The question for the operator")
            .build()
    }
}

/// Answers questions the model escalates
#[async_trait]
pub trait Operator: Send + Sync {
    /// Answer `question`, asked by tool call `call_id`
    async fn ask(&self, call_id: &str, question: &str) -> Result<String>;
}

/// A question waiting for an answer
#[derive(Debug)]
pub struct PendingQuestion {
    /// Tool call that asked
    pub call_id: String,

    pub question: String,

    reply: oneshot::Sender<String>,
}

impl PendingQuestion {
    /// Resume the waiting invocation with `answer`
    pub fn answer(self, answer: impl Into<String>) -> Result<()> {
        self.reply
            .send(answer.into())
            .map_err(|_| AgentError::Escalation(format!("invocation waiting on {} is gone", self.call_id)))
    }
}

/// Operator backed by a pending-question channel
#[derive(Clone)]
pub struct ChannelOperator {
    questions: mpsc::Sender<PendingQuestion>,
}

impl ChannelOperator {
    /// Create an operator and the receiver its questions arrive on
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<PendingQuestion>) {
        let (questions, receiver) = mpsc::channel(buffer);
        (Self { questions }, receiver)
    }
}

#[async_trait]
impl Operator for ChannelOperator {
    async fn ask(&self, call_id: &str, question: &str) -> Result<String> {
        let (reply, answer) = oneshot::channel();

        self.questions
            .send(PendingQuestion {
                call_id: call_id.to_string(),
                question: question.to_string(),
                reply,
            })
            .await
            .map_err(|_| AgentError::Escalation("no one is listening for questions".into()))?;

        tracing::info!(call_id, "Waiting for operator answer");
        answer
            .await
            .map_err(|_| AgentError::Escalation(format!("question {} was dropped unanswered", call_id)))
    }
}
