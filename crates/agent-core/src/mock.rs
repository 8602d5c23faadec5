//! Scripted provider for tests and offline demos

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AgentError, Result};
use crate::message::Message;
use crate::provider::{Completion, GenerationOptions, LlmProvider};

/// A request the scripted provider received
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub messages: Vec<Message>,
    pub options: GenerationOptions,
}

/// A provider that returns pre-configured responses in order and records
/// every request it receives. Running past the script is a transport error.
#[derive(Default)]
pub struct ScriptedProvider {
    responses: Mutex<VecDeque<Result<Completion>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedProvider {
    /// Create a provider with a sequence of responses
    pub fn new(responses: impl IntoIterator<Item = Completion>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(Ok).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue another response
    pub fn push(&self, response: Completion) {
        self.lock_responses().push_back(Ok(response));
    }

    /// Queue a failure
    pub fn push_error(&self, error: AgentError) {
        self.lock_responses().push_back(Err(error));
    }

    /// Number of `complete` calls so far
    pub fn calls(&self) -> usize {
        self.requests().len()
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<Completion>>> {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(RecordedRequest {
                messages: messages.to_vec(),
                options: options.clone(),
            });

        let mut completion = self
            .lock_responses()
            .pop_front()
            .unwrap_or_else(|| Err(AgentError::Transport("script exhausted".into())))?;

        if completion.model.is_empty() {
            completion.model = options.model.clone();
        }
        Ok(completion)
    }
}
