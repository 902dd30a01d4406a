// Chat session - append-only transcript of request/response turns
use crate::application::dashboard_api::FetchError;
use crate::domain::chat::{ChatReply, ChatTurn, Role};

pub const CHAT_FALLBACK_MESSAGE: &str = "Sorry, I ran into a technical error.";

#[derive(Debug, Default, Clone)]
pub struct ChatSession {
    transcript: Vec<ChatTurn>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    /// Records the user turn and returns the query to send, or `None` when
    /// the input is blank and nothing should happen.
    pub fn begin(&mut self, input: &str) -> Option<(String, &ChatTurn)> {
        let query = input.trim();
        if query.is_empty() {
            return None;
        }
        let turn = self.push(ChatTurn::new(Role::User, query));
        Some((query.to_string(), turn))
    }

    /// Appends exactly one assistant turn for the outcome of a request.
    pub fn complete(&mut self, outcome: Result<ChatReply, FetchError>) -> &ChatTurn {
        let text = match outcome {
            Ok(reply) => {
                if let Some(thought) = &reply.thought {
                    tracing::debug!(thought = %thought, "assistant reasoning");
                }
                reply.response
            }
            Err(e) => {
                tracing::error!("Chat error: {}", e);
                CHAT_FALLBACK_MESSAGE.to_string()
            }
        };
        self.push(ChatTurn::new(Role::Assistant, text))
    }

    fn push(&mut self, turn: ChatTurn) -> &ChatTurn {
        self.transcript.push(turn);
        &self.transcript[self.transcript.len() - 1]
    }
}
