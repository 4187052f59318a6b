//! Session Chat Adapter: the floating career-coach assistant.
//!
//! The transcript is owned by the caller. `send` replays it in order as
//! history, adds the new utterance, and returns the assistant's reply; it
//! never appends to the transcript itself.

pub mod handlers;
pub mod prompts;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm_client::{Content, ModelRequest, ModelTransport, MODEL_FLASH};

const CHAT_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            text: text.into(),
        }
    }

    fn to_content(&self) -> Content {
        match self.role {
            ChatRole::User => Content::user(self.text.as_str()),
            ChatRole::Assistant => Content::model(self.text.as_str()),
        }
    }
}

/// Append-only chat history. Insertion order is chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript(Vec<ChatTurn>);

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: ChatTurn) {
        self.0.push(turn);
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<ChatTurn>> for Transcript {
    fn from(turns: Vec<ChatTurn>) -> Self {
        Self(turns)
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a ChatTurn;
    type IntoIter = std::slice::Iter<'a, ChatTurn>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Error)]
pub enum AssistantError {
    /// Every failure cause collapses into this one signal.
    #[error("assistant unavailable")]
    Unavailable,
}

#[derive(Clone)]
pub struct ChatAdapter {
    transport: Arc<dyn ModelTransport>,
}

impl ChatAdapter {
    pub fn new(transport: Arc<dyn ModelTransport>) -> Self {
        Self { transport }
    }

    /// History in order, then the new utterance as the final user turn.
    pub fn request_for(transcript: &Transcript, new_utterance: &str) -> ModelRequest {
        let contents = transcript
            .into_iter()
            .map(ChatTurn::to_content)
            .chain(std::iter::once(Content::user(new_utterance)))
            .collect();

        ModelRequest {
            model: MODEL_FLASH,
            system_instruction: prompts::assistant_system(),
            contents,
            response_schema: None,
            temperature: Some(CHAT_TEMPERATURE),
        }
    }

    pub async fn send(
        &self,
        transcript: &Transcript,
        new_utterance: &str,
    ) -> Result<String, AssistantError> {
        let request = Self::request_for(transcript, new_utterance);
        debug!("Sending chat turn with {} prior turns", transcript.len());

        match self.transport.generate(&request).await {
            Ok(reply) if !reply.trim().is_empty() => Ok(reply),
            Ok(_) => {
                warn!("Assistant returned an empty reply");
                Err(AssistantError::Unavailable)
            }
            Err(e) => {
                warn!("Assistant call failed: {e}");
                Err(AssistantError::Unavailable)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{Canned, RecordingTransport};

    #[test]
    fn test_transcript_keeps_insertion_order_and_duplicates() {
        let mut transcript = Transcript::new();
        transcript.push(ChatTurn::user("hi"));
        transcript.push(ChatTurn::assistant("hello"));
        transcript.push(ChatTurn::user("hi"));
        let texts: Vec<_> = transcript.into_iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["hi", "hello", "hi"]);
        assert_eq!(transcript.len(), 3);
    }

    #[test]
    fn test_turn_wire_shape() {
        let json = serde_json::to_value(ChatTurn::assistant("Sure")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "assistant", "text": "Sure"}));
        let transcript: Transcript =
            serde_json::from_str(r#"[{"role": "user", "text": "a"}]"#).unwrap();
        assert_eq!(transcript.turns(), &[ChatTurn::user("a")]);
    }

    #[test]
    fn test_request_maps_roles_and_appends_utterance() {
        let transcript = Transcript::from(vec![
            ChatTurn::assistant("Hi! How can I help?"),
            ChatTurn::user("How long should a summary be?"),
            ChatTurn::assistant("Two or three sentences."),
        ]);
        let request = ChatAdapter::request_for(&transcript, "Thanks!");
        let roles: Vec<_> = request.contents.iter().map(|c| c.role.as_str()).collect();
        assert_eq!(roles, vec!["model", "user", "model", "user"]);
        assert_eq!(request.contents[3].text(), "Thanks!");
        assert_eq!(request.model, MODEL_FLASH);
        assert_eq!(request.temperature, Some(CHAT_TEMPERATURE));
        assert!(request.response_schema.is_none());
        assert!(request.system_instruction.contains("ProAssistant"));
    }

    #[tokio::test]
    async fn test_round_trip_resubmits_prior_transcript_unmodified() {
        let transport = Arc::new(RecordingTransport::replying(&[
            "Lead with your strongest metric.",
            "Yes, keep it to one page.",
        ]));
        let adapter = ChatAdapter::new(transport.clone());
        let mut transcript = Transcript::new();

        let first = "How do I start my experience section?";
        let reply = adapter.send(&transcript, first).await.unwrap();
        assert_eq!(reply, "Lead with your strongest metric.");
        // The adapter never touches the transcript
        assert!(transcript.is_empty());

        transcript.push(ChatTurn::user(first));
        transcript.push(ChatTurn::assistant(reply));
        let before = transcript.clone();

        adapter.send(&transcript, "One page?").await.unwrap();
        assert_eq!(transcript, before);

        let requests = transport.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].contents, vec![Content::user(first)]);
        assert_eq!(
            requests[1].contents,
            vec![
                Content::user(first),
                Content::model("Lead with your strongest metric."),
                Content::user("One page?"),
            ]
        );
    }

    #[tokio::test]
    async fn test_transport_failure_is_unavailable() {
        let transport = Arc::new(RecordingTransport::new(vec![Canned::Status(429)]));
        let adapter = ChatAdapter::new(transport);
        let err = adapter.send(&Transcript::new(), "hello").await.unwrap_err();
        assert!(matches!(err, AssistantError::Unavailable));
    }

    #[tokio::test]
    async fn test_empty_reply_is_unavailable() {
        let transport = Arc::new(RecordingTransport::new(vec![
            Canned::Reply("   ".to_string()),
            Canned::Empty,
        ]));
        let adapter = ChatAdapter::new(transport);
        assert!(adapter.send(&Transcript::new(), "a").await.is_err());
        assert!(adapter.send(&Transcript::new(), "b").await.is_err());
    }
}
