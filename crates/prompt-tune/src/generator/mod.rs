pub mod community_report_summarization;
pub mod community_reporter;
pub mod entity_relationship;
pub mod parser;

use anyhow::Result;
use futures::future::try_join_all;
use tracing::debug;

use crate::llm::{ChatMessage, ChatModel};

/// Upper bound on the prompts sent per generation batch.
pub const MAX_EXAMPLES: usize = 5;

/// Input documents: a single text or a list of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Docs {
    One(String),
    Many(Vec<String>),
}

impl Docs {
    pub fn as_slice(&self) -> &[String] {
        match self {
            Docs::One(doc) => std::slice::from_ref(doc),
            Docs::Many(docs) => docs,
        }
    }
}

impl From<String> for Docs {
    fn from(doc: String) -> Self {
        Docs::One(doc)
    }
}

impl From<&str> for Docs {
    fn from(doc: &str) -> Self {
        Docs::One(doc.to_string())
    }
}

impl From<Vec<String>> for Docs {
    fn from(docs: Vec<String>) -> Self {
        Docs::Many(docs)
    }
}

/// Entity types to extract, either preformatted or as a list of names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityTypes {
    One(String),
    Many(Vec<String>),
}

impl EntityTypes {
    pub fn is_empty(&self) -> bool {
        match self {
            EntityTypes::One(types) => types.is_empty(),
            EntityTypes::Many(types) => types.is_empty(),
        }
    }

    /// Comma-joined form used inside prompts.
    pub fn joined(&self) -> String {
        match self {
            EntityTypes::One(types) => types.clone(),
            EntityTypes::Many(types) => types.join(", "),
        }
    }
}

impl From<String> for EntityTypes {
    fn from(types: String) -> Self {
        EntityTypes::One(types)
    }
}

impl From<&str> for EntityTypes {
    fn from(types: &str) -> Self {
        EntityTypes::One(types.to_string())
    }
}

impl From<Vec<String>> for EntityTypes {
    fn from(types: Vec<String>) -> Self {
        EntityTypes::Many(types)
    }
}

/// Send every message with the same history and wait for all of them.
///
/// Calls are issued together and joined once; the first failure fails the
/// whole batch. Answers come back in message order.
pub(crate) async fn chat_all<M>(
    model: &M,
    messages: &[String],
    history: &[ChatMessage],
    json: bool,
) -> Result<Vec<String>>
where
    M: ChatModel + ?Sized,
{
    debug!(prompts = messages.len(), json, "Dispatching prompt batch");

    let tasks = messages
        .iter()
        .map(|message| model.chat(message, history, json));

    let responses = try_join_all(tasks).await?;

    Ok(responses
        .into_iter()
        .map(|response| response.output.content)
        .collect())
}

#[cfg(test)]
pub(crate) mod testing {
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::llm::{ChatMessage, ChatModel, ChatResponse};

    #[derive(Debug, Clone)]
    pub struct RecordedCall {
        pub message: String,
        pub history: Vec<ChatMessage>,
        pub json: bool,
    }

    /// Replies `reply:<message>`; fails on messages containing `fail_on`.
    /// Earlier messages sleep longer so completion order is reversed.
    #[derive(Default)]
    pub struct EchoModel {
        pub calls: Mutex<Vec<RecordedCall>>,
        pub fail_on: Option<String>,
    }

    impl EchoModel {
        pub fn failing_on(marker: &str) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on: Some(marker.to_string()),
            }
        }

        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatModel for EchoModel {
        async fn chat(&self, message: &str, history: &[ChatMessage], json: bool) -> Result<ChatResponse> {
            let position = {
                let mut calls = self.calls.lock().unwrap();
                calls.push(RecordedCall {
                    message: message.to_string(),
                    history: history.to_vec(),
                    json,
                });
                calls.len()
            };

            tokio::time::sleep(Duration::from_millis(50u64.saturating_sub(position as u64 * 10))).await;

            if let Some(marker) = &self.fail_on {
                if message.contains(marker.as_str()) {
                    anyhow::bail!("model unavailable");
                }
            }

            Ok(ChatResponse::new(format!("reply:{}", message)))
        }
    }
}
