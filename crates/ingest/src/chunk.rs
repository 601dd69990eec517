use serde::{Deserialize, Serialize};

/// A slice of an input document used as one prompt-tuning sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub source: String,
    pub text: String,
}

impl Chunk {
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
        }
    }

    /// Estimate token count (rough: 1.3 tokens per word)
    pub fn estimated_tokens(&self) -> usize {
        estimate_tokens(&self.text)
    }
}

pub(crate) fn estimate_tokens(text: &str) -> usize {
    let word_count = text.split_whitespace().count();
    (word_count as f64 * 1.3) as usize
}
