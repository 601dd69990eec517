pub mod error;
pub mod generator;
pub mod llm;
pub mod prompt;

pub use error::PromptTuneError;
pub use generator::community_report_summarization::{
    create_community_summarization_prompt, COMMUNITY_SUMMARIZATION_FILENAME,
};
pub use generator::community_reporter::{generate_community_reporter_examples, CommunityReporterExamples};
pub use generator::entity_relationship::{build_entity_relationship_prompts, generate_entity_relationship_examples};
pub use generator::parser::{parse_entity_relationship_examples, parse_records, ParsedExample};
pub use generator::{Docs, EntityTypes, MAX_EXAMPLES};
pub use llm::{ChatMessage, ChatModel, ChatResponse, ChatRole, OllamaChat};
