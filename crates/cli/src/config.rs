use anyhow::{Context, Result};
use ingest::LoadConfig;
use prompt_tune::EntityTypes;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuneConfig {
    pub llm: LlmConfig,
    pub input: InputConfig,
    pub prompt: PromptConfig,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub root: PathBuf,
    #[serde(flatten)]
    pub load: LoadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    pub persona: String,
    pub community_reporter_role: String,
    pub report_rating_description: String,
    pub entity_types: Option<Vec<String>>,
    pub language: String,
    pub json_mode: bool,
}

impl Default for TuneConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            input: InputConfig::default(),
            prompt: PromptConfig::default(),
            output_dir: PathBuf::from("prompts"),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3".to_string(),
            request_timeout_secs: 120,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("input"),
            load: LoadConfig::default(),
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            persona: "You are an expert in building knowledge graphs. You are skilled at \
                identifying the communities in a body of text and the relations and \
                structure within them."
                .to_string(),
            community_reporter_role: "A community analyst who writes reports on the key \
                entities of a community and the relationships between them."
                .to_string(),
            report_rating_description: "A float score between 0-10 that represents the \
                relevance of the text to the communities it describes, with 1 being \
                trivial and 10 being highly significant."
                .to_string(),
            entity_types: None,
            language: "English".to_string(),
            json_mode: false,
        }
    }
}

impl TuneConfig {
    /// Load from a JSON file; missing fields take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {:?}", path))?;

        serde_json::from_str(&raw).context(format!("Failed to parse config file: {:?}", path))
    }
}

impl PromptConfig {
    pub fn entity_types(&self) -> Option<EntityTypes> {
        self.entity_types.clone().map(EntityTypes::from)
    }
}
