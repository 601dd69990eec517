pub mod chunk;
pub mod chunker;
pub mod reader;
pub mod selection;

pub use chunk::Chunk;
pub use chunker::{Chunker, ChunkerConfig};
pub use reader::FileReader;
pub use selection::{select_chunks, DocSelection};

use anyhow::Result;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    pub chunking: ChunkerConfig,
    pub selection: DocSelection,
    pub limit: usize,
    pub seed: u64,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            chunking: ChunkerConfig::default(),
            selection: DocSelection::Random,
            limit: 15,
            seed: 86,
        }
    }
}

/// Chunk every document under `root` and pick the ones to tune with.
pub async fn load_docs(root: &Path, config: &LoadConfig) -> Result<Vec<String>> {
    let files = if root.is_file() {
        let content = FileReader::read_file(root).await?;
        vec![(root.to_string_lossy().to_string(), content)]
    } else {
        FileReader::read_directory(root).await?
    };

    if files.is_empty() {
        anyhow::bail!("No .txt or .md documents found under {:?}", root);
    }

    let chunker = Chunker::new(config.chunking.clone());
    let chunks: Vec<Chunk> = files
        .iter()
        .flat_map(|(path, content)| chunker.chunk_text(path, content))
        .collect();

    let total = chunks.len();
    let mut rng = StdRng::seed_from_u64(config.seed);
    let selected = select_chunks(chunks, config.selection, config.limit, &mut rng);

    debug!(
        files = files.len(),
        chunks = total,
        selected = selected.len(),
        method = ?config.selection,
        "Loaded prompt-tuning documents"
    );

    Ok(selected.into_iter().map(|chunk| chunk.text).collect())
}
