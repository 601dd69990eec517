use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

use crate::chunk::Chunk;

/// How chunks are picked to become prompt-tuning documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocSelection {
    /// Every chunk, in source order.
    All,
    /// The first `limit` chunks.
    Top,
    /// `limit` chunks sampled without replacement, kept in source order.
    Random,
}

impl std::str::FromStr for DocSelection {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(DocSelection::All),
            "top" => Ok(DocSelection::Top),
            "random" => Ok(DocSelection::Random),
            other => anyhow::bail!("Unknown selection method: {}", other),
        }
    }
}

pub fn select_chunks<R>(chunks: Vec<Chunk>, method: DocSelection, limit: usize, rng: &mut R) -> Vec<Chunk>
where
    R: Rng + ?Sized,
{
    match method {
        DocSelection::All => chunks,
        DocSelection::Top => chunks.into_iter().take(limit).collect(),
        DocSelection::Random => {
            if limit >= chunks.len() {
                return chunks;
            }

            let mut picked = index::sample(rng, chunks.len(), limit).into_vec();
            picked.sort_unstable();

            let mut chunks: Vec<Option<Chunk>> = chunks.into_iter().map(Some).collect();
            picked.into_iter().filter_map(|i| chunks[i].take()).collect()
        }
    }
}
