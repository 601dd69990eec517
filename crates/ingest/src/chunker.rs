use serde::{Deserialize, Serialize};

use crate::chunk::{estimate_tokens, Chunk};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    pub max_tokens: usize,
    pub overlap_tokens: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_tokens: 200,
            overlap_tokens: 0,
        }
    }
}

pub struct Chunker {
    config: ChunkerConfig,
}

impl Chunker {
    pub fn new(config: ChunkerConfig) -> Self {
        Self { config }
    }

    /// Split a document into chunks of at most `max_tokens` estimated tokens.
    ///
    /// Markdown headings start a new section; sections that are too large are
    /// packed paragraph by paragraph, and paragraphs that are still too large
    /// are cut into word windows. Consecutive chunks of one section share
    /// `overlap_tokens` worth of trailing words.
    pub fn chunk_text(&self, source: &str, text: &str) -> Vec<Chunk> {
        let mut chunks = Vec::new();

        for section in self.split_by_headings(text) {
            if section.trim().is_empty() {
                continue;
            }

            if estimate_tokens(&section) <= self.config.max_tokens {
                chunks.push(Chunk::new(source, section.trim()));
                continue;
            }

            let mut buffer = String::new();
            let mut buffer_has_new_text = false;

            for piece in self.split_section(&section) {
                let would_overflow = estimate_tokens(&buffer) + estimate_tokens(&piece) > self.config.max_tokens;

                if would_overflow && buffer_has_new_text {
                    chunks.push(Chunk::new(source, buffer.trim()));
                    buffer = self.get_overlap(&buffer);
                    buffer_has_new_text = false;
                }

                if !buffer.is_empty() {
                    buffer.push_str("\n\n");
                }
                buffer.push_str(&piece);
                buffer_has_new_text = true;
            }

            if buffer_has_new_text && !buffer.trim().is_empty() {
                chunks.push(Chunk::new(source, buffer.trim()));
            }
        }

        chunks
    }

    fn split_by_headings(&self, text: &str) -> Vec<String> {
        let mut sections = Vec::new();
        let mut current_section = String::new();

        for line in text.lines() {
            if line.trim_start().starts_with('#') && !current_section.trim().is_empty() {
                sections.push(std::mem::take(&mut current_section));
            }
            current_section.push_str(line);
            current_section.push('\n');
        }

        if !current_section.is_empty() {
            sections.push(current_section);
        }

        sections
    }

    /// Paragraphs of a section, with oversized paragraphs cut into word windows.
    fn split_section(&self, section: &str) -> Vec<String> {
        let window = self.words_for(self.config.max_tokens.saturating_sub(self.config.overlap_tokens)).max(1);
        let mut pieces = Vec::new();

        for para in section.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
            if estimate_tokens(para) <= self.config.max_tokens {
                pieces.push(para.to_string());
                continue;
            }

            let words: Vec<&str> = para.split_whitespace().collect();
            pieces.extend(words.chunks(window).map(|w| w.join(" ")));
        }

        pieces
    }

    fn words_for(&self, tokens: usize) -> usize {
        (tokens as f64 / 1.3) as usize
    }

    fn get_overlap(&self, text: &str) -> String {
        let target_words = self.words_for(self.config.overlap_tokens);
        if target_words == 0 {
            return String::new();
        }

        let words: Vec<&str> = text.split_whitespace().collect();
        words[words.len().saturating_sub(target_words)..].join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(prefix: &str, n: usize) -> String {
        (0..n).map(|i| format!("{}{}", prefix, i)).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_basic_chunking() {
        let chunker = Chunker::new(ChunkerConfig::default());
        let text = "This is a test paragraph.\n\nThis is another paragraph.";
        let chunks = chunker.chunk_text("test.txt", text);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].source, "test.txt");
        assert!(chunks[0].text.contains("another paragraph"));
    }

    #[test]
    fn test_headings_start_new_sections() {
        let chunker = Chunker::new(ChunkerConfig::default());
        let text = "# Intro\nHello there.\n# Details\nMore text here.";
        let chunks = chunker.chunk_text("doc.md", text);

        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].text.starts_with("# Intro"));
        assert!(chunks[1].text.starts_with("# Details"));
    }

    #[test]
    fn test_large_section_respects_budget() {
        let chunker = Chunker::new(ChunkerConfig {
            max_tokens: 26,
            overlap_tokens: 0,
        });
        let text = format!("{}\n\n{}\n\n{}", words("a", 15), words("b", 15), words("c", 15));
        let chunks = chunker.chunk_text("doc.txt", &text);

        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.estimated_tokens() <= 26));
        assert!(chunks[1].text.starts_with("b0"));
    }

    #[test]
    fn test_overlap_carries_trailing_words() {
        let chunker = Chunker::new(ChunkerConfig {
            max_tokens: 26,
            overlap_tokens: 3,
        });
        let text = format!("{}\n\n{}", words("a", 15), words("b", 15));
        let chunks = chunker.chunk_text("doc.txt", &text);

        assert_eq!(chunks.len(), 2);
        assert!(chunks[1].text.starts_with("a13 a14"));
        assert!(chunks[1].text.contains("b0"));
    }

    #[test]
    fn test_oversized_paragraph_is_windowed() {
        let chunker = Chunker::new(ChunkerConfig {
            max_tokens: 13,
            overlap_tokens: 0,
        });
        let chunks = chunker.chunk_text("doc.txt", &words("w", 25));

        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.estimated_tokens() <= 13));
        assert_eq!(chunks[2].text, "w20 w21 w22 w23 w24");
    }

    #[test]
    fn test_blank_text_has_no_chunks() {
        let chunker = Chunker::new(ChunkerConfig::default());
        assert!(chunker.chunk_text("doc.txt", "\n\n   \n").is_empty());
    }
}
