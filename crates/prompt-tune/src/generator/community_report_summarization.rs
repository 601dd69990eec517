use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::generator::community_reporter::CommunityReporterExamples;
use crate::prompt::{fill, COMMUNITY_REPORT_EXAMPLE_EXTRACTION_TEMPLATE, COMMUNITY_REPORT_SUMMARIZATION_PROMPT};

pub const COMMUNITY_SUMMARIZATION_FILENAME: &str = "community_report_graph.txt";

/// Render the community report summarisation prompt.
///
/// Every example row becomes a numbered block (starting at 1) spliced into
/// the `{examples}` slot. When `output_path` is given the directory is
/// created if needed and the prompt is written to
/// `community_report_graph.txt` inside it, replacing any previous file.
pub fn create_community_summarization_prompt(
    persona: &str,
    role: &str,
    report_rating_description: &str,
    examples: &CommunityReporterExamples,
    language: &str,
    output_path: Option<&Path>,
) -> Result<String> {
    if !examples.is_aligned() {
        warn!(
            docs = examples.docs.len(),
            entities = examples.entities.len(),
            relationships = examples.relationships.len(),
            outputs = examples.outputs.len(),
            "Example lists differ in length, extra rows are ignored"
        );
    }

    let mut examples_prompt = String::new();
    let rows = examples
        .docs
        .iter()
        .zip(&examples.entities)
        .zip(&examples.relationships)
        .zip(&examples.outputs);

    for (i, (((doc, entities), relationships), output)) in rows.enumerate() {
        let n = (i + 1).to_string();
        examples_prompt.push_str(&fill(
            COMMUNITY_REPORT_EXAMPLE_EXTRACTION_TEMPLATE,
            &[
                ("n", n.as_str()),
                ("input_text", doc.as_str()),
                ("entities", entities.as_str()),
                ("relationships", relationships.as_str()),
                ("output", output.as_str()),
            ],
        ));
    }

    let prompt = fill(
        COMMUNITY_REPORT_SUMMARIZATION_PROMPT,
        &[
            ("persona", persona),
            ("role", role),
            ("report_rating_description", report_rating_description),
            ("language", language),
            ("examples", examples_prompt.as_str()),
        ],
    );

    if let Some(output_path) = output_path {
        fs::create_dir_all(output_path)
            .with_context(|| format!("Failed to create output directory: {:?}", output_path))?;

        let file_path = output_path.join(COMMUNITY_SUMMARIZATION_FILENAME);
        fs::write(&file_path, prompt.as_bytes())
            .with_context(|| format!("Failed to write prompt: {:?}", file_path))?;

        debug!(path = %file_path.display(), bytes = prompt.len(), "Wrote community summarization prompt");
    }

    Ok(prompt)
}
