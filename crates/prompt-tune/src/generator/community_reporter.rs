use anyhow::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PromptTuneError;
use crate::generator::parser::parse_entity_relationship_examples;
use crate::generator::{chat_all, Docs, MAX_EXAMPLES};
use crate::llm::{ChatMessage, ChatModel};
use crate::prompt::{fill, COMMUNITY_REPORT_EXAMPLE_GENERATION_PROMPT};

/// Worked community report examples as four parallel lists.
///
/// Index `i` of every list belongs to the same example: the source text, its
/// entity table, its relationship table and the report the model wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityReporterExamples {
    pub docs: Vec<String>,
    pub entities: Vec<String>,
    pub relationships: Vec<String>,
    pub outputs: Vec<String>,
}

impl CommunityReporterExamples {
    pub fn len(&self) -> usize {
        self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outputs.is_empty()
    }

    /// True when all four lists have the same length.
    pub fn is_aligned(&self) -> bool {
        let n = self.docs.len();
        self.entities.len() == n && self.relationships.len() == n && self.outputs.len() == n
    }
}

/// Turn extraction answers into finished community report examples.
///
/// Each answer in `entity_relationship_examples` is parsed into entity and
/// relationship tables, paired with the matching document, and sent to the
/// model as a report-writing task. At most [`MAX_EXAMPLES`] reports are
/// requested and every returned list is cut to that many rows.
///
/// `json_mode` is forwarded to the model but does not change the template.
/// `language` is accepted for symmetry with the other generators; the report
/// example template has no language slot.
#[allow(clippy::too_many_arguments)]
pub async fn generate_community_reporter_examples<M, R>(
    model: &M,
    persona: &str,
    entity_relationship_examples: &[String],
    community_reporter_role: Option<&str>,
    report_rating_description: Option<&str>,
    docs: &Docs,
    language: &str,
    json_mode: bool,
    rng: &mut R,
) -> Result<CommunityReporterExamples>
where
    M: ChatModel + ?Sized,
    R: Rng + ?Sized,
{
    if entity_relationship_examples.is_empty() {
        return Err(PromptTuneError::MissingExamples.into());
    }

    let history = vec![ChatMessage::system(persona)];

    let mut entities = Vec::with_capacity(entity_relationship_examples.len());
    let mut relationships = Vec::with_capacity(entity_relationship_examples.len());
    for example in entity_relationship_examples {
        let (entities_block, relationships_block) = parse_entity_relationship_examples(example, rng)?;
        entities.push(entities_block);
        relationships.push(relationships_block);
    }

    let role = community_reporter_role.unwrap_or_default();
    let rating = report_rating_description.unwrap_or_default();

    // Both modes share one template for now.
    #[allow(clippy::if_same_then_else)]
    let template = if json_mode {
        COMMUNITY_REPORT_EXAMPLE_GENERATION_PROMPT
    } else {
        COMMUNITY_REPORT_EXAMPLE_GENERATION_PROMPT
    };

    let messages: Vec<String> = docs
        .as_slice()
        .iter()
        .take(MAX_EXAMPLES)
        .zip(entities.iter().zip(relationships.iter()))
        .map(|(doc, (entities_block, relationships_block))| {
            fill(
                template,
                &[
                    ("persona", persona),
                    ("role", role),
                    ("report_rating_description", rating),
                    ("entities", entities_block.as_str()),
                    ("relationships", relationships_block.as_str()),
                    ("input_text", doc.as_str()),
                ],
            )
        })
        .collect();

    debug!(
        examples = entity_relationship_examples.len(),
        prompts = messages.len(),
        language,
        "Generating community reporter examples"
    );

    let outputs = chat_all(model, &messages, &history, json_mode).await?;

    let rows = outputs.len();
    let docs: Vec<String> = docs.as_slice().iter().take(rows).cloned().collect();
    entities.truncate(rows);
    relationships.truncate(rows);

    Ok(CommunityReporterExamples {
        docs,
        entities,
        relationships,
        outputs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::testing::EchoModel;
    use crate::prompt::{COMPLETION_DELIMITER, RECORD_DELIMITER, TUPLE_DELIMITER};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn extraction(name: &str) -> String {
        let entity = ["entity", name, "PERSON", "someone"].join(TUPLE_DELIMITER);
        let relation = ["relationship", name, "TOWN", "lives in"].join(TUPLE_DELIMITER);
        format!("({}){}({}){}", entity, RECORD_DELIMITER, relation, COMPLETION_DELIMITER)
    }

    #[tokio::test]
    async fn test_empty_examples_are_rejected() {
        let model = EchoModel::default();
        let mut rng = StdRng::seed_from_u64(0);

        let err = generate_community_reporter_examples(
            &model,
            "persona",
            &[],
            Some("role"),
            Some("rating"),
            &Docs::from("doc"),
            "English",
            false,
            &mut rng,
        )
        .await
        .unwrap_err();

        assert_eq!(err.downcast_ref::<PromptTuneError>(), Some(&PromptTuneError::MissingExamples));
        assert!(model.calls().is_empty());
    }

    #[tokio::test]
    async fn test_builds_one_report_per_document() {
        let model = EchoModel::default();
        let mut rng = StdRng::seed_from_u64(9);
        let examples = vec![extraction("ALICE"), extraction("BOB")];
        let docs = Docs::from(vec!["Alice's text".to_string(), "Bob's text".to_string()]);

        let result = generate_community_reporter_examples(
            &model,
            "You are a town clerk",
            &examples,
            Some("You summarise neighbourhoods."),
            Some("how lively the community is"),
            &docs,
            "English",
            false,
            &mut rng,
        )
        .await
        .unwrap();

        assert!(result.is_aligned());
        assert_eq!(result.len(), 2);
        assert_eq!(result.docs, vec!["Alice's text", "Bob's text"]);
        assert!(result.entities[0].ends_with(", ALICE, someone"));
        assert!(result.relationships[1].ends_with(", BOB, TOWN, lives in"));

        let first = &result.outputs[0];
        assert!(first.starts_with("reply:You are a town clerk"));
        assert!(first.contains("You summarise neighbourhoods."));
        assert!(first.contains("Rate the impact as follows: how lively the community is"));
        assert!(first.contains("Alice's text"));
        assert!(first.contains(&result.entities[0]));
        assert!(result.outputs[1].contains("Bob's text"));

        for call in model.calls() {
            assert_eq!(call.history, vec![ChatMessage::system("You are a town clerk")]);
            assert!(!call.json);
        }
    }

    #[tokio::test]
    async fn test_results_are_capped_at_five() {
        let model = EchoModel::default();
        let mut rng = StdRng::seed_from_u64(1);
        let examples: Vec<String> = (0..7).map(|i| extraction(&format!("E{}", i))).collect();
        let docs = Docs::from((0..7).map(|i| format!("doc {}", i)).collect::<Vec<_>>());

        let result = generate_community_reporter_examples(
            &model, "p", &examples, None, None, &docs, "English", true, &mut rng,
        )
        .await
        .unwrap();

        assert_eq!(result.len(), MAX_EXAMPLES);
        assert!(result.is_aligned());
        assert_eq!(model.calls().len(), MAX_EXAMPLES);
        assert!(model.calls().iter().all(|call| call.json));
    }

    #[tokio::test]
    async fn test_json_mode_keeps_template() {
        let examples = vec![extraction("ALICE")];
        let docs = Docs::from("text");

        let plain = EchoModel::default();
        generate_community_reporter_examples(
            &plain, "p", &examples, Some("r"), Some("d"), &docs, "English", false, &mut StdRng::seed_from_u64(4),
        )
        .await
        .unwrap();

        let json = EchoModel::default();
        generate_community_reporter_examples(
            &json, "p", &examples, Some("r"), Some("d"), &docs, "English", true, &mut StdRng::seed_from_u64(4),
        )
        .await
        .unwrap();

        assert_eq!(plain.calls()[0].message, json.calls()[0].message);
    }

    #[tokio::test]
    async fn test_fewer_docs_than_examples() {
        let model = EchoModel::default();
        let examples = vec![extraction("A"), extraction("B"), extraction("C")];

        let result = generate_community_reporter_examples(
            &model,
            "p",
            &examples,
            None,
            None,
            &Docs::from("only one"),
            "English",
            false,
            &mut StdRng::seed_from_u64(2),
        )
        .await
        .unwrap();

        assert_eq!(result.len(), 1);
        assert!(result.is_aligned());
    }
}
