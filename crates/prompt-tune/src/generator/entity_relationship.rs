use anyhow::Result;
use tracing::debug;

use crate::generator::{chat_all, Docs, EntityTypes, MAX_EXAMPLES};
use crate::llm::{ChatMessage, ChatModel};
use crate::prompt::{
    fill, ENTITY_RELATIONSHIPS_GENERATION_JSON_PROMPT, ENTITY_RELATIONSHIPS_GENERATION_PROMPT,
    UNTYPED_ENTITY_RELATIONSHIPS_GENERATION_PROMPT,
};

/// Build the extraction prompts for each document.
///
/// With entity types the typed template is used (its JSON flavour when
/// `json_mode` is set); otherwise the untyped one. Empty entity types count
/// as none. The result is capped at [`MAX_EXAMPLES`].
pub fn build_entity_relationship_prompts(
    entity_types: Option<&EntityTypes>,
    docs: &Docs,
    language: &str,
    json_mode: bool,
) -> Vec<String> {
    let docs = docs.as_slice().iter().take(MAX_EXAMPLES);

    match entity_types.filter(|types| !types.is_empty()) {
        Some(types) => {
            let entity_types = types.joined();
            let template = if json_mode {
                ENTITY_RELATIONSHIPS_GENERATION_JSON_PROMPT
            } else {
                ENTITY_RELATIONSHIPS_GENERATION_PROMPT
            };

            docs.map(|doc| {
                fill(
                    template,
                    &[
                        ("entity_types", entity_types.as_str()),
                        ("input_text", doc.as_str()),
                        ("language", language),
                    ],
                )
            })
            .collect()
        }
        None => docs
            .map(|doc| {
                fill(
                    UNTYPED_ENTITY_RELATIONSHIPS_GENERATION_PROMPT,
                    &[("input_text", doc.as_str()), ("language", language)],
                )
            })
            .collect(),
    }
}

/// Ask the model for worked entity/relationship extractions of `docs`.
///
/// Returns the raw answers, one per prompt and in prompt order. Documents
/// past the fifth are ignored. Any failed model call fails the batch.
pub async fn generate_entity_relationship_examples<M>(
    model: &M,
    persona: &str,
    entity_types: Option<&EntityTypes>,
    docs: &Docs,
    language: &str,
    json_mode: bool,
) -> Result<Vec<String>>
where
    M: ChatModel + ?Sized,
{
    let history = vec![ChatMessage::system(persona)];
    let messages = build_entity_relationship_prompts(entity_types, docs, language, json_mode);

    debug!(
        docs = docs.as_slice().len(),
        prompts = messages.len(),
        typed = entity_types.is_some_and(|types| !types.is_empty()),
        "Generating entity/relationship examples"
    );

    chat_all(model, &messages, &history, json_mode).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::testing::EchoModel;
    use crate::llm::ChatRole;

    fn docs(n: usize) -> Docs {
        Docs::from((1..=n).map(|i| format!("document {}", i)).collect::<Vec<_>>())
    }

    #[tokio::test]
    async fn test_untyped_prompts_are_capped_at_five() {
        let model = EchoModel::default();
        let docs = docs(7);

        let examples = generate_entity_relationship_examples(&model, "persona", None, &docs, "English", false)
            .await
            .unwrap();

        let expected: Vec<String> = build_entity_relationship_prompts(None, &docs, "English", false)
            .into_iter()
            .map(|prompt| format!("reply:{}", prompt))
            .collect();

        assert_eq!(examples.len(), 5);
        assert_eq!(examples, expected);
        assert!(examples[4].contains("text: document 5"));
        assert!(examples.iter().all(|e| !e.contains("document 6")));
        assert!(examples[0].contains("Suggest several labels"));
    }

    #[tokio::test]
    async fn test_every_call_carries_persona_history() {
        let model = EchoModel::default();

        generate_entity_relationship_examples(&model, "You are a historian", None, &docs(3), "English", true)
            .await
            .unwrap();

        let calls = model.calls();
        assert_eq!(calls.len(), 3);
        for call in calls {
            assert_eq!(call.history.len(), 1);
            assert_eq!(call.history[0].role, ChatRole::System);
            assert_eq!(call.history[0].content, "You are a historian");
            assert!(call.json);
        }
    }

    #[test]
    fn test_typed_prompt_uses_joined_types() {
        let types = EntityTypes::from(vec!["person".to_string(), "place".to_string()]);
        let prompts = build_entity_relationship_prompts(Some(&types), &Docs::from("Tom went home."), "German", false);

        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("entity_types: person, place"));
        assert!(prompts[0].contains("text: Tom went home."));
        assert!(prompts[0].contains("Return output in German"));
        assert!(prompts[0].contains("{tuple_delimiter}"));
    }

    #[test]
    fn test_json_mode_selects_json_template() {
        let types = EntityTypes::from("person");
        let prompts = build_entity_relationship_prompts(Some(&types), &Docs::from("doc"), "English", true);
        assert!(prompts[0].contains("as a JSON object"));
        assert!(!prompts[0].contains("{tuple_delimiter}"));
    }

    #[test]
    fn test_json_mode_without_types_stays_untyped() {
        let prompts = build_entity_relationship_prompts(None, &Docs::from("doc"), "English", true);
        assert!(prompts[0].contains("Suggest several labels"));
    }

    #[test]
    fn test_empty_types_fall_back_to_untyped() {
        let types = EntityTypes::Many(Vec::new());
        let prompts = build_entity_relationship_prompts(Some(&types), &Docs::from("doc"), "English", false);
        assert!(prompts[0].contains("Suggest several labels"));
    }

    #[tokio::test]
    async fn test_model_failure_fails_batch() {
        let model = EchoModel::failing_on("document 2");

        let result = generate_entity_relationship_examples(&model, "persona", None, &docs(3), "English", false).await;
        assert!(result.is_err());
    }
}
