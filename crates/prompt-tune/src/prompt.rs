//! Prompt templates used while tuning the indexing prompts.
//!
//! Templates carry named `{placeholder}` slots. [`fill`] substitutes only the
//! names it is given, so the delimiter tokens the model must echo back
//! (`{tuple_delimiter}`, `{record_delimiter}`, `{completion_delimiter}`) and
//! the runtime slots of the final summarisation prompt survive untouched.

use regex::{Captures, Regex};
use std::sync::LazyLock;

pub const TUPLE_DELIMITER: &str = "{tuple_delimiter}";
pub const RECORD_DELIMITER: &str = "{record_delimiter}";
pub const COMPLETION_DELIMITER: &str = "{completion_delimiter}";

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
});

/// Replace every `{name}` whose name appears in `values`.
///
/// Unknown placeholders are kept verbatim and substituted text is never
/// scanned again, so a document containing `{language}` stays as written.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

pub const ENTITY_RELATIONSHIPS_GENERATION_PROMPT: &str = r#"-Goal-
Given a text document that is potentially relevant to this activity and a list of entity types, identify all entities of those types from the text and all relationships among the identified entities.

-Steps-
1. Identify all entities. For each identified entity, extract the following information:
- entity_name: Name of the entity, capitalized
- entity_type: One of the following types: [{entity_types}]
- entity_description: Comprehensive description of the entity's attributes and activities
Format each entity as ("entity"{tuple_delimiter}<entity_name>{tuple_delimiter}<entity_type>{tuple_delimiter}<entity_description>)

2. From the entities identified in step 1, identify all pairs of (source_entity, target_entity) that are *clearly related* to each other.
For each pair of related entities, extract the following information:
- source_entity: name of the source entity, as identified in step 1
- target_entity: name of the target entity, as identified in step 1
- relationship_description: explanation as to why you think the source entity and the target entity are related to each other
- relationship_strength: an integer score between 1 to 10, indicating strength of the relationship between the source entity and target entity
Format each relationship as ("relationship"{tuple_delimiter}<source_entity>{tuple_delimiter}<target_entity>{tuple_delimiter}<relationship_description>{tuple_delimiter}<relationship_strength>)

3. Return output in {language} as a single list of all the entities and relationships identified in steps 1 and 2. Use {record_delimiter} as the list delimiter. List every entity before the first relationship.

4. When finished, output {completion_delimiter}

-Real Data-
######################
entity_types: {entity_types}
text: {input_text}
######################
output:
"#;

pub const ENTITY_RELATIONSHIPS_GENERATION_JSON_PROMPT: &str = r#"-Goal-
Given a text document that is potentially relevant to this activity and a list of entity types, identify all entities of those types from the text and all relationships among the identified entities.

-Steps-
1. Identify all entities. For each identified entity, extract the following information:
- entity_name: Name of the entity, capitalized
- entity_type: One of the following types: [{entity_types}]
- entity_description: Comprehensive description of the entity's attributes and activities

2. From the entities identified in step 1, identify all pairs of (source_entity, target_entity) that are *clearly related* to each other.
For each pair of related entities, extract the following information:
- source_entity: name of the source entity, as identified in step 1
- target_entity: name of the target entity, as identified in step 1
- relationship_description: explanation as to why you think the source entity and the target entity are related to each other
- relationship_strength: an integer score between 1 to 10, indicating strength of the relationship between the source entity and target entity

3. Return output in {language} as a JSON object with the following structure:
{
  "entities": [
    {"name": "entity name", "type": "entity type", "description": "entity description"}
  ],
  "relationships": [
    {"source": "source entity name", "target": "target entity name", "relationship": "relationship description", "relationship_strength": 7}
  ]
}

-Real Data-
######################
entity_types: {entity_types}
text: {input_text}
######################
output:
"#;

pub const UNTYPED_ENTITY_RELATIONSHIPS_GENERATION_PROMPT: &str = r#"-Goal-
Given a text document that is potentially relevant to this activity, first identify all entities needed from the text in order to capture the information and ideas in the text.
Next, report all relationships among the identified entities.

-Steps-
1. Identify all entities. For each identified entity, extract the following information:
- entity_name: Name of the entity, capitalized
- entity_type: Suggest several labels or categories for the entity. The categories should not be specific, but should be as general as possible.
- entity_description: Comprehensive description of the entity's attributes and activities
Format each entity as ("entity"{tuple_delimiter}<entity_name>{tuple_delimiter}<entity_type>{tuple_delimiter}<entity_description>)

2. From the entities identified in step 1, identify all pairs of (source_entity, target_entity) that are *clearly related* to each other.
For each pair of related entities, extract the following information:
- source_entity: name of the source entity, as identified in step 1
- target_entity: name of the target entity, as identified in step 1
- relationship_description: explanation as to why you think the source entity and the target entity are related to each other
- relationship_strength: a numeric score indicating strength of the relationship between the source entity and target entity
Format each relationship as ("relationship"{tuple_delimiter}<source_entity>{tuple_delimiter}<target_entity>{tuple_delimiter}<relationship_description>{tuple_delimiter}<relationship_strength>)

3. Return output in {language} as a single list of all the entities and relationships identified in steps 1 and 2. Use {record_delimiter} as the list delimiter. List every entity before the first relationship.

4. When finished, output {completion_delimiter}

-Real Data-
######################
text: {input_text}
######################
output:
"#;

pub const COMMUNITY_REPORT_EXAMPLE_GENERATION_PROMPT: &str = r#"{persona}

You are writing an example for a few-shot prompt. {role}

# Goal
Write a comprehensive report of a community, given a list of entities that belong to the community as well as their relationships and the source text they were extracted from. The report will be used to inform decision-makers about information associated with the community and their potential impact.

# Report Structure
The report should include the following sections:
- TITLE: community's name that represents its key entities - title should be short but specific.
- SUMMARY: An executive summary of the community's overall structure, how its entities are related to each other, and significant information associated with its entities.
- IMPACT SEVERITY RATING: a float score between 0-10 that represents the severity of IMPACT posed by entities within the community. IMPACT is the scored importance of a community.
- RATING EXPLANATION: Give a single sentence explanation of the IMPACT severity rating.
- DETAILED FINDINGS: A list of 5-10 key insights about the community. Each insight should have a short summary followed by multiple paragraphs of explanatory text grounded according to the grounding rules below.

Rate the impact as follows: {report_rating_description}

Return output as a well-formed JSON-formatted string with the following format:
    {
        "title": <report_title>,
        "summary": <executive_summary>,
        "rating": <impact_severity_rating>,
        "rating_explanation": <rating_explanation>,
        "findings": [
            {
                "summary": <insight_1_summary>,
                "explanation": <insight_1_explanation>
            }
        ]
    }

# Grounding Rules
Points supported by data should list their data references as follows:
"This is an example sentence supported by multiple data references [Data: <dataset name> (record ids); <dataset name> (record ids)]."
Do not list more than 5 record ids in a single reference. Do not include information where the supporting evidence for it is not provided.

# Source Text
{input_text}

# Entities
id, entity, description
{entities}

# Relationships
id, source, target, description
{relationships}

Output:"#;

pub const COMMUNITY_REPORT_EXAMPLE_EXTRACTION_TEMPLATE: &str = r#"
Example {n}:
-----------
Text:
{input_text}

Entities

id, entity, description
{entities}

Relationships

id, source, target, description
{relationships}

Output:
{output}

"#;

pub const COMMUNITY_REPORT_SUMMARIZATION_PROMPT: &str = r#"{persona}

# Goal
Write a comprehensive assessment report of a community taking on the role of a {role}. The content of this report includes an overview of the community's key entities and relationships.

# Report Structure
The report should include the following sections:
- TITLE: community's name that represents its key entities - title should be short but specific. When possible, include representative named entities in the title.
- SUMMARY: An executive summary of the community's overall structure, how its entities are related to each other, and significant points associated with its entities.
- REPORT RATING: {report_rating_description}
- RATING EXPLANATION: Give a single sentence explanation of the rating.
- DETAILED FINDINGS: A list of 5-10 key insights about the community. Each insight should have a short summary followed by multiple paragraphs of explanatory text grounded according to the grounding rules below. Be comprehensive.

Return output as a well-formed JSON-formatted string with the following format. Don't use any unnecessary escape sequences. The output should be a single JSON object that can be parsed by json.loads.
    {
        "title": "<report_title>",
        "summary": "<executive_summary>",
        "rating": <threat_severity_rating>,
        "rating_explanation": "<rating_explanation>",
        "findings": [
            {
                "summary": "<insight_1_summary>",
                "explanation": "<insight_1_explanation>"
            }
        ]
    }

# Grounding Rules
Points supported by data should list their data references as follows:
"This is an example sentence supported by multiple data references [Data: <dataset name> (record ids); <dataset name> (record ids)]."
Do not list more than 5 record ids in a single reference. Instead, list the top 5 most relevant record ids and add "+more" to indicate that there are more.
Do not include information where the supporting evidence for it is not provided.

Limit the total report length to {max_report_length} words.

# Examples
{examples}

# Real Data

Use the following text for your answer. Do not make anything up in your answer.

Text:
{input_text}

Output:
The report should be written in {language}."#;
