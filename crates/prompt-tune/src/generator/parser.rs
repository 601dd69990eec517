use rand::Rng;
use rand::seq::index;
use tracing::debug;

use crate::error::PromptTuneError;
use crate::prompt::{COMPLETION_DELIMITER, RECORD_DELIMITER, TUPLE_DELIMITER};

/// Size of the pool record IDs are drawn from (`0..ID_POOL_SIZE`).
pub const ID_POOL_SIZE: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRecord {
    pub id: usize,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipRecord {
    pub id: usize,
    pub source: String,
    pub target: String,
    pub description: String,
}

/// Records recovered from one delimiter-formatted extraction answer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedExample {
    pub entities: Vec<EntityRecord>,
    pub relationships: Vec<RelationshipRecord>,
}

impl ParsedExample {
    /// One `id, name, description` line per entity.
    pub fn entities_block(&self) -> String {
        self.entities
            .iter()
            .map(|e| format!("{}, {}, {}", e.id, e.name, e.description))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// One `id, source, target, description` line per relationship.
    pub fn relationships_block(&self) -> String {
        self.relationships
            .iter()
            .map(|r| format!("{}, {}, {}, {}", r.id, r.source, r.target, r.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Parse a model answer into `(entities_block, relationships_block)`.
pub fn parse_entity_relationship_examples<R>(
    response_text: &str,
    rng: &mut R,
) -> Result<(String, String), PromptTuneError>
where
    R: Rng + ?Sized,
{
    let parsed = parse_records(response_text, rng)?;
    Ok((parsed.entities_block(), parsed.relationships_block()))
}

/// Parse a model answer into typed records.
///
/// Entities listed after the first relationship are dropped, and the
/// `entitites` spelling some models emit is accepted as an entity tag.
pub fn parse_records<R>(response_text: &str, rng: &mut R) -> Result<ParsedExample, PromptTuneError>
where
    R: Rng + ?Sized,
{
    let content = response_text
        .split(COMPLETION_DELIMITER)
        .next()
        .unwrap_or_default()
        .trim();

    let mut entities: Vec<(String, String)> = Vec::new();
    let mut relationships: Vec<(String, String, String)> = Vec::new();
    let mut seen_relationship = false;

    for record in content.split(RECORD_DELIMITER).map(str::trim).filter(|r| !r.is_empty()) {
        let record = strip_parentheses(record);
        let fields: Vec<&str> = record.split(TUPLE_DELIMITER).map(clean_field).collect();

        if fields.len() < 4 {
            debug!(record, fields = fields.len(), "Skipping malformed record");
            continue;
        }

        let tag = fields[0].to_lowercase();
        if tag == "relationship" {
            seen_relationship = true;
            relationships.push((fields[1].to_string(), fields[2].to_string(), fields[3].to_string()));
        } else if (tag == "entity" || tag == "entitites") && !seen_relationship {
            // fields[2] is the entity type, which the report examples do not use
            entities.push((fields[1].to_string(), fields[3].to_string()));
        }
    }

    let total = entities.len() + relationships.len();
    if total > ID_POOL_SIZE {
        return Err(PromptTuneError::IdPoolExhausted {
            records: total,
            capacity: ID_POOL_SIZE,
        });
    }

    let mut ids = index::sample(rng, ID_POOL_SIZE, total).into_iter();

    let entities = entities
        .into_iter()
        .zip(ids.by_ref())
        .map(|((name, description), id)| EntityRecord { id, name, description })
        .collect();

    let relationships = relationships
        .into_iter()
        .zip(ids)
        .map(|((source, target, description), id)| RelationshipRecord {
            id,
            source,
            target,
            description,
        })
        .collect();

    Ok(ParsedExample {
        entities,
        relationships,
    })
}

fn strip_parentheses(record: &str) -> &str {
    record
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
        .unwrap_or(record)
}

fn clean_field(field: &str) -> &str {
    let field = field.trim();
    let field = field
        .strip_prefix(['"', '\''])
        .unwrap_or(field);
    field
        .strip_suffix(['"', '\''])
        .unwrap_or(field)
}
