use thiserror::Error;

/// Contract failures raised by the example generators and the record parser.
///
/// Everything else (model calls, file writes) surfaces as a plain
/// `anyhow::Error`; these variants can be recovered with `downcast_ref`.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PromptTuneError {
    #[error("community reporter examples need at least one entity/relationship example")]
    MissingExamples,

    #[error("cannot assign ids to {records} records from a pool of {capacity}")]
    IdPoolExhausted { records: usize, capacity: usize },
}
