//! Error types for the query builder

use thiserror::Error;

/// Errors raised at the edges of the builder: parsing enumerations and editing the condition list.
///
/// The query and explanation generators themselves never fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JqlError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    #[error("Unknown conjunction: {0}")]
    UnknownConjunction(String),

    #[error("Condition not found: {0}")]
    ConditionNotFound(u64),

    #[error("Cannot remove the last condition")]
    LastCondition,

    #[error("A condition list needs at least one condition")]
    EmptyConditionList,

    #[error("Duplicate condition id: {0}")]
    DuplicateId(u64),

    #[error("Condition ids are exhausted")]
    IdsExhausted,
}
