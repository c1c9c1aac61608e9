use super::condition::Condition;
use crate::core::{Row, Value};

/// Which rows an update or delete touches.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// Primary key equality. A NULL key is rejected at compile time.
    Key(Value),
    /// Primary key membership.
    Keys(Vec<Value>),
    Where(Condition),
}

/// Write operation against one entity type.
///
/// Rows hold field values in entity declaration order, as produced by
/// [`Entity::to_values`](crate::metadata::Entity::to_values).
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// One or more rows; more than one row compiles to a batch.
    Insert(Vec<Row>),
    /// Sparse update: only non-null, non-key fields are assigned.
    Update { row: Row, target: Target },
    /// Full-row update: every non-key field is assigned, NULLs included.
    Replace { row: Row, target: Target },
    Delete(Target),
}

impl Mutation {
    pub fn statement(&self) -> &'static str {
        match self {
            Self::Insert(_) => "INSERT",
            Self::Update { .. } | Self::Replace { .. } => "UPDATE",
            Self::Delete(_) => "DELETE",
        }
    }
}
