use thiserror::Error;

/// Error reported by a [`Session`](crate::interface::Session) implementation.
pub type SessionError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum EzError {
    #[error("Cannot resolve '{name}' on entity '{entity}'")]
    UnresolvedIdentifier { entity: String, name: String },

    #[error("Refusing to run {statement} on '{table}' without a WHERE condition")]
    EmptyConditionOnMutation {
        statement: &'static str,
        table: String,
    },

    #[error("Nothing to update on '{0}': no assignable field carries a value")]
    EmptyAssignment(String),

    #[error("Unsupported dialect feature: {0}")]
    UnsupportedDialectFeature(String),

    #[error("Mapping mismatch: {0}")]
    MappingMismatch(String),

    #[error("Invalid entity metadata: {0}")]
    InvalidMetadata(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Execution failure: {0}")]
    ExecutionFailure(#[source] SessionError),
}

impl EzError {
    pub fn unresolved(entity: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnresolvedIdentifier {
            entity: entity.into(),
            name: name.into(),
        }
    }

    /// True when the error was raised before any SQL reached the session.
    pub fn is_compile_error(&self) -> bool {
        !matches!(self, Self::ExecutionFailure(_))
    }
}

pub type Result<T> = std::result::Result<T, EzError>;

impl From<serde_json::Error> for EzError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
