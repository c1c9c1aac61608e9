//! Descriptor to SQL compilation.
//!
//! Every statement uses `?` placeholders; parameters are returned alongside
//! the text in placeholder order. The compiler never talks to a session.

mod condition;
mod mutation;
mod select;

use serde::Serialize;

use crate::core::Value;
use crate::metadata::Resolver;

/// SQL text plus its bind parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledSql {
    pub sql: String,
    pub params: Vec<Value>,
}

impl CompiledSql {
    pub fn new(sql: impl Into<String>, params: Vec<Value>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Number of `?` placeholders in the text. Compiled SQL never embeds
    /// literals, so every `?` is a placeholder.
    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }
}

/// Result of compiling a [`Mutation`](crate::query::Mutation).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CompiledMutation {
    Single(CompiledSql),
    /// One statement executed once per parameter set.
    Batch {
        sql: String,
        param_sets: Vec<Vec<Value>>,
    },
}

impl CompiledMutation {
    pub fn sql(&self) -> &str {
        match self {
            Self::Single(compiled) => &compiled.sql,
            Self::Batch { sql, .. } => sql,
        }
    }
}

/// Compiles descriptors against resolved entities.
///
/// Cheap to construct; borrows the shared [`Resolver`] for identifiers and
/// dialect rules.
pub struct SqlCompiler<'a> {
    resolver: &'a Resolver,
}

impl<'a> SqlCompiler<'a> {
    pub fn new(resolver: &'a Resolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &Resolver {
        self.resolver
    }
}
