//! Entity metadata and identifier resolution.
//!
//! Metadata is declared once per type, normally through
//! `#[derive(EzEntity)]`, and cached in a `OnceLock` by the generated code.

mod resolver;

pub use resolver::{ResolvedColumn, ResolvedEntity, Resolver};

use serde::{Deserialize, Serialize};

use crate::core::{EzError, Result, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMeta {
    /// Logical name used in conditions, ordering and projections.
    pub name: String,
    /// Explicit column name; bypasses the naming pattern.
    #[serde(default)]
    pub column: Option<String>,
    #[serde(default)]
    pub primary_key: bool,
    /// Key assigned by the database; left out of INSERT when NULL.
    #[serde(default)]
    pub generated: bool,
}

impl FieldMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column: None,
            primary_key: false,
            generated: false,
        }
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn generated(mut self) -> Self {
        self.generated = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityMeta {
    pub name: String,
    /// Explicit table name; bypasses the naming pattern.
    #[serde(default)]
    pub table: Option<String>,
    pub fields: Vec<FieldMeta>,
}

impl EntityMeta {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: None,
            fields: Vec::new(),
        }
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn field(mut self, field: FieldMeta) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Index of the single primary-key field.
    pub fn primary_key_index(&self) -> Result<usize> {
        let mut keys = self
            .fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.primary_key)
            .map(|(idx, _)| idx);

        match (keys.next(), keys.next()) {
            (Some(idx), None) => Ok(idx),
            (None, _) => Err(EzError::InvalidMetadata(format!(
                "entity '{}' declares no primary key",
                self.name
            ))),
            (Some(_), Some(_)) => Err(EzError::InvalidMetadata(format!(
                "entity '{}' declares more than one primary key",
                self.name
            ))),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.fields.is_empty() {
            return Err(EzError::InvalidMetadata(format!(
                "entity '{}' has no persistent fields",
                self.name
            )));
        }
        self.primary_key_index()?;

        for (idx, field) in self.fields.iter().enumerate() {
            if self.fields[..idx].iter().any(|f| f.name == field.name) {
                return Err(EzError::InvalidMetadata(format!(
                    "entity '{}' declares field '{}' twice",
                    self.name, field.name
                )));
            }
        }
        Ok(())
    }
}

/// A record type stored in one table.
///
/// Usually derived:
///
/// ```
/// use ezsql::{EzEntity, Entity};
///
/// #[derive(Debug, Default, EzEntity)]
/// #[ez_table(name = "t_user")]
/// struct User {
///     #[ez(id, generated)]
///     id: Option<i64>,
///     #[ez(column = "user_name")]
///     name: Option<String>,
///     age: Option<i32>,
///     #[ez(skip)]
///     scratch: String,
/// }
///
/// assert_eq!(User::meta().table.as_deref(), Some("t_user"));
/// assert_eq!(User::meta().fields.len(), 3);
/// ```
///
/// Hand-written impls must keep `to_values` and `from_values` in the field
/// order of [`Entity::meta`].
pub trait Entity: Send + Sync + Sized + 'static {
    fn meta() -> &'static EntityMeta;

    /// Field values in declaration order. `None` fields map to NULL.
    fn to_values(&self) -> Vec<Value>;

    /// Rebuilds an instance from cells in declaration order. `None` cells and
    /// cells that do not convert leave the field at its default.
    fn from_values(values: Vec<Option<Value>>) -> Self;
}
