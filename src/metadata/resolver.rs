use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::trace;

use super::{Entity, EntityMeta};
use crate::config::EzConfig;
use crate::core::{EzError, Result};
use crate::dialect::Dialect;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    /// Logical field name.
    pub field: String,
    /// Column name after the naming pattern or explicit override.
    pub column: String,
    /// `column` as it appears in SQL, escaped when it is a reserved word.
    pub sql: String,
    pub primary_key: bool,
    pub generated: bool,
}

/// An entity's table and columns, resolved under one configuration.
#[derive(Debug, Clone)]
pub struct ResolvedEntity {
    name: String,
    table: String,
    columns: Vec<ResolvedColumn>,
    primary_key: usize,
    by_field: HashMap<String, usize>,
    by_column: HashMap<String, usize>,
}

impl ResolvedEntity {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Table name as it appears in SQL.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Columns in field declaration order.
    pub fn columns(&self) -> &[ResolvedColumn] {
        &self.columns
    }

    pub fn primary_key(&self) -> &ResolvedColumn {
        &self.columns[self.primary_key]
    }

    pub fn primary_key_index(&self) -> usize {
        self.primary_key
    }

    pub fn field(&self, name: &str) -> Result<&ResolvedColumn> {
        self.by_field
            .get(name)
            .map(|&idx| &self.columns[idx])
            .ok_or_else(|| EzError::unresolved(&self.name, name))
    }

    /// Inverse lookup used by the row mapper: result column label to field
    /// position. Case-insensitive, and accepts the logical field name too
    /// since drivers differ in how they report labels.
    pub fn position_of_column(&self, label: &str) -> Option<usize> {
        let key = label.to_lowercase();
        self.by_column
            .get(&key)
            .or_else(|| self.by_field.get(label))
            .copied()
            .or_else(|| {
                self.columns
                    .iter()
                    .position(|c| c.field.eq_ignore_ascii_case(label))
            })
    }
}

/// Maps entity names to SQL identifiers.
///
/// Shared read-only after startup; resolved entities are cached per Rust
/// type on first use.
pub struct Resolver {
    config: Arc<EzConfig>,
    dialect: Dialect,
    cache: RwLock<HashMap<TypeId, Arc<ResolvedEntity>>>,
}

impl Resolver {
    pub fn new(config: Arc<EzConfig>) -> Self {
        let dialect = Dialect::from_config(&config);
        Self {
            config,
            dialect,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &EzConfig {
        &self.config
    }

    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    pub fn resolve<E: Entity>(&self) -> Result<Arc<ResolvedEntity>> {
        let key = TypeId::of::<E>();
        {
            let cache = self.cache.read().unwrap_or_else(|e| e.into_inner());
            if let Some(resolved) = cache.get(&key) {
                return Ok(Arc::clone(resolved));
            }
        }

        let resolved = Arc::new(self.resolve_meta(E::meta())?);
        let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());
        // Another caller may have raced us here; both results are identical.
        let entry = cache.entry(key).or_insert(resolved);
        Ok(Arc::clone(entry))
    }

    /// Uncached resolution for metadata that is not tied to a Rust type.
    pub fn resolve_meta(&self, meta: &EntityMeta) -> Result<ResolvedEntity> {
        meta.validate()?;

        let table = self.resolve_table(meta);
        let mut columns = Vec::with_capacity(meta.fields.len());
        let mut by_field = HashMap::with_capacity(meta.fields.len());
        let mut by_column = HashMap::with_capacity(meta.fields.len());

        for (idx, field) in meta.fields.iter().enumerate() {
            let column = self.column_name(field.column.as_deref(), &field.name);
            by_field.insert(field.name.clone(), idx);
            by_column.insert(column.to_lowercase(), idx);
            columns.push(ResolvedColumn {
                field: field.name.clone(),
                sql: self.escape(&column),
                column,
                primary_key: field.primary_key,
                generated: field.generated,
            });
        }

        trace!(entity = %meta.name, table = %table, columns = columns.len(), "resolved entity");

        Ok(ResolvedEntity {
            name: meta.name.clone(),
            table,
            columns,
            primary_key: meta.primary_key_index()?,
            by_field,
            by_column,
        })
    }

    pub fn resolve_table(&self, meta: &EntityMeta) -> String {
        let raw = match &meta.table {
            Some(table) => table.clone(),
            None => self.config.table_name_pattern.apply(&meta.name),
        };
        self.escape(&raw)
    }

    pub fn resolve_column(&self, meta: &EntityMeta, field: &str) -> Result<String> {
        let field_meta = meta
            .fields
            .iter()
            .find(|f| f.name == field)
            .ok_or_else(|| EzError::unresolved(&meta.name, field))?;
        let column = self.column_name(field_meta.column.as_deref(), &field_meta.name);
        Ok(self.escape(&column))
    }

    /// Validates a caller-supplied column name and escapes it.
    pub fn raw_column(&self, entity: &str, name: &str) -> Result<String> {
        let valid = !name.is_empty()
            && !name.starts_with('.')
            && !name.ends_with('.')
            && name
                .chars()
                .all(|c| c.is_alphanumeric() || c == '_' || c == '$' || c == '.');
        if !valid {
            return Err(EzError::unresolved(entity, name));
        }
        Ok(self.escape(name))
    }

    /// Quotes each dotted part of `ident` that is a reserved word, when
    /// keyword escaping is enabled.
    pub fn escape(&self, ident: &str) -> String {
        if !self.config.escape_keyword {
            return ident.to_string();
        }
        ident
            .split('.')
            .map(|part| {
                if self.dialect.is_reserved(part) {
                    self.dialect.quote(part)
                } else {
                    part.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    fn column_name(&self, explicit: Option<&str>, field: &str) -> String {
        match explicit {
            Some(column) => column.to_string(),
            None => self.config.table_name_pattern.apply(field),
        }
    }
}
