use super::SqlCompiler;
use crate::config::DbType;
use crate::core::{Result, Value};
use crate::metadata::ResolvedEntity;
use crate::query::{Condition, Operand};

/// Oracle rejects IN lists longer than this.
const ORACLE_IN_LIMIT: usize = 1000;

impl SqlCompiler<'_> {
    /// Renders `condition` into a WHERE fragment (without the keyword).
    ///
    /// Returns `None` for empty conditions. Parameters are appended to
    /// `params` in the same order as their `?` placeholders.
    pub fn compile_condition(
        &self,
        condition: &Condition,
        entity: &ResolvedEntity,
        params: &mut Vec<Value>,
    ) -> Result<Option<String>> {
        self.render(condition, entity, params, 0)
    }

    pub(crate) fn operand_sql(&self, operand: &Operand, entity: &ResolvedEntity) -> Result<String> {
        match operand {
            Operand::Field(name) => Ok(entity.field(name)?.sql.clone()),
            Operand::Column(name) => self.resolver.raw_column(entity.name(), name),
        }
    }

    fn render(
        &self,
        node: &Condition,
        entity: &ResolvedEntity,
        params: &mut Vec<Value>,
        depth: usize,
    ) -> Result<Option<String>> {
        let fragment = match node {
            Condition::Compare { operand, op, value } => {
                let column = self.operand_sql(operand, entity)?;
                params.push(value.clone());
                format!("{column} {} ?", op.sql())
            }
            Condition::In { operand, values } => {
                let column = self.operand_sql(operand, entity)?;
                self.render_in(&column, values, params)
            }
            Condition::Between { operand, low, high } => {
                let column = self.operand_sql(operand, entity)?;
                params.push(low.clone());
                params.push(high.clone());
                format!("{column} BETWEEN ? AND ?")
            }
            Condition::Null { operand, is_null } => {
                let column = self.operand_sql(operand, entity)?;
                if *is_null {
                    format!("{column} IS NULL")
                } else {
                    format!("{column} IS NOT NULL")
                }
            }
            Condition::Group { logic, children } => {
                let mut parts = Vec::with_capacity(children.len());
                for child in children {
                    if let Some(part) = self.render(child, entity, params, depth + 1)? {
                        parts.push(part);
                    }
                }
                match parts.len() {
                    0 => return Ok(None),
                    1 => return Ok(parts.pop()),
                    _ => {
                        let joined = parts.join(&format!(" {} ", logic.sql()));
                        if depth > 0 {
                            format!("({joined})")
                        } else {
                            joined
                        }
                    }
                }
            }
        };
        Ok(Some(fragment))
    }

    fn render_in(
        &self,
        column: &str,
        values: &[Value],
        params: &mut Vec<Value>,
    ) -> String {
        if values.is_empty() {
            return "1 = 0".to_string();
        }

        let chunk_size = match self.resolver.dialect().db_type() {
            DbType::Oracle => ORACLE_IN_LIMIT,
            _ => values.len(),
        };

        let mut chunks: Vec<String> = values
            .chunks(chunk_size)
            .map(|chunk| {
                params.extend(chunk.iter().cloned());
                let placeholders = vec!["?"; chunk.len()].join(", ");
                format!("{column} IN ({placeholders})")
            })
            .collect();

        if chunks.len() == 1 {
            return chunks.pop().unwrap_or_default();
        }
        // The OR chain must not bleed into a surrounding AND.
        format!("({})", chunks.join(" OR "))
    }
}
