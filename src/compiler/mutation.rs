use tracing::{trace, warn};

use super::{CompiledMutation, CompiledSql, SqlCompiler};
use crate::core::{EzError, Result, Row, Value};
use crate::metadata::ResolvedEntity;
use crate::query::{Mutation, Operand, Target};

impl SqlCompiler<'_> {
    /// Compiles a write into the statements that carry it out, in order.
    ///
    /// `multi_row` allows a multi-row `VALUES` list for inserts when the
    /// dialect has one; otherwise multi-row inserts become a
    /// [`CompiledMutation::Batch`]. Inserts and key-list deletes are split so
    /// no statement exceeds [`Dialect::max_params`](crate::dialect::Dialect::max_params).
    /// Updates and deletes without a usable WHERE clause are rejected before
    /// any SQL is produced.
    pub fn compile_mutation(
        &self,
        mutation: &Mutation,
        entity: &ResolvedEntity,
        multi_row: bool,
    ) -> Result<Vec<CompiledMutation>> {
        let compiled = match mutation {
            Mutation::Insert(rows) => self.compile_insert(rows, entity, multi_row)?,
            Mutation::Update { row, target } => vec![CompiledMutation::Single(
                self.compile_update(row, target, entity, true)?,
            )],
            Mutation::Replace { row, target } => vec![CompiledMutation::Single(
                self.compile_update(row, target, entity, false)?,
            )],
            Mutation::Delete(Target::Keys(keys)) if !keys.is_empty() => keys
                .chunks(self.resolver.dialect().max_params())
                .map(|chunk| self.compile_delete(&Target::Keys(chunk.to_vec()), entity))
                .collect::<Result<Vec<_>>>()?,
            Mutation::Delete(target) => vec![self.compile_delete(target, entity)?],
        };
        trace!(
            entity = entity.name(),
            statements = compiled.len(),
            sql = compiled.first().map(CompiledMutation::sql),
            "compiled {}",
            mutation.statement()
        );
        Ok(compiled)
    }

    fn compile_delete(&self, target: &Target, entity: &ResolvedEntity) -> Result<CompiledMutation> {
        let mut params = Vec::new();
        let filter = self.compile_target(target, "DELETE", entity, &mut params)?;
        Ok(CompiledMutation::Single(CompiledSql::new(
            format!("DELETE FROM {} WHERE {filter}", entity.table()),
            params,
        )))
    }

    fn compile_insert(
        &self,
        rows: &[Row],
        entity: &ResolvedEntity,
        multi_row: bool,
    ) -> Result<Vec<CompiledMutation>> {
        if rows.is_empty() {
            return Err(EzError::EmptyAssignment(format!(
                "insert into {} has no rows",
                entity.table()
            )));
        }
        for row in rows {
            check_width(row, entity)?;
        }

        if !entity.primary_key().generated {
            return Ok(self.insert_rows(rows, entity, false, multi_row));
        }
        // A NULL generated key is left to the database, so keyed and keyless
        // runs go into separate statements and NULL is never bound to it.
        let pk = entity.primary_key_index();
        Ok(rows
            .chunk_by(|a, b| a[pk].is_null() == b[pk].is_null())
            .flat_map(|run| self.insert_rows(run, entity, run[0][pk].is_null(), multi_row))
            .collect())
    }

    fn insert_rows(
        &self,
        rows: &[Row],
        entity: &ResolvedEntity,
        skip_key: bool,
        multi_row: bool,
    ) -> Vec<CompiledMutation> {
        let pk = entity.primary_key_index();
        let included: Vec<usize> = (0..entity.columns().len())
            .filter(|&idx| !(skip_key && idx == pk))
            .collect();

        let columns = included
            .iter()
            .map(|&idx| entity.columns()[idx].sql.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let tuple = format!("({})", vec!["?"; included.len()].join(", "));
        let head = format!("INSERT INTO {} ({columns}) VALUES ", entity.table());
        let pick = |row: &Row| -> Vec<Value> { included.iter().map(|&idx| row[idx].clone()).collect() };

        if rows.len() == 1 {
            return vec![CompiledMutation::Single(CompiledSql::new(
                format!("{head}{tuple}"),
                pick(&rows[0]),
            ))];
        }

        let dialect = self.resolver.dialect();
        if multi_row && dialect.supports_multi_row_values() {
            let per_statement = (dialect.max_params() / included.len().max(1)).max(1);
            return rows
                .chunks(per_statement)
                .map(|chunk| {
                    let sql = format!("{head}{}", vec![tuple.as_str(); chunk.len()].join(", "));
                    let params = chunk.iter().flat_map(|row| pick(row)).collect();
                    CompiledMutation::Single(CompiledSql::new(sql, params))
                })
                .collect();
        }

        vec![CompiledMutation::Batch {
            sql: format!("{head}{tuple}"),
            param_sets: rows.iter().map(|row| pick(row)).collect(),
        }]
    }

    fn compile_update(
        &self,
        row: &Row,
        target: &Target,
        entity: &ResolvedEntity,
        sparse: bool,
    ) -> Result<CompiledSql> {
        check_width(row, entity)?;

        let mut where_params = Vec::new();
        let filter = self.compile_target(target, "UPDATE", entity, &mut where_params)?;

        let mut assignments = Vec::new();
        let mut params = Vec::new();
        for (column, value) in entity.columns().iter().zip(row) {
            if column.primary_key || (sparse && value.is_null()) {
                continue;
            }
            assignments.push(format!("{} = ?", column.sql));
            params.push(value.clone());
        }
        if assignments.is_empty() {
            return Err(EzError::EmptyAssignment(format!(
                "update of {} assigns no columns",
                entity.table()
            )));
        }

        params.extend(where_params);
        Ok(CompiledSql::new(
            format!(
                "UPDATE {} SET {} WHERE {filter}",
                entity.table(),
                assignments.join(", ")
            ),
            params,
        ))
    }

    fn compile_target(
        &self,
        target: &Target,
        statement: &'static str,
        entity: &ResolvedEntity,
        params: &mut Vec<Value>,
    ) -> Result<String> {
        let key = Operand::Field(entity.primary_key().field.clone());
        let condition = match target {
            Target::Key(value) if value.is_null() => None,
            Target::Key(value) => Some(key.eq(value.clone())),
            Target::Keys(values) if values.is_empty() => None,
            Target::Keys(values) => Some(key.is_in(values.iter().cloned())),
            Target::Where(condition) => Some(condition.clone()),
        };

        let filter = match condition {
            Some(condition) => self.compile_condition(&condition, entity, params)?,
            None => None,
        };
        filter.ok_or_else(|| {
            warn!(entity = entity.name(), statement, "refusing mutation without a condition");
            EzError::EmptyConditionOnMutation {
                statement,
                table: entity.table().to_string(),
            }
        })
    }
}

fn check_width(row: &Row, entity: &ResolvedEntity) -> Result<()> {
    if row.len() != entity.columns().len() {
        return Err(EzError::MappingMismatch(format!(
            "{} expects {} values per row, got {}",
            entity.name(),
            entity.columns().len(),
            row.len()
        )));
    }
    Ok(())
}
