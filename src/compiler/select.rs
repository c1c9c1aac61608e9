use tracing::trace;

use super::{CompiledSql, SqlCompiler};
use crate::core::Result;
use crate::metadata::ResolvedEntity;
use crate::query::QueryDescriptor;

impl SqlCompiler<'_> {
    /// `SELECT <projection> FROM <table> [WHERE] [ORDER BY] [page]`
    pub fn compile_select(
        &self,
        query: &QueryDescriptor,
        entity: &ResolvedEntity,
    ) -> Result<CompiledSql> {
        let projection = if query.projection.is_empty() {
            entity
                .columns()
                .iter()
                .map(|c| c.sql.clone())
                .collect::<Vec<_>>()
        } else {
            query
                .projection
                .iter()
                .map(|operand| self.operand_sql(operand, entity))
                .collect::<Result<Vec<_>>>()?
        };

        let mut params = Vec::new();
        let mut sql = format!("SELECT {} FROM {}", projection.join(", "), entity.table());
        self.push_where(&mut sql, &mut params, query, entity)?;

        if query.has_order_by() {
            let items = query
                .order_by
                .iter()
                .map(|item| {
                    self.operand_sql(&item.operand, entity)
                        .map(|column| format!("{column} {}", item.direction.sql()))
                })
                .collect::<Result<Vec<_>>>()?;
            sql.push_str(" ORDER BY ");
            sql.push_str(&items.join(", "));
        }

        if let Some(page) = query.page {
            self.resolver
                .dialect()
                .paginate(&mut sql, &mut params, page, query.has_order_by())?;
        }

        trace!(entity = entity.name(), sql = %sql, "compiled select");
        Ok(CompiledSql::new(sql, params))
    }

    /// `SELECT COUNT(*) FROM <table> [WHERE]`, sharing the condition
    /// compilation with [`compile_select`](Self::compile_select). Ordering
    /// and the page window are ignored.
    pub fn compile_count(
        &self,
        query: &QueryDescriptor,
        entity: &ResolvedEntity,
    ) -> Result<CompiledSql> {
        let mut params = Vec::new();
        let mut sql = format!("SELECT COUNT(*) FROM {}", entity.table());
        self.push_where(&mut sql, &mut params, query, entity)?;

        trace!(entity = entity.name(), sql = %sql, "compiled count");
        Ok(CompiledSql::new(sql, params))
    }

    fn push_where(
        &self,
        sql: &mut String,
        params: &mut Vec<crate::core::Value>,
        query: &QueryDescriptor,
        entity: &ResolvedEntity,
    ) -> Result<()> {
        if let Some(filter) = self.compile_condition(&query.condition, entity, params)? {
            sql.push_str(" WHERE ");
            sql.push_str(&filter);
        }
        Ok(())
    }
}
