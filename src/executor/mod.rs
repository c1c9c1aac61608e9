//! Forwards compiled statements to a [`Session`].

use tracing::debug;

use crate::compiler::{CompiledMutation, CompiledSql};
use crate::core::{EzError, Result};
use crate::interface::Session;
use crate::result::QueryResult;

/// Thin adapter between compiled SQL and the caller's session.
///
/// Logs every statement under the `ezsql::sql` target and wraps session
/// failures into [`EzError::ExecutionFailure`]. Holds no SQL logic.
pub struct Executor<'s, S: Session + ?Sized> {
    session: &'s S,
}

impl<'s, S: Session + ?Sized> Executor<'s, S> {
    pub fn new(session: &'s S) -> Self {
        Self { session }
    }

    pub async fn query(&self, compiled: &CompiledSql) -> Result<QueryResult> {
        debug!(target: "ezsql::sql", sql = %compiled.sql, params = compiled.params.len(), "query");
        let result = self
            .session
            .execute_query(&compiled.sql, &compiled.params)
            .await
            .map_err(EzError::ExecutionFailure)?;
        debug!(target: "ezsql::sql", rows = result.row_count(), "query done");
        Ok(result)
    }

    pub async fn update(&self, compiled: &CompiledSql) -> Result<u64> {
        debug!(target: "ezsql::sql", sql = %compiled.sql, params = compiled.params.len(), "update");
        let affected = self
            .session
            .execute_update(&compiled.sql, &compiled.params)
            .await
            .map_err(EzError::ExecutionFailure)?;
        debug!(target: "ezsql::sql", affected, "update done");
        Ok(affected)
    }

    pub async fn mutate(&self, compiled: &CompiledMutation) -> Result<u64> {
        match compiled {
            CompiledMutation::Single(sql) => self.update(sql).await,
            CompiledMutation::Batch { sql, param_sets } => {
                debug!(target: "ezsql::sql", sql = %sql, batch = param_sets.len(), "batch");
                let affected = self
                    .session
                    .execute_batch(sql, param_sets)
                    .await
                    .map_err(EzError::ExecutionFailure)?;
                debug!(target: "ezsql::sql", affected, "batch done");
                Ok(affected)
            }
        }
    }

    /// Runs already compiled mutations in order, stopping at the first
    /// failure. Returns the summed affected row count.
    pub async fn mutate_all(&self, compiled: &[CompiledMutation]) -> Result<u64> {
        let mut affected = 0;
        for mutation in compiled {
            affected += self.mutate(mutation).await?;
        }
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::core::{SessionError, Value};

    /// Records every statement. Updates fail when the SQL mentions `boom`.
    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Session for Recorder {
        async fn execute_query(
            &self,
            sql: &str,
            _params: &[Value],
        ) -> std::result::Result<QueryResult, SessionError> {
            self.seen.lock().unwrap().push(sql.to_string());
            Ok(QueryResult::new(vec!["c".into()], vec![vec![Value::Integer(1)]]))
        }

        async fn execute_update(
            &self,
            sql: &str,
            params: &[Value],
        ) -> std::result::Result<u64, SessionError> {
            self.seen.lock().unwrap().push(sql.to_string());
            if sql.contains("boom") {
                return Err("boom".into());
            }
            Ok(params.len() as u64)
        }
    }

    #[test]
    fn test_query_passes_rows_through() {
        let session = Recorder::default();
        let result = tokio_test::block_on(
            Executor::new(&session).query(&CompiledSql::new("SELECT 1", vec![])),
        )
        .unwrap();
        assert_eq!(result.scalar(), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_batch_uses_default_loop() {
        let session = Recorder::default();
        let batch = CompiledMutation::Batch {
            sql: "INSERT INTO t (a) VALUES (?)".into(),
            param_sets: vec![vec![Value::Integer(1)], vec![Value::Integer(2)]],
        };
        let affected = tokio_test::block_on(Executor::new(&session).mutate(&batch)).unwrap();
        assert_eq!(affected, 2);
        assert_eq!(session.seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_mutate_all_stops_at_first_failure() {
        let session = Recorder::default();
        let compiled = vec![
            CompiledMutation::Single(CompiledSql::new("DELETE FROM boom WHERE id = ?", vec![Value::Integer(1)])),
            CompiledMutation::Single(CompiledSql::new("DELETE FROM t WHERE id = ?", vec![Value::Integer(2)])),
        ];
        let err = tokio_test::block_on(Executor::new(&session).mutate_all(&compiled)).unwrap_err();
        assert!(matches!(err, EzError::ExecutionFailure(_)));
        assert_eq!(session.seen.lock().unwrap().len(), 1);
    }
}
