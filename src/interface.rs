use async_trait::async_trait;

use crate::core::{SessionError, Value};
use crate::result::QueryResult;

/// The database session compiled SQL is sent to.
///
/// ezsql never opens connections or manages transactions; wrap whatever
/// driver the application already uses and implement this trait. Every
/// statement uses `?` placeholders, bound positionally from `params`.
#[async_trait]
pub trait Session: Send + Sync {
    /// Execute a statement that returns rows (SELECT).
    async fn execute_query(&self, sql: &str, params: &[Value])
    -> Result<QueryResult, SessionError>;

    /// Execute a statement that modifies data. Returns the affected row count.
    async fn execute_update(&self, sql: &str, params: &[Value]) -> Result<u64, SessionError>;

    /// Execute one statement once per parameter set. Returns the summed
    /// affected row count.
    async fn execute_batch(
        &self,
        sql: &str,
        param_sets: &[Vec<Value>],
    ) -> Result<u64, SessionError> {
        let mut affected = 0;
        for params in param_sets {
            affected += self.execute_update(sql, params).await?;
        }
        Ok(affected)
    }

    /// Whether the driver accepts `INSERT .. VALUES (..), (..)`.
    fn supports_multi_row_insert(&self) -> bool {
        true
    }
}
