//! Per-database rules: paging syntax, identifier quoting, reserved words.

mod keywords;

pub use keywords::reserved_words;

use crate::config::{DbType, EzConfig};
use crate::core::{EzError, Result, Value};
use crate::query::Page;

/// How a page window is attached to a SELECT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagingPolicy {
    /// `... LIMIT ? OFFSET ?`
    LimitOffset,
    /// `... OFFSET ? ROWS FETCH NEXT ? ROWS ONLY`
    OffsetFetch,
    /// Oracle before 12c: the statement is wrapped twice and filtered on ROWNUM.
    OracleRownum,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialect {
    db_type: DbType,
    oracle_offset_fetch: bool,
}

impl Dialect {
    pub fn new(db_type: DbType) -> Self {
        Self {
            db_type,
            oracle_offset_fetch: false,
        }
    }

    pub fn from_config(config: &EzConfig) -> Self {
        Self {
            db_type: config.db_type.clone(),
            oracle_offset_fetch: config.enable_oracle_offset_fetch_page,
        }
    }

    pub fn db_type(&self) -> &DbType {
        &self.db_type
    }

    pub fn paging_policy(&self) -> PagingPolicy {
        match self.db_type {
            DbType::Oracle if self.oracle_offset_fetch => PagingPolicy::OffsetFetch,
            DbType::Oracle => PagingPolicy::OracleRownum,
            DbType::SqlServer => PagingPolicy::OffsetFetch,
            DbType::MySql
            | DbType::Dm
            | DbType::PostgreSql
            | DbType::Sqlite
            | DbType::Other(_) => PagingPolicy::LimitOffset,
        }
    }

    pub fn quote_chars(&self) -> (char, char) {
        match self.db_type {
            DbType::MySql => ('`', '`'),
            DbType::SqlServer => ('[', ']'),
            _ => ('"', '"'),
        }
    }

    pub fn is_reserved(&self, ident: &str) -> bool {
        reserved_words(&self.db_type).contains(ident.to_ascii_uppercase().as_str())
    }

    /// Wraps `ident` in the dialect's quote characters.
    pub fn quote(&self, ident: &str) -> String {
        let (open, close) = self.quote_chars();
        format!("{open}{ident}{close}")
    }

    /// Oracle has no multi-row `VALUES (..), (..)` form.
    pub fn supports_multi_row_values(&self) -> bool {
        !matches!(self.db_type, DbType::Oracle)
    }

    /// Most bind parameters one statement may carry. Multi-row inserts and
    /// key lists are split into statements that stay under it.
    pub fn max_params(&self) -> usize {
        match self.db_type {
            DbType::SqlServer => 2100,
            DbType::Sqlite | DbType::Other(_) => 32766,
            DbType::MySql | DbType::PostgreSql | DbType::Oracle | DbType::Dm => 65535,
        }
    }

    /// Appends the page window to a compiled SELECT. Window parameters are
    /// pushed after the statement's own, matching placeholder order.
    pub fn paginate(
        &self,
        sql: &mut String,
        params: &mut Vec<Value>,
        page: Page,
        has_order_by: bool,
    ) -> Result<()> {
        match self.paging_policy() {
            PagingPolicy::LimitOffset => {
                sql.push_str(" LIMIT ? OFFSET ?");
                params.push(bind_u64(page.limit));
                params.push(bind_u64(page.offset));
            }
            PagingPolicy::OffsetFetch => {
                if self.db_type == DbType::SqlServer && !has_order_by {
                    return Err(EzError::UnsupportedDialectFeature(
                        "sqlserver OFFSET/FETCH paging requires an ORDER BY".into(),
                    ));
                }
                sql.push_str(" OFFSET ? ROWS FETCH NEXT ? ROWS ONLY");
                params.push(bind_u64(page.offset));
                params.push(bind_u64(page.limit));
            }
            PagingPolicy::OracleRownum => {
                let inner = std::mem::take(sql);
                *sql = format!(
                    "SELECT * FROM (SELECT ez_t.*, ROWNUM ez_rn FROM ({inner}) ez_t WHERE ROWNUM <= ?) WHERE ez_rn > ?"
                );
                params.push(bind_u64(page.end()));
                params.push(bind_u64(page.offset));
            }
        }
        Ok(())
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self::new(DbType::default())
    }
}

fn bind_u64(n: u64) -> Value {
    Value::Integer(i64::try_from(n).unwrap_or(i64::MAX))
}
