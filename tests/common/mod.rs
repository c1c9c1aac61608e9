#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use ezsql::{EzEntity, QueryResult, Session, SessionError, Value};
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{Connection, params_from_iter};

// ============================================================================
// Entities
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, EzEntity)]
#[ez_table(name = "t_user")]
pub struct User {
    #[ez(id, generated)]
    pub id: Option<i64>,
    #[ez(column = "user_name")]
    pub name: Option<String>,
    pub age: Option<i32>,
    pub order: Option<i64>,
    pub active: Option<bool>,
    pub created_at: Option<NaiveDateTime>,
    #[ez(skip)]
    pub note: String,
}

pub const USER_DDL: &str = "CREATE TABLE t_user (
    id INTEGER PRIMARY KEY,
    user_name TEXT,
    age INTEGER,
    \"order\" INTEGER,
    active INTEGER,
    created_at TEXT
)";

impl User {
    pub fn new(id: Option<i64>, name: &str, age: i32) -> Self {
        Self {
            id,
            name: Some(name.to_string()),
            age: Some(age),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, EzEntity)]
pub struct Item {
    #[ez(id)]
    pub id: Option<i64>,
    pub title: Option<String>,
    pub qty: Option<i64>,
}

// ============================================================================
// SQLite-backed session
// ============================================================================

/// Runs compiled SQL against an in-memory SQLite database.
pub struct SqliteSession {
    conn: Mutex<Connection>,
    multi_row: bool,
    statements: Mutex<Vec<String>>,
}

impl SqliteSession {
    pub fn new(ddl: &str) -> Self {
        Self::build(ddl, true)
    }

    /// Reports no multi-row VALUES support, forcing per-row batches.
    pub fn without_multi_row(ddl: &str) -> Self {
        Self::build(ddl, false)
    }

    fn build(ddl: &str, multi_row: bool) -> Self {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(ddl).unwrap();
        Self {
            conn: Mutex::new(conn),
            multi_row,
            statements: Mutex::new(Vec::new()),
        }
    }

    pub fn statements(&self) -> Vec<String> {
        self.statements.lock().unwrap().clone()
    }

    fn record(&self, sql: &str) {
        self.statements.lock().unwrap().push(sql.to_string());
    }
}

fn to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Boolean(b) => SqlValue::Integer(i64::from(*b)),
        Value::Integer(i) => SqlValue::Integer(*i),
        Value::Float(f) => SqlValue::Real(*f),
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Timestamp(ts) => SqlValue::Text(ts.format("%Y-%m-%d %H:%M:%S%.f").to_string()),
    }
}

fn from_sql(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Float(f),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Value::Text(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

#[async_trait]
impl Session for SqliteSession {
    async fn execute_query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<QueryResult, SessionError> {
        self.record(sql);
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let mut rows = stmt.query(params_from_iter(params.iter().map(to_sql)))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(width);
            for idx in 0..width {
                cells.push(from_sql(row.get_ref(idx)?));
            }
            out.push(cells);
        }
        Ok(QueryResult::new(columns, out))
    }

    async fn execute_update(&self, sql: &str, params: &[Value]) -> Result<u64, SessionError> {
        self.record(sql);
        let conn = self.conn.lock().unwrap();
        let affected = conn.execute(sql, params_from_iter(params.iter().map(to_sql)))?;
        Ok(affected as u64)
    }

    fn supports_multi_row_insert(&self) -> bool {
        self.multi_row
    }
}

// ============================================================================
// Recording session
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Query { sql: String, params: Vec<Value> },
    Update { sql: String, params: Vec<Value> },
    Batch { sql: String, param_sets: Vec<Vec<Value>> },
}

impl Call {
    pub fn sql(&self) -> &str {
        match self {
            Call::Query { sql, .. } | Call::Update { sql, .. } | Call::Batch { sql, .. } => sql,
        }
    }
}

/// Records every call and answers queries from a queue of canned results.
#[derive(Default)]
pub struct MockSession {
    calls: Mutex<Vec<Call>>,
    results: Mutex<VecDeque<QueryResult>>,
    affected: u64,
    single_row_only: bool,
    failing: bool,
}

impl MockSession {
    pub fn new() -> Self {
        Self {
            affected: 1,
            ..Self::default()
        }
    }

    pub fn with_results(results: Vec<QueryResult>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            ..Self::new()
        }
    }

    pub fn single_row_only(mut self) -> Self {
        self.single_row_only = true;
        self
    }

    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn sqls(&self) -> Vec<String> {
        self.calls().iter().map(|c| c.sql().to_string()).collect()
    }

    fn outcome(&self, call: Call) -> Result<(), SessionError> {
        self.calls.lock().unwrap().push(call);
        if self.failing {
            return Err("connection reset by peer".into());
        }
        Ok(())
    }
}

#[async_trait]
impl Session for MockSession {
    async fn execute_query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<QueryResult, SessionError> {
        self.outcome(Call::Query {
            sql: sql.to_string(),
            params: params.to_vec(),
        })?;
        Ok(self
            .results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(QueryResult::empty))
    }

    async fn execute_update(&self, sql: &str, params: &[Value]) -> Result<u64, SessionError> {
        self.outcome(Call::Update {
            sql: sql.to_string(),
            params: params.to_vec(),
        })?;
        Ok(self.affected)
    }

    async fn execute_batch(
        &self,
        sql: &str,
        param_sets: &[Vec<Value>],
    ) -> Result<u64, SessionError> {
        self.outcome(Call::Batch {
            sql: sql.to_string(),
            param_sets: param_sets.to_vec(),
        })?;
        Ok(self.affected * param_sets.len() as u64)
    }

    fn supports_multi_row_insert(&self) -> bool {
        !self.single_row_only
    }
}

pub fn count_result(n: i64) -> QueryResult {
    QueryResult::new(vec!["COUNT(*)".into()], vec![vec![Value::Integer(n)]])
}
