mod naming;

pub use naming::NamingPattern;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::{EzError, Result};

/// Database product the compiled SQL targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DbType {
    #[default]
    MySql,
    Oracle,
    /// Dameng; Oracle-compatible identifiers, MySQL-style paging.
    Dm,
    PostgreSql,
    SqlServer,
    Sqlite,
    /// Anything we have no dialect rules for. Compiles with the generic
    /// LIMIT/OFFSET policy and double-quote escaping.
    Other(String),
}

impl DbType {
    pub fn name(&self) -> &str {
        match self {
            Self::MySql => "mysql",
            Self::Oracle => "oracle",
            Self::Dm => "dm",
            Self::PostgreSql => "postgresql",
            Self::SqlServer => "sqlserver",
            Self::Sqlite => "sqlite",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for DbType {
    fn from(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Self::MySql,
            "oracle" => Self::Oracle,
            "dm" | "dameng" => Self::Dm,
            "postgresql" | "postgres" | "pg" => Self::PostgreSql,
            "sqlserver" | "sql_server" | "mssql" => Self::SqlServer,
            "sqlite" => Self::Sqlite,
            _ => Self::Other(name.trim().to_string()),
        }
    }
}

impl From<String> for DbType {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<DbType> for String {
    fn from(db_type: DbType) -> Self {
        db_type.name().to_string()
    }
}

impl fmt::Display for DbType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compiler and mapper options.
///
/// Built once by startup code, then shared read-only (`Arc<EzConfig>`) by
/// every DAO and compiler invocation.
///
/// # Examples
///
/// ```
/// use ezsql::{DbType, EzConfig, NamingPattern};
///
/// let config = EzConfig::new(DbType::Oracle)
///     .escape_keyword(true)
///     .table_name_pattern(NamingPattern::UpperSnake)
///     .enable_oracle_offset_fetch_page(true);
///
/// assert!(config.escape_keyword);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EzConfig {
    pub db_type: DbType,

    /// Quote identifiers that collide with the dialect's reserved words.
    pub escape_keyword: bool,

    /// Applied to entity type and field names without an explicit override.
    pub table_name_pattern: NamingPattern,

    /// Use `OFFSET .. FETCH NEXT` on Oracle (12c+) instead of ROWNUM wrapping.
    pub enable_oracle_offset_fetch_page: bool,

    /// Applied to result column names when rows are returned as maps.
    pub map_ret_key_pattern: NamingPattern,
}

impl EzConfig {
    pub fn new(db_type: DbType) -> Self {
        Self {
            db_type,
            escape_keyword: true,
            table_name_pattern: NamingPattern::Original,
            enable_oracle_offset_fetch_page: false,
            map_ret_key_pattern: NamingPattern::Original,
        }
    }

    pub fn db_type(mut self, db_type: DbType) -> Self {
        self.db_type = db_type;
        self
    }

    pub fn escape_keyword(mut self, escape: bool) -> Self {
        self.escape_keyword = escape;
        self
    }

    pub fn table_name_pattern(mut self, pattern: NamingPattern) -> Self {
        self.table_name_pattern = pattern;
        self
    }

    pub fn enable_oracle_offset_fetch_page(mut self, enable: bool) -> Self {
        self.enable_oracle_offset_fetch_page = enable;
        self
    }

    pub fn map_ret_key_pattern(mut self, pattern: NamingPattern) -> Self {
        self.map_ret_key_pattern = pattern;
        self
    }

    /// Parse a JSON document produced by whatever property source the host
    /// application uses. Missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let DbType::Other(name) = &self.db_type {
            if name.is_empty() {
                return Err(EzError::Config("dbType cannot be empty".into()));
            }
        }

        if self.enable_oracle_offset_fetch_page && self.db_type != DbType::Oracle {
            tracing::warn!(
                db_type = %self.db_type,
                "enableOracleOffsetFetchPage only applies to oracle and will be ignored"
            );
        }

        Ok(())
    }
}

impl Default for EzConfig {
    fn default() -> Self {
        Self::new(DbType::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EzConfig::default();
        assert_eq!(config.db_type, DbType::MySql);
        assert!(config.escape_keyword);
        assert_eq!(config.table_name_pattern, NamingPattern::Original);
        assert!(!config.enable_oracle_offset_fetch_page);
    }

    #[test]
    fn test_builder_pattern() {
        let config = EzConfig::new(DbType::PostgreSql)
            .escape_keyword(false)
            .table_name_pattern(NamingPattern::LowerSnake)
            .map_ret_key_pattern(NamingPattern::Camel);

        assert_eq!(config.db_type, DbType::PostgreSql);
        assert!(!config.escape_keyword);
        assert_eq!(config.table_name_pattern, NamingPattern::LowerSnake);
        assert_eq!(config.map_ret_key_pattern, NamingPattern::Camel);
    }

    #[test]
    fn test_db_type_parsing() {
        assert_eq!(DbType::from("ORACLE"), DbType::Oracle);
        assert_eq!(DbType::from("postgres"), DbType::PostgreSql);
        assert_eq!(DbType::from("mssql"), DbType::SqlServer);
        assert_eq!(DbType::from("h2"), DbType::Other("h2".into()));
    }

    #[test]
    fn test_from_json() {
        let config = EzConfig::from_json(
            r#"{"dbType": "oracle", "escapeKeyword": false, "tableNamePattern": "UPPER_SNAKE", "enableOracleOffsetFetchPage": true}"#,
        )
        .unwrap();

        assert_eq!(config.db_type, DbType::Oracle);
        assert!(!config.escape_keyword);
        assert_eq!(config.table_name_pattern, NamingPattern::UpperSnake);
        assert!(config.enable_oracle_offset_fetch_page);
        assert_eq!(config.map_ret_key_pattern, NamingPattern::Original);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            EzConfig::from_json("{\"escapeKeyword\": \"maybe\"}"),
            Err(EzError::Config(_))
        ));
        assert!(EzConfig::from_json("{\"dbType\": \"\"}").is_err());
    }
}
