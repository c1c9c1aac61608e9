use std::collections::HashSet;

use lazy_static::lazy_static;

use crate::config::DbType;

const COMMON: &[&str] = &[
    "ADD", "ALL", "ALTER", "AND", "ANY", "AS", "ASC", "BETWEEN", "BY", "CASE", "CHECK",
    "COLUMN", "CONSTRAINT", "CREATE", "CROSS", "CURRENT", "DATE", "DEFAULT", "DELETE", "DESC",
    "DISTINCT", "DROP", "ELSE", "END", "EXISTS", "FALSE", "FOR", "FOREIGN", "FROM", "FULL",
    "GRANT", "GROUP", "HAVING", "IN", "INDEX", "INNER", "INSERT", "INTERSECT", "INTO", "IS",
    "JOIN", "KEY", "LEFT", "LIKE", "NOT", "NULL", "OF", "ON", "OR", "ORDER", "OUTER",
    "PRIMARY", "REFERENCES", "RIGHT", "SELECT", "SET", "TABLE", "THEN", "TO", "TRUE",
    "UNION", "UNIQUE", "UPDATE", "USER", "USING", "VALUES", "VIEW", "WHEN", "WHERE", "WITH",
];

const MYSQL: &[&str] = &[
    "CHANGE", "CONDITION", "DATABASE", "DESCRIBE", "DIV", "DUAL", "EXPLAIN", "FULLTEXT",
    "IGNORE", "INTERVAL", "KEYS", "KILL", "LIMIT", "LOCK", "MATCH", "MOD", "RANGE", "READ",
    "REGEXP", "RELEASE", "RENAME", "REPLACE", "RLIKE", "SCHEMA", "SHOW", "STATUS", "RANK",
    "ROW", "ROWS", "SEPARATOR", "SPATIAL", "USAGE", "WRITE", "XOR",
];

const ORACLE: &[&str] = &[
    "ACCESS", "AUDIT", "CLUSTER", "COMMENT", "COMPRESS", "EXCLUSIVE", "FILE", "IDENTIFIED",
    "IMMEDIATE", "INCREMENT", "INITIAL", "LEVEL", "LOCK", "LONG", "MAXEXTENTS", "MINUS", "MODE",
    "MODIFY", "NOAUDIT", "NOCOMPRESS", "NUMBER", "OFFLINE", "ONLINE", "OPTION", "PCTFREE",
    "PRIOR", "RAW", "RENAME", "RESOURCE", "ROW", "ROWID", "ROWNUM", "ROWS", "SESSION", "SIZE",
    "START", "SUCCESSFUL", "SYNONYM", "SYSDATE", "TRIGGER", "UID", "VALIDATE", "VARCHAR",
    "VARCHAR2", "WHENEVER",
];

const POSTGRES: &[&str] = &[
    "ANALYSE", "ANALYZE", "ARRAY", "ASYMMETRIC", "BOTH", "CAST", "COLLATE", "CURRENT_USER",
    "DEFERRABLE", "DO", "EXCEPT", "FETCH", "ILIKE", "INITIALLY", "LATERAL", "LEADING", "LIMIT",
    "OFFSET", "ONLY", "PLACING", "RETURNING", "SESSION_USER", "SOME", "SYMMETRIC", "TRAILING",
    "VARIADIC", "WINDOW",
];

const SQLSERVER: &[&str] = &[
    "BACKUP", "BREAK", "BROWSE", "BULK", "CLUSTERED", "COMPUTE", "CONTAINS", "DATABASE",
    "DENY", "DISK", "DUMP", "ERRLVL", "EXEC", "EXECUTE", "FILE", "FILLFACTOR", "IDENTITY",
    "KILL", "LINENO", "MERGE", "NOCHECK", "OFFSETS", "OPEN", "OVER", "PERCENT", "PIVOT",
    "PLAN", "PRINT", "PROC", "PUBLIC", "RULE", "SCHEMA", "TOP", "TRAN", "TRUNCATE", "VARYING",
];

const SQLITE: &[&str] = &[
    "ABORT", "AUTOINCREMENT", "CONFLICT", "FAIL", "GLOB", "INDEXED", "ISNULL", "LIMIT",
    "NOTNULL", "OFFSET", "PRAGMA", "RAISE", "REGEXP", "REINDEX", "REPLACE", "VACUUM",
];

fn build(extra: &[&[&'static str]]) -> HashSet<&'static str> {
    COMMON
        .iter()
        .chain(extra.iter().flat_map(|words| words.iter()))
        .copied()
        .collect()
}

lazy_static! {
    static ref MYSQL_WORDS: HashSet<&'static str> = build(&[MYSQL]);
    static ref ORACLE_WORDS: HashSet<&'static str> = build(&[ORACLE]);
    static ref POSTGRES_WORDS: HashSet<&'static str> = build(&[POSTGRES]);
    static ref SQLSERVER_WORDS: HashSet<&'static str> = build(&[SQLSERVER]);
    static ref SQLITE_WORDS: HashSet<&'static str> = build(&[SQLITE]);
    static ref ANY_WORDS: HashSet<&'static str> =
        build(&[MYSQL, ORACLE, POSTGRES, SQLSERVER, SQLITE]);
}

/// Reserved words for a database type, upper-cased.
pub fn reserved_words(db_type: &DbType) -> &'static HashSet<&'static str> {
    match db_type {
        DbType::MySql => &*MYSQL_WORDS,
        DbType::Oracle | DbType::Dm => &*ORACLE_WORDS,
        DbType::PostgreSql => &*POSTGRES_WORDS,
        DbType::SqlServer => &*SQLSERVER_WORDS,
        DbType::Sqlite => &*SQLITE_WORDS,
        DbType::Other(_) => &*ANY_WORDS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_words_everywhere() {
        for db in [DbType::MySql, DbType::Oracle, DbType::SqlServer, DbType::Other("h2".into())] {
            assert!(reserved_words(&db).contains("ORDER"), "{db}");
        }
    }

    #[test]
    fn test_dialect_specific_words() {
        assert!(reserved_words(&DbType::Oracle).contains("LEVEL"));
        assert!(!reserved_words(&DbType::MySql).contains("LEVEL"));
        assert!(reserved_words(&DbType::MySql).contains("LIMIT"));
    }
}
