//! Query gateway
//!
//! The gateway is the only component that runs SQL text. Learner queries go
//! through [`QueryGateway::execute`], which never fails: engine errors come
//! back as [`QueryOutcome::Failed`] so the session can carry on. Results are
//! rendered the way the sqlite3 shell prints them in list mode, columns joined
//! with `|` and rows joined with newlines, capped at the configured row limit.

use anyhow::{anyhow, Result};
use rusqlite::types::ValueRef;
use rusqlite::OptionalExtension;
use std::fmt;
use tracing::debug;

use crate::database::core::DatabaseConn;

/// Column separator in a rendered table
pub const COLUMN_SEPARATOR: &str = "|";

/// Row separator in a rendered table
pub const ROW_SEPARATOR: &str = "\n";

/// A query result in its canonical text form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedTable {
    text: String,
    row_count: usize,
}

impl RenderedTable {
    /// Render rows of already-stringified values
    pub fn from_rows(rows: &[Vec<String>]) -> Self {
        let text = rows
            .iter()
            .map(|row| row.join(COLUMN_SEPARATOR))
            .collect::<Vec<_>>()
            .join(ROW_SEPARATOR);
        RenderedTable {
            text,
            row_count: rows.len(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Number of rendered rows (never more than the row limit)
    pub fn row_count(&self) -> usize {
        self.row_count
    }
}

impl fmt::Display for RenderedTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Result of running learner-supplied SQL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome {
    /// The statement ran; holds at most `row_limit` rows
    Rows(RenderedTable),
    /// The engine rejected the statement
    Failed { message: String },
}

/// Result of a `.schema` lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaLookup {
    /// The stored `CREATE TABLE` statement
    Found(String),
    NoSuchTable(String),
    /// No table name was given
    MissingName,
}

/// Executes queries against the exercise database
pub struct QueryGateway {
    db: DatabaseConn,
    row_limit: usize,
}

impl QueryGateway {
    /// Connect to an existing database file
    ///
    /// The connection is read-only, so learner statements that would modify
    /// the exercise tables are reported as engine errors.
    pub fn connect(path: &str, row_limit: usize) -> Result<Self> {
        let db = DatabaseConn::open_existing(path, true)?;
        Self::from_conn(db, row_limit)
    }

    /// Wrap an already-open connection
    pub fn from_conn(db: DatabaseConn, row_limit: usize) -> Result<Self> {
        if row_limit == 0 {
            return Err(anyhow!("Row limit must be at least 1"));
        }
        Ok(QueryGateway { db, row_limit })
    }

    /// Run arbitrary SQL text and render at most `row_limit` rows
    pub fn execute(&self, query: &str) -> QueryOutcome {
        match self.run_query(query) {
            Ok(table) => QueryOutcome::Rows(table),
            Err(e) => {
                debug!("Query failed: {}", e);
                QueryOutcome::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    fn run_query(&self, query: &str) -> rusqlite::Result<RenderedTable> {
        let mut stmt = self.db.conn.prepare(query)?;
        let column_count = stmt.column_count();
        let mut rows = stmt.query([])?;

        let mut rendered = Vec::new();
        while rendered.len() < self.row_limit {
            let Some(row) = rows.next()? else {
                break;
            };
            let mut values = Vec::with_capacity(column_count);
            for idx in 0..column_count {
                values.push(render_value(row.get_ref(idx)?));
            }
            rendered.push(values);
        }

        Ok(RenderedTable::from_rows(&rendered))
    }

    /// Names of all tables in the database
    pub fn list_tables(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .db
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .map_err(|e| anyhow!("Failed to list tables: {}", e))?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| anyhow!("Failed to list tables: {}", e))?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(|e| anyhow!("Failed to read table names: {}", e))?;
        Ok(names)
    }

    /// Look up the stored creation statement for a table
    pub fn show_schema(&self, table_name: Option<&str>) -> Result<SchemaLookup> {
        let Some(name) = table_name.filter(|n| !n.is_empty()) else {
            return Ok(SchemaLookup::MissingName);
        };

        let sql: Option<Option<String>> = self
            .db
            .conn
            .query_row(
                "SELECT sql FROM sqlite_master WHERE type='table' AND name=?1",
                [name],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| anyhow!("Failed to look up schema for '{}': {}", name, e))?;

        Ok(match sql.flatten() {
            Some(sql) if !sql.is_empty() => SchemaLookup::Found(sql),
            _ => SchemaLookup::NoSuchTable(name.to_string()),
        })
    }
}

/// Stringify a single column value
///
/// NULL renders empty, matching the sqlite3 shell. Reals always keep a
/// fractional part so `1.0` and `1` stay distinguishable.
fn render_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => format!("{:?}", f),
        ValueRef::Text(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Blob(b) => String::from_utf8_lossy(b).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn melon_gateway(row_limit: usize) -> QueryGateway {
        let db = DatabaseConn::open_in_memory().unwrap();
        db.execute_batch(
            r#"
            CREATE TABLE melons (id INTEGER PRIMARY KEY, name TEXT, price REAL, notes TEXT);
            INSERT INTO melons VALUES (1, 'Crenshaw', 2.0, NULL);
            INSERT INTO melons VALUES (2, 'Casaba', 2.5, 'sweet');
            INSERT INTO melons VALUES (3, 'Ogen', 1.25, 'small');
            CREATE TABLE customers (id INTEGER PRIMARY KEY, email TEXT);
            "#,
        )
        .unwrap();
        QueryGateway::from_conn(db, row_limit).unwrap()
    }

    #[test]
    fn test_render_rows() {
        let gateway = melon_gateway(20);
        let outcome = gateway.execute("SELECT id, name, price, notes FROM melons ORDER BY id");
        let QueryOutcome::Rows(table) = outcome else {
            panic!("expected rows");
        };
        assert_eq!(
            table.as_str(),
            "1|Crenshaw|2.0|\n2|Casaba|2.5|sweet\n3|Ogen|1.25|small"
        );
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn test_empty_result_renders_empty_string() {
        let gateway = melon_gateway(20);
        let outcome = gateway.execute("SELECT name FROM melons WHERE id > 100");
        assert_eq!(outcome, QueryOutcome::Rows(RenderedTable::default()));
    }

    #[test]
    fn test_row_cap() {
        let gateway = melon_gateway(2);
        let QueryOutcome::Rows(table) = gateway.execute("SELECT id FROM melons ORDER BY id")
        else {
            panic!("expected rows");
        };
        assert_eq!(table.as_str(), "1\n2");
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let gateway = melon_gateway(20);
        match gateway.execute("SELEC name FROM melons") {
            QueryOutcome::Failed { message } => assert!(message.contains("syntax error")),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_table_is_reported() {
        let gateway = melon_gateway(20);
        match gateway.execute("SELECT * FROM watermelons") {
            QueryOutcome::Failed { message } => assert!(message.contains("watermelons")),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_list_tables() {
        let gateway = melon_gateway(20);
        let tables = gateway.list_tables().unwrap();
        assert_eq!(tables, vec!["melons".to_string(), "customers".to_string()]);
    }

    #[test]
    fn test_show_schema() {
        let gateway = melon_gateway(20);
        match gateway.show_schema(Some("customers")).unwrap() {
            SchemaLookup::Found(sql) => {
                assert!(sql.starts_with("CREATE TABLE customers"));
            }
            other => panic!("unexpected lookup: {:?}", other),
        }
        assert_eq!(
            gateway.show_schema(Some("orders")).unwrap(),
            SchemaLookup::NoSuchTable("orders".to_string())
        );
        assert_eq!(gateway.show_schema(None).unwrap(), SchemaLookup::MissingName);
    }

    #[test]
    fn test_connect_is_read_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quiz.db");
        let path_str = path.to_str().unwrap();
        {
            let db = DatabaseConn::open(Some(path_str)).unwrap();
            db.execute_batch(
                "CREATE TABLE melons (id INTEGER PRIMARY KEY); INSERT INTO melons VALUES (1);",
            )
            .unwrap();
        }

        let gateway = QueryGateway::connect(path_str, 20).unwrap();
        match gateway.execute("DROP TABLE melons") {
            QueryOutcome::Failed { message } => assert!(message.contains("readonly")),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(
            gateway.execute("SELECT id FROM melons"),
            QueryOutcome::Rows(RenderedTable::from_rows(&[vec!["1".to_string()]]))
        );
    }

    #[test]
    fn test_zero_row_limit_rejected() {
        let db = DatabaseConn::open_in_memory().unwrap();
        assert!(QueryGateway::from_conn(db, 0).is_err());
    }
}
