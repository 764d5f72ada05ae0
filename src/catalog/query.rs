//! Catalog queries issued during a schema load
//!
//! Values travel as `@P1`/`@P2` parameters. The database name is a
//! three-part-name prefix, which T-SQL cannot parameterize, so it is
//! embedded as a bracket-quoted identifier instead. Without a database the
//! queries read the connection's current database.

use crate::util::{quote_identifier, strip_quotes};

/// Where the tables of a load live: an optional database and a SQL schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogScope {
    /// Database to read; `None` reads the connection's current database
    pub database: Option<String>,
    /// SQL schema (`TABLE_SCHEMA`) the tables belong to
    pub table_schema: String,
}

impl CatalogScope {
    pub fn new(database: Option<&str>, table_schema: &str) -> Self {
        Self {
            database: database.map(|db| strip_quotes(db).to_string()),
            table_schema: strip_quotes(table_schema).to_string(),
        }
    }

    /// `[db].` for an explicit database, empty otherwise
    fn prefix(&self) -> String {
        match &self.database {
            Some(db) => format!("{}.", quote_identifier(db)),
            None => String::new(),
        }
    }
}

/// A catalog query and its bound parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogQuery {
    /// Every database on the server
    Databases,
    /// Base tables of one SQL schema
    Tables { scope: CatalogScope },
    /// Columns of one table, in ordinal order
    Columns { scope: CatalogScope, table: String },
    /// Primary, unique and foreign key column rows of one table
    Constraints { scope: CatalogScope, table: String },
    /// Non-primary-key index column rows of one table
    Indexes { scope: CatalogScope, table: String },
}

impl CatalogQuery {
    /// Short label used in logs and error messages
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogQuery::Databases => "databases",
            CatalogQuery::Tables { .. } => "tables",
            CatalogQuery::Columns { .. } => "columns",
            CatalogQuery::Constraints { .. } => "constraints",
            CatalogQuery::Indexes { .. } => "indexes",
        }
    }

    /// The table this query is scoped to, if any
    pub fn table(&self) -> Option<&str> {
        match self {
            CatalogQuery::Columns { table, .. }
            | CatalogQuery::Constraints { table, .. }
            | CatalogQuery::Indexes { table, .. } => Some(table),
            CatalogQuery::Databases | CatalogQuery::Tables { .. } => None,
        }
    }

    /// The database and SQL schema this query reads, if any
    pub fn scope(&self) -> Option<&CatalogScope> {
        match self {
            CatalogQuery::Databases => None,
            CatalogQuery::Tables { scope }
            | CatalogQuery::Columns { scope, .. }
            | CatalogQuery::Constraints { scope, .. }
            | CatalogQuery::Indexes { scope, .. } => Some(scope),
        }
    }

    /// Parameter values, bound in order as `@P1`, `@P2`, ...
    pub fn params(&self) -> Vec<String> {
        match self {
            CatalogQuery::Databases => vec![],
            CatalogQuery::Tables { scope } => vec![scope.table_schema.clone()],
            CatalogQuery::Columns { scope, table }
            | CatalogQuery::Constraints { scope, table }
            | CatalogQuery::Indexes { scope, table } => {
                vec![table.clone(), scope.table_schema.clone()]
            }
        }
    }

    /// T-SQL text for this query
    pub fn sql(&self) -> String {
        match self {
            CatalogQuery::Databases => "SELECT name FROM sys.databases ORDER BY database_id".to_string(),
            CatalogQuery::Tables { scope } => format!(
                "SELECT TABLE_NAME \
                 FROM {db}INFORMATION_SCHEMA.TABLES \
                 WHERE TABLE_TYPE = 'BASE TABLE' AND TABLE_SCHEMA = @P1",
                db = scope.prefix()
            ),
            CatalogQuery::Columns { scope, .. } => format!(
                "SELECT c.TABLE_NAME, c.COLUMN_NAME, c.DATA_TYPE, \
                        CAST(CASE WHEN c.IS_NULLABLE = 'YES' THEN 1 ELSE 0 END AS INT) AS IS_NULLABLE, \
                        c.CHARACTER_MAXIMUM_LENGTH, \
                        CAST(c.NUMERIC_PRECISION AS INT) AS NUMERIC_PRECISION, \
                        CAST(c.NUMERIC_SCALE AS INT) AS NUMERIC_SCALE, \
                        c.COLUMN_DEFAULT, \
                        CAST(sc.is_identity AS INT) AS IS_IDENTITY \
                 FROM {db}INFORMATION_SCHEMA.COLUMNS c \
                 JOIN {db}sys.schemas s ON s.name = c.TABLE_SCHEMA \
                 JOIN {db}sys.tables t ON t.schema_id = s.schema_id AND t.name = c.TABLE_NAME \
                 JOIN {db}sys.columns sc ON sc.object_id = t.object_id AND sc.name = c.COLUMN_NAME \
                 WHERE c.TABLE_NAME = @P1 AND c.TABLE_SCHEMA = @P2 \
                 ORDER BY c.ORDINAL_POSITION",
                db = scope.prefix()
            ),
            CatalogQuery::Constraints { scope, .. } => format!(
                "SELECT kcu.COLUMN_NAME AS column_name, \
                        ref.TABLE_NAME AS referenced_table, \
                        ref.COLUMN_NAME AS referenced_column, \
                        tc.CONSTRAINT_NAME AS constraint_name, \
                        CASE tc.CONSTRAINT_TYPE \
                            WHEN 'PRIMARY KEY' THEN 'P' \
                            WHEN 'FOREIGN KEY' THEN 'F' \
                            ELSE 'U' END AS constraint_type \
                 FROM {db}INFORMATION_SCHEMA.TABLE_CONSTRAINTS tc \
                 JOIN {db}INFORMATION_SCHEMA.KEY_COLUMN_USAGE kcu \
                   ON kcu.CONSTRAINT_SCHEMA = tc.CONSTRAINT_SCHEMA \
                  AND kcu.CONSTRAINT_NAME = tc.CONSTRAINT_NAME \
                 LEFT JOIN {db}INFORMATION_SCHEMA.REFERENTIAL_CONSTRAINTS rc \
                   ON rc.CONSTRAINT_SCHEMA = tc.CONSTRAINT_SCHEMA \
                  AND rc.CONSTRAINT_NAME = tc.CONSTRAINT_NAME \
                 LEFT JOIN {db}INFORMATION_SCHEMA.KEY_COLUMN_USAGE ref \
                   ON ref.CONSTRAINT_SCHEMA = rc.UNIQUE_CONSTRAINT_SCHEMA \
                  AND ref.CONSTRAINT_NAME = rc.UNIQUE_CONSTRAINT_NAME \
                  AND ref.ORDINAL_POSITION = kcu.ORDINAL_POSITION \
                 WHERE tc.TABLE_NAME = @P1 AND tc.TABLE_SCHEMA = @P2 \
                   AND tc.CONSTRAINT_TYPE IN ('PRIMARY KEY', 'FOREIGN KEY', 'UNIQUE') \
                 ORDER BY tc.CONSTRAINT_NAME, kcu.ORDINAL_POSITION",
                db = scope.prefix()
            ),
            CatalogQuery::Indexes { scope, .. } => format!(
                "SELECT i.name AS index_name, \
                        c.name AS column_name, \
                        CAST(i.is_unique AS INT) AS is_unique, \
                        CAST(i.is_primary_key AS INT) AS is_primary_key \
                 FROM {db}sys.indexes i \
                 JOIN {db}sys.tables t ON t.object_id = i.object_id \
                 JOIN {db}sys.schemas s ON s.schema_id = t.schema_id \
                 JOIN {db}sys.index_columns ic \
                   ON ic.object_id = i.object_id AND ic.index_id = i.index_id \
                 JOIN {db}sys.columns c \
                   ON c.object_id = ic.object_id AND c.column_id = ic.column_id \
                 WHERE t.name = @P1 AND s.name = @P2 \
                   AND i.is_primary_key = 0 \
                   AND i.name IS NOT NULL \
                   AND ic.is_included_column = 0 \
                 ORDER BY i.index_id, ic.key_ordinal",
                db = scope.prefix()
            ),
        }
    }
}
