//! rust-sqlblueprint: SQL Server catalog introspection for code generators
//!
//! This library reads tables, columns, keys, indexes and foreign keys from
//! a SQL Server catalog and normalizes them into per-table blueprints with
//! a small canonical type vocabulary.

pub mod catalog;
pub mod config;
pub mod error;
pub mod model;
pub mod report;
pub mod schema;
pub mod util;
pub mod xml;

use anyhow::Result;
use tracing::info;

pub use catalog::{CatalogConnection, CatalogQuery, CatalogRow, CatalogScope, CatalogValue, SqlServerConnection};
pub use config::{ConnectionConfig, SchemaConfig};
pub use error::BlueprintError;
pub use model::{Blueprint, Column, ColumnNormalizer, Key, KeyKind, TableRef};
pub use schema::Schema;

/// Options for loading a schema from a live server
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// How to reach the server
    pub connection: ConnectionConfig,
    /// Schema name blueprints are tagged with
    pub schema: String,
    /// Catalog database to read; falls back to the connection's database
    pub database: Option<String>,
    /// SQL schema to read; falls back to the connection's, then `dbo`
    pub table_schema: Option<String>,
}

/// Connect and load every base table of a schema
pub fn load_schema(options: LoadOptions) -> Result<Schema<SqlServerConnection>> {
    let LoadOptions {
        connection,
        schema,
        database,
        table_schema,
    } = options;

    let config = SchemaConfig {
        database: database.or_else(|| connection.database.clone()),
        table_schema: table_schema.or_else(|| connection.table_schema.clone()),
    };
    info!(
        schema = %schema,
        database = ?config.effective_database(),
        table_schema = %config.effective_table_schema(),
        host = %connection.host,
        "loading schema"
    );

    let connection = SqlServerConnection::connect(&connection)?;
    Schema::new(schema, connection, &config)
}

/// Connect and list the user databases on the server
pub fn list_schemas(config: &ConnectionConfig) -> Result<Vec<String>> {
    let mut connection = SqlServerConnection::connect(config)?;
    Schema::schemas(&mut connection)
}
