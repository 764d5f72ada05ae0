//! Connection and schema configuration
//!
//! Values come from the process environment, optionally seeded from a
//! `.env` file, and can be overridden field by field by the CLI.

use anyhow::Result;
use tiberius::{AuthMethod, Config};

use crate::catalog::CatalogScope;
use crate::error::BlueprintError;

/// SQL schema whose tables are read when none is configured
pub const DEFAULT_TABLE_SCHEMA: &str = "dbo";

/// Connection name used when none is configured
pub const DEFAULT_CONNECTION_NAME: &str = "sqlsrv";

/// How to reach a SQL Server instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// Database to connect to and to read the catalog of
    pub database: Option<String>,
    /// SQL schema whose tables are read
    pub table_schema: Option<String>,
    /// Label attached to every blueprint loaded through this connection
    pub connection_name: String,
    /// Accept the server certificate without validation
    pub trust_cert: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1433,
            user: "sa".to_string(),
            password: String::new(),
            database: None,
            table_schema: None,
            connection_name: DEFAULT_CONNECTION_NAME.to_string(),
            trust_cert: true,
        }
    }
}

impl ConnectionConfig {
    /// Load from the environment, reading `.env` first if present
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = match lookup("SQL_SERVER_PORT") {
            Some(port) => port.trim().parse::<u16>().map_err(|_| BlueprintError::InvalidConfig {
                message: format!("SQL_SERVER_PORT must be a port number, got '{}'", port),
            })?,
            None => defaults.port,
        };

        let trust_cert = match lookup("SQL_SERVER_TRUST_CERT") {
            Some(value) => parse_flag(&value).ok_or_else(|| BlueprintError::InvalidConfig {
                message: format!("SQL_SERVER_TRUST_CERT must be true or false, got '{}'", value),
            })?,
            None => defaults.trust_cert,
        };

        Ok(Self {
            host: lookup("SQL_SERVER_HOST").unwrap_or(defaults.host),
            port,
            user: lookup("SQL_SERVER_USER").unwrap_or(defaults.user),
            password: lookup("SQL_SERVER_PASSWORD").unwrap_or(defaults.password),
            database: lookup("SQL_SERVER_DATABASE").filter(|db| !db.trim().is_empty()),
            table_schema: lookup("SQL_SERVER_SCHEMA").filter(|s| !s.trim().is_empty()),
            connection_name: lookup("SQL_SERVER_CONNECTION").unwrap_or(defaults.connection_name),
            trust_cert,
        })
    }

    /// Create a tiberius client config
    pub(crate) fn to_tiberius(&self) -> Config {
        let mut config = Config::new();
        config.host(&self.host);
        config.port(self.port);
        config.authentication(AuthMethod::sql_server(&self.user, &self.password));
        if self.trust_cert {
            config.trust_cert();
        }
        if let Some(db) = &self.database {
            config.database(db);
        }
        config
    }
}

/// Settings that shape a schema load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaConfig {
    /// Catalog database to read; unset reads the connection's current database
    pub database: Option<String>,
    /// SQL schema whose base tables are read
    pub table_schema: Option<String>,
}

impl SchemaConfig {
    pub fn new(database: Option<String>) -> Self {
        Self {
            database,
            table_schema: None,
        }
    }

    pub fn with_table_schema(mut self, table_schema: impl Into<String>) -> Self {
        self.table_schema = Some(table_schema.into());
        self
    }

    /// The configured database, if any
    pub fn effective_database(&self) -> Option<&str> {
        non_blank(self.database.as_deref())
    }

    /// The configured SQL schema, or [`DEFAULT_TABLE_SCHEMA`]
    pub fn effective_table_schema(&self) -> &str {
        non_blank(self.table_schema.as_deref()).unwrap_or(DEFAULT_TABLE_SCHEMA)
    }

    /// Catalog location the loader's queries are scoped to
    pub fn scope(&self) -> CatalogScope {
        CatalogScope::new(self.effective_database(), self.effective_table_schema())
    }
}

impl From<&ConnectionConfig> for SchemaConfig {
    fn from(config: &ConnectionConfig) -> Self {
        Self {
            database: config.database.clone(),
            table_schema: config.table_schema.clone(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
