//! Error types for rust-sqlblueprint

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or exporting schema blueprints
#[derive(Error, Debug)]
pub enum BlueprintError {
    #[error("Table [{table}] not found in schema [{schema}]")]
    TableNotFound { schema: String, table: String },

    #[error("Failed to open TCP connection to {addr}")]
    TcpConnectError {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to connect to SQL Server at {addr}")]
    ConnectError {
        addr: String,
        #[source]
        source: tiberius::error::Error,
    },

    #[error("Catalog query failed: {query}")]
    QueryError {
        query: &'static str,
        #[source]
        source: tiberius::error::Error,
    },

    #[error("Failed to start query runtime")]
    RuntimeError {
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("XML generation error: {message}")]
    XmlGenerationError { message: String },

    #[error("Failed to write output to {path}")]
    OutputWriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
