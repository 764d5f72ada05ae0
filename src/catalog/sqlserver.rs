//! Blocking SQL Server connection backed by tiberius

use anyhow::Result;
use tiberius::{Client, ColumnData, Row, ToSql};
use tokio::net::TcpStream;
use tokio::runtime::{Builder, Runtime};
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tracing::debug;

use super::{CatalogConnection, CatalogQuery, CatalogRow, CatalogValue};
use crate::config::ConnectionConfig;
use crate::error::BlueprintError;

type SqlClient = Client<Compat<TcpStream>>;

/// A tiberius client driven by its own current-thread runtime.
///
/// Each query is run to completion with `block_on`, so callers see a
/// plain synchronous connection.
pub struct SqlServerConnection {
    name: String,
    client: SqlClient,
    runtime: Runtime,
}

impl SqlServerConnection {
    /// Open a connection described by `config`
    pub fn connect(config: &ConnectionConfig) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| BlueprintError::RuntimeError { source: e })?;

        let tiberius_config = config.to_tiberius();
        let addr = tiberius_config.get_addr();
        debug!(addr = %addr, connection = %config.connection_name, "connecting to SQL Server");

        let client = runtime.block_on(async {
            let tcp = TcpStream::connect(&addr)
                .await
                .map_err(|e| BlueprintError::TcpConnectError {
                    addr: addr.clone(),
                    source: e,
                })?;
            tcp.set_nodelay(true)
                .map_err(|e| BlueprintError::TcpConnectError {
                    addr: addr.clone(),
                    source: e,
                })?;
            Client::connect(tiberius_config, tcp.compat_write())
                .await
                .map_err(|e| BlueprintError::ConnectError {
                    addr: addr.clone(),
                    source: e,
                })
        })?;

        Ok(Self {
            name: config.connection_name.clone(),
            client,
            runtime,
        })
    }
}

impl CatalogConnection for SqlServerConnection {
    fn name(&self) -> &str {
        &self.name
    }

    fn select(&mut self, query: &CatalogQuery) -> Result<Vec<CatalogRow>> {
        let sql = query.sql();
        let params = query.params();
        debug!(query = query.kind(), params = ?params, "running catalog query");

        let Self { client, runtime, .. } = self;
        let rows = runtime
            .block_on(async {
                let bound: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();
                client.query(sql, &bound).await?.into_first_result().await
            })
            .map_err(|e| BlueprintError::QueryError {
                query: query.kind(),
                source: e,
            })?;

        Ok(rows.into_iter().map(catalog_row).collect())
    }
}

/// Convert a tiberius row into a name/value catalog row
fn catalog_row(row: Row) -> CatalogRow {
    let names: Vec<String> = row
        .columns()
        .iter()
        .map(|column| column.name().to_string())
        .collect();

    let mut out = CatalogRow::new();
    for (name, data) in names.into_iter().zip(row) {
        out.push(name, catalog_value(data));
    }
    out
}

fn catalog_value(data: ColumnData<'static>) -> CatalogValue {
    match data {
        ColumnData::U8(v) => v.map(i64::from).into(),
        ColumnData::I16(v) => v.map(i64::from).into(),
        ColumnData::I32(v) => v.map(i64::from).into(),
        ColumnData::I64(v) => v.into(),
        ColumnData::Bit(v) => v.into(),
        ColumnData::String(v) => v.map(|s| s.into_owned()).into(),
        ColumnData::Numeric(v) => match v {
            Some(n) if n.scale() == 0 => i64::try_from(n.value())
                .map(CatalogValue::Int)
                .unwrap_or_else(|_| CatalogValue::Text(n.to_string())),
            Some(n) => CatalogValue::Text(n.to_string()),
            None => CatalogValue::Null,
        },
        // Catalog queries only select integers and character data
        _ => CatalogValue::Null,
    }
}
