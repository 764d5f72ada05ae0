//! Catalog access: queries, rows and the connection seam

mod query;
mod row;
mod sqlserver;

use anyhow::Result;

pub use query::{CatalogQuery, CatalogScope};
pub use row::{CatalogRow, CatalogValue};
pub use sqlserver::SqlServerConnection;

/// Something that can run a catalog query and hand back its rows.
///
/// Calls block until the whole result set has been read.
pub trait CatalogConnection {
    /// Name of the connection, used to tag every blueprint loaded through it
    fn name(&self) -> &str;

    /// Execute a catalog query and return every row of its first result set
    fn select(&mut self, query: &CatalogQuery) -> Result<Vec<CatalogRow>>;
}

impl<C: CatalogConnection + ?Sized> CatalogConnection for Box<C> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn select(&mut self, query: &CatalogQuery) -> Result<Vec<CatalogRow>> {
        (**self).select(query)
    }
}
