//! Schema loading
//!
//! A [`Schema`] reads every base table of one SQL schema when it is
//! constructed and keeps the resulting blueprints in catalog order. There
//! is no refresh; build a new `Schema` to re-read the catalog.

mod keys;

use std::collections::HashMap;

use anyhow::Result;
use tracing::{debug, info};

use crate::catalog::{CatalogConnection, CatalogQuery, CatalogScope};
use crate::config::SchemaConfig;
use crate::error::BlueprintError;
use crate::model::{Blueprint, ColumnNormalizer, Key};
use crate::util::contains_ci;

pub use keys::{fill_indexes, fill_primary, fill_relations, ConstraintKind};

/// Databases that ship with every SQL Server instance
pub const SYSTEM_DATABASES: &[&str] = &["master", "tempdb", "model", "msdb"];

/// Every base table of one schema, loaded through a single connection
#[derive(Debug)]
pub struct Schema<C> {
    name: String,
    scope: CatalogScope,
    connection_name: String,
    connection: C,
    normalizer: ColumnNormalizer,
    tables: Vec<Blueprint>,
    positions: HashMap<String, usize>,
}

impl<C: CatalogConnection> Schema<C> {
    /// Load schema `name` through `connection`.
    ///
    /// Any catalog query failure aborts the whole load.
    pub fn new(name: impl Into<String>, connection: C, config: &SchemaConfig) -> Result<Self> {
        let mut schema = Self {
            name: name.into(),
            scope: config.scope(),
            connection_name: connection.name().to_string(),
            connection,
            normalizer: ColumnNormalizer::new(),
            tables: Vec::new(),
            positions: HashMap::new(),
        };
        schema.load()?;
        Ok(schema)
    }

    /// User databases on the server, in catalog order
    pub fn schemas(connection: &mut C) -> Result<Vec<String>> {
        let rows = connection.select(&CatalogQuery::Databases)?;
        Ok(rows
            .iter()
            .filter_map(|row| row.str("name"))
            .filter(|name| !contains_ci(SYSTEM_DATABASES, name))
            .map(str::to_string)
            .collect())
    }

    fn load(&mut self) -> Result<()> {
        for table in self.fetch_tables()? {
            let mut blueprint = Blueprint::new(&self.connection_name, &self.name, &table);

            self.fetch_columns(&mut blueprint)?;
            self.fetch_constraints(&mut blueprint)?;
            self.fetch_indexes(&mut blueprint)?;

            debug!(
                table = %table,
                columns = blueprint.columns().len(),
                relations = blueprint.relations().len(),
                indexes = blueprint.indexes().len() + blueprint.unique_keys().len(),
                "loaded table blueprint"
            );
            self.insert(table, blueprint);
        }

        info!(
            schema = %self.name,
            database = ?self.scope.database,
            table_schema = %self.scope.table_schema,
            tables = self.tables.len(),
            "schema loaded"
        );
        Ok(())
    }

    fn fetch_tables(&mut self) -> Result<Vec<String>> {
        let rows = self.connection.select(&CatalogQuery::Tables {
            scope: self.scope.clone(),
        })?;
        Ok(rows
            .iter()
            .filter_map(|row| row.str("table_name"))
            .map(str::to_string)
            .collect())
    }

    fn fetch_columns(&mut self, blueprint: &mut Blueprint) -> Result<()> {
        let rows = self.connection.select(&CatalogQuery::Columns {
            scope: self.scope.clone(),
            table: blueprint.table().to_string(),
        })?;
        for row in &rows {
            blueprint.with_column(self.normalizer.normalize(row));
        }
        Ok(())
    }

    fn fetch_constraints(&mut self, blueprint: &mut Blueprint) -> Result<()> {
        let rows = self.connection.select(&CatalogQuery::Constraints {
            scope: self.scope.clone(),
            table: blueprint.table().to_string(),
        })?;

        if let Some(primary) = fill_primary(&rows) {
            blueprint.with_primary_key(primary);
        }
        for relation in fill_relations(&rows, &self.name) {
            blueprint.with_relation(relation);
        }
        Ok(())
    }

    fn fetch_indexes(&mut self, blueprint: &mut Blueprint) -> Result<()> {
        let rows = self.connection.select(&CatalogQuery::Indexes {
            scope: self.scope.clone(),
            table: blueprint.table().to_string(),
        })?;
        for index in fill_indexes(&rows) {
            blueprint.with_index(index);
        }
        Ok(())
    }
}

impl<C> Schema<C> {
    // A repeated name replaces the earlier blueprint in place.
    fn insert(&mut self, table: String, blueprint: Blueprint) {
        match self.positions.get(&table) {
            Some(&position) => self.tables[position] = blueprint,
            None => {
                self.positions.insert(table, self.tables.len());
                self.tables.push(blueprint);
            }
        }
    }

    /// Schema name blueprints and relations are tagged with
    pub fn schema(&self) -> &str {
        &self.name
    }

    /// Catalog database the tables were read from; `None` is the
    /// connection's current database
    pub fn database(&self) -> Option<&str> {
        self.scope.database.as_deref()
    }

    /// SQL schema the tables were read from
    pub fn table_schema(&self) -> &str {
        &self.scope.table_schema
    }

    /// Name of the connection the schema was loaded through
    pub fn connection_name(&self) -> &str {
        &self.connection_name
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// Give the connection back, dropping the loaded blueprints
    pub fn into_connection(self) -> C {
        self.connection
    }

    pub fn has(&self, table: &str) -> bool {
        self.positions.contains_key(table)
    }

    /// All blueprints in catalog order
    pub fn tables(&self) -> &[Blueprint] {
        &self.tables
    }

    pub fn table(&self, table: &str) -> Result<&Blueprint> {
        match self.positions.get(table) {
            Some(&position) => Ok(&self.tables[position]),
            None => Err(BlueprintError::TableNotFound {
                schema: self.name.clone(),
                table: table.to_string(),
            }
            .into()),
        }
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Every relation in the schema that points at `target`.
    ///
    /// Ordered by table, then by each table's own relation order.
    pub fn referencing<'a>(&'a self, target: &Blueprint) -> Vec<(&'a Blueprint, &'a Key)> {
        self.tables
            .iter()
            .flat_map(|blueprint| {
                blueprint
                    .references(target)
                    .into_iter()
                    .map(move |key| (blueprint, key))
            })
            .collect()
    }
}
