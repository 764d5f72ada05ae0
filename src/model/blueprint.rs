//! Per-table blueprint

use super::{Column, Key, KeyKind, TableRef};

/// Normalized description of one table: columns, keys and relations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blueprint {
    connection: String,
    schema: String,
    table: String,
    columns: Vec<Column>,
    primary_key: Option<Key>,
    unique_keys: Vec<Key>,
    indexes: Vec<Key>,
    relations: Vec<Key>,
}

impl Blueprint {
    pub fn new(
        connection: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            connection: connection.into(),
            schema: schema.into(),
            table: table.into(),
            columns: Vec::new(),
            primary_key: None,
            unique_keys: Vec::new(),
            indexes: Vec::new(),
            relations: Vec::new(),
        }
    }

    pub fn connection(&self) -> &str {
        &self.connection
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// `schema.table`
    pub fn qualified_table(&self) -> String {
        format!("{}.{}", self.schema, self.table)
    }

    /// The (schema, table) pair foreign keys use to point at this table
    pub fn table_ref(&self) -> TableRef {
        TableRef::new(&self.schema, &self.table)
    }

    pub fn with_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// Replace the primary key
    pub fn with_primary_key(&mut self, key: Key) {
        self.primary_key = Some(key);
    }

    /// Attach a unique or plain index
    pub fn with_index(&mut self, key: Key) {
        match key.kind {
            KeyKind::Unique => self.unique_keys.push(key),
            KeyKind::Primary => self.primary_key = Some(key),
            KeyKind::Foreign => self.relations.push(key),
            KeyKind::Index => self.indexes.push(key),
        }
    }

    pub fn with_relation(&mut self, key: Key) {
        self.relations.push(key);
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn primary_key(&self) -> Option<&Key> {
        self.primary_key.as_ref()
    }

    /// Primary key columns, empty for tables without one
    pub fn primary_key_columns(&self) -> &[String] {
        self.primary_key
            .as_ref()
            .map(|k| k.columns.as_slice())
            .unwrap_or(&[])
    }

    pub fn has_composite_primary_key(&self) -> bool {
        self.primary_key.as_ref().is_some_and(Key::is_composite)
    }

    pub fn unique_keys(&self) -> &[Key] {
        &self.unique_keys
    }

    pub fn indexes(&self) -> &[Key] {
        &self.indexes
    }

    pub fn relations(&self) -> &[Key] {
        &self.relations
    }

    /// Relations of this table that point at `target`, in relation order
    pub fn references(&self, target: &Blueprint) -> Vec<&Key> {
        self.relations
            .iter()
            .filter(|relation| {
                relation
                    .on
                    .as_ref()
                    .is_some_and(|on| on.schema == target.schema && on.table == target.table)
            })
            .collect()
    }

    /// True when the primary key or a unique index covers exactly `columns`
    pub fn is_unique_key(&self, columns: &[&str]) -> bool {
        self.primary_key
            .iter()
            .chain(self.unique_keys.iter())
            .any(|key| key.covers(columns))
    }
}
