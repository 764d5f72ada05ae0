//! Fold flat constraint and index rows into key records
//!
//! Catalog queries return one row per key column. Rows are grouped by
//! constraint or index name; groups and the columns inside them keep the
//! order in which they were first seen.

use crate::catalog::CatalogRow;
use crate::model::{Key, TableRef};

/// Constraint kinds reported by the constraint query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Primary,
    Unique,
    Foreign,
}

impl ConstraintKind {
    /// Parse a constraint-type marker (`P`, `FK`, `PRIMARY KEY`, ...)
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker.trim().to_ascii_uppercase().as_str() {
            "P" | "PK" | "PRIMARY KEY" => Some(ConstraintKind::Primary),
            "U" | "UQ" | "UNIQUE" => Some(ConstraintKind::Unique),
            "F" | "FK" | "FOREIGN KEY" => Some(ConstraintKind::Foreign),
            _ => None,
        }
    }
}

fn constraint_kind(row: &CatalogRow) -> Option<ConstraintKind> {
    row.str("constraint_type").and_then(ConstraintKind::from_marker)
}

/// Primary key from constraint rows, or `None` when the table has none
pub fn fill_primary(rows: &[CatalogRow]) -> Option<Key> {
    let columns: Vec<String> = rows
        .iter()
        .filter(|row| constraint_kind(row) == Some(ConstraintKind::Primary))
        .filter_map(|row| row.str("column_name"))
        .map(str::to_string)
        .collect();

    if columns.is_empty() {
        None
    } else {
        Some(Key::primary(columns))
    }
}

struct RelationGroup {
    name: String,
    columns: Vec<String>,
    references: Vec<String>,
    table: String,
}

/// One foreign key per constraint name, pointing into `schema`
pub fn fill_relations(rows: &[CatalogRow], schema: &str) -> Vec<Key> {
    let mut groups: Vec<RelationGroup> = Vec::new();

    for row in rows {
        if constraint_kind(row) != Some(ConstraintKind::Foreign) {
            continue;
        }
        let name = row.str_or("constraint_name", "");
        let position = match groups.iter().position(|g| g.name == name) {
            Some(position) => position,
            None => {
                groups.push(RelationGroup {
                    name: name.to_string(),
                    columns: Vec::new(),
                    references: Vec::new(),
                    table: String::new(),
                });
                groups.len() - 1
            }
        };

        let group = &mut groups[position];
        if let Some(column) = row.str("column_name") {
            group.columns.push(column.to_string());
        }
        if let Some(column) = row.str("referenced_column") {
            group.references.push(column.to_string());
        }
        if let Some(table) = row.str("referenced_table") {
            group.table = table.to_string();
        }
    }

    groups
        .into_iter()
        .map(|g| Key::foreign(g.name, g.columns, g.references, TableRef::new(schema, g.table)))
        .collect()
}

struct IndexGroup {
    name: String,
    columns: Vec<String>,
    unique: bool,
}

/// One unique or plain index per index name; primary key rows are skipped
pub fn fill_indexes(rows: &[CatalogRow]) -> Vec<Key> {
    let mut groups: Vec<IndexGroup> = Vec::new();

    for row in rows.iter().filter(|row| !row.is_one("is_primary_key")) {
        let name = row.str_or("index_name", "");
        let position = match groups.iter().position(|g| g.name == name) {
            Some(position) => position,
            None => {
                groups.push(IndexGroup {
                    name: name.to_string(),
                    columns: Vec::new(),
                    unique: row.is_one("is_unique"),
                });
                groups.len() - 1
            }
        };

        if let Some(column) = row.str("column_name") {
            groups[position].columns.push(column.to_string());
        }
    }

    groups
        .into_iter()
        .map(|g| Key::index(g.name, g.columns, g.unique))
        .collect()
}
