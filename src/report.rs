//! Human-readable schema report

use std::fmt::Write;

use crate::model::{Blueprint, Column, Key};
use crate::schema::Schema;

fn column_line(column: &Column) -> String {
    let mut line = format!("  {} {}", column.name, column.type_name);
    match (column.size, column.scale) {
        (Some(size), Some(scale)) => {
            let _ = write!(line, "({}, {})", size, scale);
        }
        (Some(size), None) => {
            let _ = write!(line, "({})", size);
        }
        _ => {}
    }
    line.push_str(if column.nullable { " NULL" } else { " NOT NULL" });
    if column.autoincrement {
        line.push_str(" IDENTITY");
    }
    if let Some(default) = &column.default {
        let _ = write!(line, " DEFAULT {}", default);
    }
    line
}

fn key_line(key: &Key) -> String {
    let mut line = format!("  {}", key.name());
    if let Some(index) = &key.index {
        let _ = write!(line, " {}", index);
    }
    let _ = write!(line, " ({})", key.columns.join(", "));
    if let Some(on) = &key.on {
        let _ = write!(line, " -> {} ({})", on, key.references.join(", "));
    }
    line
}

/// Render one table section
pub fn render_table(blueprint: &Blueprint) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "--- {} ---", blueprint.qualified_table());

    let _ = writeln!(out, "Columns ({}):", blueprint.columns().len());
    for column in blueprint.columns() {
        let _ = writeln!(out, "{}", column_line(column));
    }

    let keys: Vec<&Key> = blueprint
        .primary_key()
        .into_iter()
        .chain(blueprint.unique_keys())
        .chain(blueprint.indexes())
        .chain(blueprint.relations())
        .collect();
    let _ = writeln!(out, "Keys ({}):", keys.len());
    if keys.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for key in keys {
        let _ = writeln!(out, "{}", key_line(key));
    }
    out
}

/// Render the report for a whole schema
pub fn render_report<C>(schema: &Schema<C>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Schema {} ===", schema.schema());
    let _ = writeln!(out, "Database: {}", schema.database().unwrap_or("(current)"));
    let _ = writeln!(out, "Table schema: {}", schema.table_schema());
    let _ = writeln!(out, "Connection: {}", schema.connection_name());
    let _ = writeln!(out, "Tables: {}", schema.len());
    let _ = writeln!(out);

    for blueprint in schema.tables() {
        out.push_str(&render_table(blueprint));

        let incoming = schema.referencing(blueprint);
        if !incoming.is_empty() {
            let _ = writeln!(out, "Referenced by ({}):", incoming.len());
            for (source, key) in incoming {
                let _ = writeln!(
                    out,
                    "  {} ({})",
                    source.qualified_table(),
                    key.columns.join(", ")
                );
            }
        }
        let _ = writeln!(out);
    }
    out
}
