//! Key records: primary keys, unique and plain indexes, foreign keys

use std::fmt;

/// What a key record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyKind {
    Primary,
    Unique,
    Index,
    Foreign,
}

impl KeyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyKind::Primary => "primary",
            KeyKind::Unique => "unique",
            KeyKind::Index => "index",
            KeyKind::Foreign => "foreign",
        }
    }
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A (schema, table) pair a foreign key points at
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableRef {
    pub schema: String,
    pub table: String,
}

impl TableRef {
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
        }
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.table)
    }
}

/// A key over one or more columns, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    pub kind: KeyKind,
    /// Index or constraint name; primary keys carry none
    pub index: Option<String>,
    pub columns: Vec<String>,
    /// Referenced columns, foreign keys only
    pub references: Vec<String>,
    /// Referenced table, foreign keys only
    pub on: Option<TableRef>,
}

impl Key {
    pub fn primary(columns: Vec<String>) -> Self {
        Self {
            kind: KeyKind::Primary,
            index: None,
            columns,
            references: Vec::new(),
            on: None,
        }
    }

    /// A unique or plain index
    pub fn index(name: impl Into<String>, columns: Vec<String>, unique: bool) -> Self {
        Self {
            kind: if unique { KeyKind::Unique } else { KeyKind::Index },
            index: Some(name.into()),
            columns,
            references: Vec::new(),
            on: None,
        }
    }

    pub fn foreign(
        name: impl Into<String>,
        columns: Vec<String>,
        references: Vec<String>,
        on: TableRef,
    ) -> Self {
        Self {
            kind: KeyKind::Foreign,
            index: Some(name.into()),
            columns,
            references,
            on: Some(on),
        }
    }

    /// The record's kind name: `primary`, `unique`, `index` or `foreign`
    pub fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    pub fn is_composite(&self) -> bool {
        self.columns.len() > 1
    }

    /// True when this key covers exactly `columns`, in any order
    pub fn covers(&self, columns: &[&str]) -> bool {
        let mut own: Vec<&str> = self.columns.iter().map(String::as_str).collect();
        let mut other = columns.to_vec();
        own.sort_unstable();
        other.sort_unstable();
        own == other
    }
}
