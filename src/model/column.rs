//! Column attributes and the catalog-row normalizer

use std::borrow::Cow;

use crate::catalog::CatalogRow;

/// Raw type assumed when a catalog row carries none
pub const DEFAULT_DATA_TYPE: &str = "varchar";

/// Vendor spelling of the one-bit type
pub const BIT_TYPE: &str = "bit";

/// Canonical type given to `bit` columns
pub const BOOL_TYPE: &str = "bool";

/// Canonical category → raw SQL Server type names.
///
/// Order matters: every category is scanned and the last one containing the
/// raw type wins, so `bit` resolves to `boolean` rather than `int`.
pub const TYPE_MAPPINGS: &[(&str, &[&str])] = &[
    (
        "string",
        &[
            "varchar",
            "nvarchar",
            "char",
            "nchar",
            "text",
            "ntext",
            "string",
            "sysname",
            "uniqueidentifier",
            "xml",
            "sql_variant",
        ],
    ),
    (
        "datetime",
        &[
            "datetime",
            "datetime2",
            "smalldatetime",
            "date",
            "time",
            "datetimeoffset",
            "timestamp",
        ],
    ),
    (
        "int",
        &["bigint", "int", "integer", "smallint", "tinyint", "bit"],
    ),
    (
        "float",
        &[
            "float",
            "real",
            "decimal",
            "numeric",
            "money",
            "smallmoney",
            "double",
        ],
    ),
    ("boolean", &["boolean", "bool", "bit"]),
    ("binary", &["binary", "varbinary", "image", "rowversion"]),
];

/// Normalized attributes of one table column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    /// Canonical type, or the vendor type when no category matched
    pub type_name: String,
    pub size: Option<i64>,
    pub scale: Option<i64>,
    pub nullable: bool,
    pub autoincrement: bool,
    pub default: Option<String>,
    /// Never populated from SQL Server; extended properties are not read
    pub comment: Option<String>,
}

impl Column {
    /// True when the canonical type is one of the numeric categories
    pub fn is_numeric(&self) -> bool {
        matches!(self.type_name.as_str(), "int" | "float")
    }
}

type Step = fn(&ColumnNormalizer, &CatalogRow, &mut Column);

/// Attribute steps, applied in this order to every row
const STEPS: &[(&str, Step)] = &[
    ("type", ColumnNormalizer::resolve_type),
    ("name", ColumnNormalizer::resolve_name),
    ("autoincrement", ColumnNormalizer::resolve_autoincrement),
    ("nullable", ColumnNormalizer::resolve_nullable),
    ("default", ColumnNormalizer::resolve_default),
    ("comment", ColumnNormalizer::resolve_comment),
];

/// Turns raw `INFORMATION_SCHEMA.COLUMNS` rows into [`Column`]s
#[derive(Debug, Clone, Copy)]
pub struct ColumnNormalizer {
    mappings: &'static [(&'static str, &'static [&'static str])],
}

impl Default for ColumnNormalizer {
    fn default() -> Self {
        Self {
            mappings: TYPE_MAPPINGS,
        }
    }
}

impl ColumnNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different ordered mapping table
    pub fn with_mappings(mappings: &'static [(&'static str, &'static [&'static str])]) -> Self {
        Self { mappings }
    }

    /// Names of the attributes the normalizer fills, in pipeline order
    pub fn attributes() -> impl Iterator<Item = &'static str> {
        STEPS.iter().map(|(name, _)| *name)
    }

    /// Normalize one catalog row
    pub fn normalize(&self, row: &CatalogRow) -> Column {
        let mut column = Column::default();
        for (_, step) in STEPS {
            step(self, row, &mut column);
        }
        column
    }

    /// Canonical type for a raw type name; unknown types pass through
    pub fn canonical_type<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        let mut resolved: Option<&'static str> = None;
        for (category, raw_types) in self.mappings {
            if raw_types.iter().any(|t| t.eq_ignore_ascii_case(raw)) {
                resolved = Some(*category);
            }
        }
        match resolved {
            Some(category) => Cow::Borrowed(category),
            None => Cow::Borrowed(raw),
        }
    }

    fn resolve_type(&self, row: &CatalogRow, column: &mut Column) {
        let raw = row.str_or("data_type", DEFAULT_DATA_TYPE);
        column.type_name = self.canonical_type(raw).into_owned();

        if raw.eq_ignore_ascii_case(BIT_TYPE) {
            column.type_name = BOOL_TYPE.to_string();
            column.size = Some(1);
            column.scale = None;
            return;
        }

        column.size = row.int("numeric_precision");
        column.scale = row.int("numeric_scale");
    }

    fn resolve_name(&self, row: &CatalogRow, column: &mut Column) {
        column.name = row.str_or("column_name", "").to_string();
    }

    fn resolve_autoincrement(&self, row: &CatalogRow, column: &mut Column) {
        column.autoincrement = row.is_one("is_identity");
    }

    fn resolve_nullable(&self, row: &CatalogRow, column: &mut Column) {
        column.nullable = row.is_one("is_nullable");
    }

    fn resolve_default(&self, row: &CatalogRow, column: &mut Column) {
        column.default = row.str("column_default").and_then(strip_default);
    }

    fn resolve_comment(&self, _row: &CatalogRow, column: &mut Column) {
        column.comment = None;
    }
}

/// Reduce a SQL Server default definition to its bare literal.
///
/// `((0))` becomes `0`, `(N'active')` becomes `active`.
pub fn strip_default(raw: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }
    let value = raw.trim_matches(|c: char| c == '(' || c == ')');
    let value = value
        .strip_prefix("N'")
        .or_else(|| value.strip_prefix('\''))
        .unwrap_or(value);
    let value = value.strip_suffix('\'').unwrap_or(value);
    Some(value.to_string())
}
