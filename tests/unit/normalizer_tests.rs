//! Column Normalizer Tests

use pretty_assertions::assert_eq;
use rust_sqlblueprint::{CatalogRow, Column, ColumnNormalizer};

use crate::common::column_row;

fn normalize(row: &CatalogRow) -> Column {
    ColumnNormalizer::new().normalize(row)
}

// ============================================================================
// Type Resolution Tests
// ============================================================================

#[test]
fn test_bit_becomes_bool_with_size_one() {
    let row = column_row("users", "active", "bit")
        .with("NUMERIC_PRECISION", 10)
        .with("NUMERIC_SCALE", 2);
    let column = normalize(&row);

    assert_eq!(column.type_name, "bool");
    assert_eq!(column.size, Some(1));
    assert_eq!(column.scale, None);
}

#[test]
fn test_bit_without_precision() {
    let column = normalize(&column_row("users", "active", "bit"));
    assert_eq!(column.type_name, "bool");
    assert_eq!(column.size, Some(1));
    assert_eq!(column.scale, None);
}

#[test]
fn test_integer_types_map_to_int() {
    for data_type in ["int", "bigint", "smallint", "tinyint", "integer"] {
        let column = normalize(&column_row("t", "c", data_type));
        assert_eq!(column.type_name, "int", "data type {}", data_type);
    }
}

#[test]
fn test_category_mapping() {
    let cases = [
        ("nvarchar", "string"),
        ("uniqueidentifier", "string"),
        ("datetime2", "datetime"),
        ("datetimeoffset", "datetime"),
        ("decimal", "float"),
        ("money", "float"),
        ("varbinary", "binary"),
        ("image", "binary"),
    ];
    for (data_type, expected) in cases {
        let column = normalize(&column_row("t", "c", data_type));
        assert_eq!(column.type_name, expected, "data type {}", data_type);
    }
}

#[test]
fn test_unmapped_type_passes_through() {
    for data_type in ["geography", "hierarchyid", "CustomerId"] {
        let column = normalize(&column_row("t", "c", data_type));
        assert_eq!(column.type_name, data_type);
    }
}

#[test]
fn test_missing_data_type_defaults_to_string() {
    let row = CatalogRow::new().with("COLUMN_NAME", "note");
    let column = normalize(&row);
    assert_eq!(column.type_name, "string");
    assert_eq!(column.name, "note");
}

// ============================================================================
// Precision / Scale Tests
// ============================================================================

#[test]
fn test_precision_and_scale() {
    let row = column_row("orders", "total", "decimal")
        .with("NUMERIC_PRECISION", 18)
        .with("NUMERIC_SCALE", 4);
    let column = normalize(&row);
    assert_eq!(column.type_name, "float");
    assert_eq!(column.size, Some(18));
    assert_eq!(column.scale, Some(4));
}

#[test]
fn test_absent_precision_leaves_size_unset() {
    let column = normalize(&column_row("users", "email", "varchar"));
    assert_eq!(column.size, None);
    assert_eq!(column.scale, None);
}

// ============================================================================
// Flag Tests
// ============================================================================

#[test]
fn test_autoincrement_requires_exactly_one() {
    let identity = normalize(&column_row("t", "id", "int").with("IS_IDENTITY", 1));
    let not_identity = normalize(&column_row("t", "id", "int").with("IS_IDENTITY", 0));
    let text_flag = normalize(&column_row("t", "id", "int").with("IS_IDENTITY", "1"));
    let absent = normalize(&CatalogRow::new().with("DATA_TYPE", "int"));

    assert!(identity.autoincrement);
    assert!(!not_identity.autoincrement);
    assert!(!text_flag.autoincrement);
    assert!(!absent.autoincrement);
}

#[test]
fn test_nullable_requires_exactly_one() {
    let nullable = normalize(&column_row("t", "c", "int").with("IS_NULLABLE", 1));
    let required = normalize(&column_row("t", "c", "int").with("IS_NULLABLE", 0));
    let odd = normalize(&column_row("t", "c", "int").with("IS_NULLABLE", 2));

    assert!(nullable.nullable);
    assert!(!required.nullable);
    assert!(!odd.nullable);
}

// ============================================================================
// Default Value Tests
// ============================================================================

#[test]
fn test_default_date_literal() {
    let column = normalize(&column_row("t", "c", "date").with("COLUMN_DEFAULT", "('2024-01-01')"));
    assert_eq!(column.default.as_deref(), Some("2024-01-01"));
}

#[test]
fn test_default_unicode_literal() {
    let column = normalize(&column_row("t", "c", "nvarchar").with("COLUMN_DEFAULT", "(N'active')"));
    assert_eq!(column.default.as_deref(), Some("active"));
}

#[test]
fn test_default_numeric_literal() {
    let column = normalize(&column_row("t", "c", "int").with("COLUMN_DEFAULT", "((0))"));
    assert_eq!(column.default.as_deref(), Some("0"));
}

#[test]
fn test_empty_default_is_unset() {
    let empty = normalize(&column_row("t", "c", "int").with("COLUMN_DEFAULT", ""));
    let absent = normalize(&column_row("t", "c", "int"));
    assert_eq!(empty.default, None);
    assert_eq!(absent.default, None);
}

// ============================================================================
// Whole Record Tests
// ============================================================================

#[test]
fn test_full_identity_column() {
    let row = column_row("orgs", "id", "int")
        .with("NUMERIC_PRECISION", 10)
        .with("NUMERIC_SCALE", 0)
        .with("IS_IDENTITY", 1);

    assert_eq!(
        normalize(&row),
        Column {
            name: "id".to_string(),
            type_name: "int".to_string(),
            size: Some(10),
            scale: Some(0),
            nullable: false,
            autoincrement: true,
            default: None,
            comment: None,
        }
    );
}

#[test]
fn test_comment_is_never_set() {
    let row = column_row("t", "c", "int").with("COLUMN_COMMENT", "ignored");
    assert_eq!(normalize(&row).comment, None);
}
