//! Untyped catalog rows with defaulting accessors

use std::fmt;

/// A single value from a catalog result set
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CatalogValue {
    #[default]
    Null,
    Int(i64),
    Text(String),
}

impl CatalogValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CatalogValue::Null)
    }
}

impl fmt::Display for CatalogValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogValue::Null => write!(f, "NULL"),
            CatalogValue::Int(v) => write!(f, "{}", v),
            CatalogValue::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for CatalogValue {
    fn from(value: i64) -> Self {
        CatalogValue::Int(value)
    }
}

impl From<i32> for CatalogValue {
    fn from(value: i32) -> Self {
        CatalogValue::Int(i64::from(value))
    }
}

impl From<bool> for CatalogValue {
    fn from(value: bool) -> Self {
        CatalogValue::Int(i64::from(value))
    }
}

impl From<&str> for CatalogValue {
    fn from(value: &str) -> Self {
        CatalogValue::Text(value.to_string())
    }
}

impl From<String> for CatalogValue {
    fn from(value: String) -> Self {
        CatalogValue::Text(value)
    }
}

impl<T: Into<CatalogValue>> From<Option<T>> for CatalogValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CatalogValue::Null, Into::into)
    }
}

/// One row of a catalog query, shaped like the result set it came from.
///
/// Lookups are case-insensitive so `TABLE_NAME` and `table_name` address
/// the same field. Missing fields and SQL NULLs read the same way.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatalogRow {
    values: Vec<(String, CatalogValue)>,
}

impl CatalogRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append, mostly for fixtures.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<CatalogValue>) -> Self {
        self.push(name, value);
        self
    }

    /// Set a field. A later value for the same name replaces the earlier one.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<CatalogValue>) {
        let name = name.into();
        let value = value.into();
        match self
            .values
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(&name))
        {
            Some((_, existing)) => *existing = value,
            None => self.values.push((name, value)),
        }
    }

    /// Raw value lookup; `None` when the field is absent or NULL.
    pub fn get(&self, name: &str) -> Option<&CatalogValue> {
        self.values
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
            .filter(|value| !value.is_null())
    }

    /// Text value of a field. Integers are not stringified.
    pub fn str(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(CatalogValue::Text(v)) => Some(v.as_str()),
            _ => None,
        }
    }

    /// Text value of a field, or `default` when absent.
    pub fn str_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.str(name).unwrap_or(default)
    }

    /// Integer value of a field. Numeric text is parsed.
    pub fn int(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            CatalogValue::Int(v) => Some(*v),
            CatalogValue::Text(v) => v.trim().parse().ok(),
            CatalogValue::Null => None,
        }
    }

    /// True only when the field holds the integer 1. Text `"1"` does not count.
    pub fn is_one(&self, name: &str) -> bool {
        matches!(self.get(name), Some(CatalogValue::Int(1)))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CatalogValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
