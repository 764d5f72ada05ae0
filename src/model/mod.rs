//! Normalized table model

mod blueprint;
mod column;
mod key;

pub use blueprint::Blueprint;
pub use column::{
    strip_default, Column, ColumnNormalizer, BIT_TYPE, BOOL_TYPE, DEFAULT_DATA_TYPE, TYPE_MAPPINGS,
};
pub use key::{Key, KeyKind, TableRef};
