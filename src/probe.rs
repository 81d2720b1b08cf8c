//! Field probes: read one fixed-width field through the handle cache and
//! test it against a literal with the regular comparison rules.

use crate::access::{DataType, TypedValue};
use crate::expression::{compare, ComparisonOperator, FilterResult};
use crate::storage::{CachedFileReader, StorageResult};
use crate::Result;

/// Fixed-width primitive stored in a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Int,
    Long,
    Double,
}

impl FieldKind {
    /// Encoded width in bytes
    pub fn width(self) -> usize {
        match self {
            FieldKind::Int => 4,
            FieldKind::Long | FieldKind::Double => 8,
        }
    }

    pub fn data_type(self) -> DataType {
        match self {
            FieldKind::Int => DataType::Int,
            FieldKind::Long => DataType::Long,
            FieldKind::Double => DataType::Double,
        }
    }

    /// Parse a literal as this kind using the same coercion a STRING value gets
    pub fn parse_literal(self, text: &str) -> FilterResult<TypedValue> {
        let raw = TypedValue::string(text);
        Ok(match self {
            FieldKind::Int => TypedValue::int(raw.get_int()?),
            FieldKind::Long => TypedValue::long(raw.get_long()?),
            FieldKind::Double => TypedValue::double(raw.get_double()?),
        })
    }
}

/// Read one field. Without an offset the handle's current position is used.
pub fn read_field(
    reader: &CachedFileReader,
    path: &str,
    offset: Option<u64>,
    kind: FieldKind,
) -> StorageResult<TypedValue> {
    Ok(match (kind, offset) {
        (FieldKind::Int, Some(offset)) => TypedValue::int(reader.read_int_at(path, offset)?),
        (FieldKind::Int, None) => TypedValue::int(reader.read_int(path)?),
        (FieldKind::Long, Some(offset)) => TypedValue::long(reader.read_long_at(path, offset)?),
        (FieldKind::Long, None) => TypedValue::long(reader.read_long(path)?),
        (FieldKind::Double, Some(offset)) => {
            TypedValue::double(reader.read_double_at(path, offset)?)
        }
        (FieldKind::Double, None) => TypedValue::double(reader.read_double(path)?),
    })
}

/// Evaluate `field <op> literal` for the field stored at `offset`
pub fn compare_field(
    reader: &CachedFileReader,
    path: &str,
    offset: Option<u64>,
    kind: FieldKind,
    op: ComparisonOperator,
    literal: &TypedValue,
) -> Result<bool> {
    let field = read_field(reader, path, offset, kind)?;
    let result = compare(op, field, literal)?;
    Ok(result.get_boolean()?)
}
