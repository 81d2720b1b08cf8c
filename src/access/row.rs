//! Row accessor consumed by the expression evaluator.

use crate::access::TypedValue;

/// Per-iteration view of one row's decoded column values.
///
/// Implemented by the row materialization layer. The evaluator only borrows
/// a row for the duration of a single `evaluate` call.
pub trait Row {
    /// Number of columns in the row
    fn len(&self) -> usize;

    /// Value at the given column ordinal, or `None` past the end of the row
    fn get(&self, ordinal: usize) -> Option<&TypedValue>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Missing columns count as null
    fn is_null(&self, ordinal: usize) -> bool {
        self.get(ordinal).map_or(true, TypedValue::is_null)
    }
}

impl Row for [TypedValue] {
    fn len(&self) -> usize {
        <[TypedValue]>::len(self)
    }

    fn get(&self, ordinal: usize) -> Option<&TypedValue> {
        <[TypedValue]>::get(self, ordinal)
    }
}

impl Row for Vec<TypedValue> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn get(&self, ordinal: usize) -> Option<&TypedValue> {
        self.as_slice().get(ordinal)
    }
}
