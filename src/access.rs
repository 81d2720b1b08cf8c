//! Access layer for decoded column values.
//!
//! This module provides the value model the filter engine works on:
//!
//! - **DataType**: Supported scalar types with a total coercion precedence
//! - **Value**: Runtime representation of one decoded scalar
//! - **TypedValue**: A value paired with its declared type, with coercing getters
//! - **Row**: Accessor trait the row materialization layer implements
//!
//! Rows are never constructed here; the evaluator only reads them.

pub mod row;
pub mod value;

pub use row::Row;
pub use value::{DataType, TypedValue, Value};
