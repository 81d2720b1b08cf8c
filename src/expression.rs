//! Filter expression evaluation for scans.
//!
//! This module provides:
//! - Expression tree representation and plan printing
//! - Typed comparison with null-is-false semantics and pivot-type coercion
//! - Logical, null-check and list membership conditionals
//! - Binary encoding of trees for shipping to scan workers

pub mod codec;
pub mod error;
pub mod eval;
pub mod expr;
pub mod operator;

pub use codec::{decode_expression, encode_expression};
pub use error::{FilterError, FilterResult};
pub use eval::{
    compare, compare_values, evaluate_expression, expression_to_predicate, row_matches,
    ExpressionEvaluator, Predicate,
};
pub use expr::{ColumnRef, Expression, Literal};
pub use operator::{ComparisonOperator, ExpressionType, LogicalOperator, UnaryOperator};
