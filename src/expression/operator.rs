//! Operator definitions for filter expressions.

use serde::{Deserialize, Serialize};

/// Stable tag identifying what a node does.
///
/// Plan printers and optimizers introspect trees through this tag instead of
/// matching on node structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionType {
    Literal,
    Column,
    EqualTo,
    NotEquals,
    LessThan,
    LessThanEqualTo,
    GreaterThan,
    GreaterThanEqualTo,
    And,
    Or,
    Not,
    IsNull,
    IsNotNull,
    In,
    NotIn,
}

/// Comparison operators. All of them share null handling and pivot
/// selection and differ only in the comparator applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    EqualTo,
    NotEquals,
    LessThan,
    LessThanEqualTo,
    GreaterThan,
    GreaterThanEqualTo,
}

impl ComparisonOperator {
    /// Apply the comparator with the native semantics of `T`.
    ///
    /// Goes through `PartialEq`/`PartialOrd` directly rather than an
    /// `Ordering`, so doubles keep IEEE-754 behaviour for NaN.
    pub fn apply<T: PartialOrd + ?Sized>(self, left: &T, right: &T) -> bool {
        match self {
            ComparisonOperator::EqualTo => left == right,
            ComparisonOperator::NotEquals => left != right,
            ComparisonOperator::LessThan => left < right,
            ComparisonOperator::LessThanEqualTo => left <= right,
            ComparisonOperator::GreaterThan => left > right,
            ComparisonOperator::GreaterThanEqualTo => left >= right,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ComparisonOperator::EqualTo => "EqualTo",
            ComparisonOperator::NotEquals => "NotEquals",
            ComparisonOperator::LessThan => "LessThan",
            ComparisonOperator::LessThanEqualTo => "LessThanEqualTo",
            ComparisonOperator::GreaterThan => "GreaterThan",
            ComparisonOperator::GreaterThanEqualTo => "GreaterThanEqualTo",
        }
    }

    pub fn expression_type(self) -> ExpressionType {
        match self {
            ComparisonOperator::EqualTo => ExpressionType::EqualTo,
            ComparisonOperator::NotEquals => ExpressionType::NotEquals,
            ComparisonOperator::LessThan => ExpressionType::LessThan,
            ComparisonOperator::LessThanEqualTo => ExpressionType::LessThanEqualTo,
            ComparisonOperator::GreaterThan => ExpressionType::GreaterThan,
            ComparisonOperator::GreaterThanEqualTo => ExpressionType::GreaterThanEqualTo,
        }
    }
}

/// Boolean connectives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalOperator {
    And,
    Or,
}

impl LogicalOperator {
    pub fn apply(self, left: bool, right: bool) -> bool {
        match self {
            LogicalOperator::And => left && right,
            LogicalOperator::Or => left || right,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LogicalOperator::And => "And",
            LogicalOperator::Or => "Or",
        }
    }

    pub fn expression_type(self) -> ExpressionType {
        match self {
            LogicalOperator::And => ExpressionType::And,
            LogicalOperator::Or => ExpressionType::Or,
        }
    }
}

/// Single-operand conditionals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    Not,
    IsNull,
    IsNotNull,
}

impl UnaryOperator {
    pub fn name(self) -> &'static str {
        match self {
            UnaryOperator::Not => "Not",
            UnaryOperator::IsNull => "IsNull",
            UnaryOperator::IsNotNull => "IsNotNull",
        }
    }

    pub fn expression_type(self) -> ExpressionType {
        match self {
            UnaryOperator::Not => ExpressionType::Not,
            UnaryOperator::IsNull => ExpressionType::IsNull,
            UnaryOperator::IsNotNull => ExpressionType::IsNotNull,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_apply() {
        assert!(ComparisonOperator::EqualTo.apply(&1, &1));
        assert!(ComparisonOperator::NotEquals.apply(&1, &2));
        assert!(ComparisonOperator::LessThan.apply("abc", "abd"));
        assert!(ComparisonOperator::LessThanEqualTo.apply(&2.0, &2.0));
        assert!(ComparisonOperator::GreaterThan.apply(&3i64, &2i64));
        assert!(!ComparisonOperator::GreaterThanEqualTo.apply(&1i16, &2i16));
    }

    #[test]
    fn test_nan_uses_native_semantics() {
        let nan = f64::NAN;
        assert!(!ComparisonOperator::EqualTo.apply(&nan, &nan));
        assert!(ComparisonOperator::NotEquals.apply(&nan, &nan));
        assert!(!ComparisonOperator::LessThanEqualTo.apply(&nan, &1.0));
        assert!(!ComparisonOperator::GreaterThan.apply(&nan, &1.0));
    }

    #[test]
    fn test_logical_apply() {
        assert!(LogicalOperator::And.apply(true, true));
        assert!(!LogicalOperator::And.apply(true, false));
        assert!(LogicalOperator::Or.apply(false, true));
        assert!(!LogicalOperator::Or.apply(false, false));
    }

    #[test]
    fn test_expression_types() {
        assert_eq!(
            ComparisonOperator::LessThanEqualTo.expression_type(),
            ExpressionType::LessThanEqualTo
        );
        assert_eq!(LogicalOperator::Or.expression_type(), ExpressionType::Or);
        assert_eq!(UnaryOperator::IsNull.expression_type(), ExpressionType::IsNull);
    }

    #[test]
    fn test_operator_names() {
        assert_eq!(ComparisonOperator::EqualTo.name(), "EqualTo");
        assert_eq!(ComparisonOperator::GreaterThanEqualTo.name(), "GreaterThanEqualTo");
        assert_eq!(LogicalOperator::And.name(), "And");
        assert_eq!(UnaryOperator::IsNotNull.name(), "IsNotNull");
    }
}
