//! Filter expression tree definitions.

use crate::access::TypedValue;
use crate::expression::operator::{
    ComparisonOperator, ExpressionType, LogicalOperator, UnaryOperator,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column reference in an expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    /// Column ordinal in the row (0-based)
    pub index: usize,
    /// Optional column name for plan printing
    pub name: Option<String>,
}

impl ColumnRef {
    pub fn new(index: usize) -> Self {
        Self { index, name: None }
    }

    pub fn with_name(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: Some(name.into()),
        }
    }
}

/// Literal value in an expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    pub value: TypedValue,
}

impl Literal {
    pub fn new(value: TypedValue) -> Self {
        Self { value }
    }
}

/// Filter expression tree node.
///
/// Trees own their children, hold no scratch state and are never mutated by
/// evaluation, so one tree can be shared across threads and evaluated
/// against many rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Literal(Literal),

    Column(ColumnRef),

    /// Typed comparison with null-is-false semantics
    BinaryConditional {
        op: ComparisonOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    BinaryLogical {
        op: LogicalOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    UnaryConditional {
        op: UnaryOperator,
        operand: Box<Expression>,
    },

    /// Membership test against a list of expressions
    In {
        expr: Box<Expression>,
        list: Vec<Expression>,
        negated: bool,
    },
}

impl Expression {
    pub fn literal(value: TypedValue) -> Self {
        Expression::Literal(Literal::new(value))
    }

    pub fn column(index: usize) -> Self {
        Expression::Column(ColumnRef::new(index))
    }

    pub fn column_with_name(index: usize, name: impl Into<String>) -> Self {
        Expression::Column(ColumnRef::with_name(index, name))
    }

    pub fn comparison(op: ComparisonOperator, left: Expression, right: Expression) -> Self {
        Expression::BinaryConditional {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn logical(op: LogicalOperator, left: Expression, right: Expression) -> Self {
        Expression::BinaryLogical {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOperator, operand: Expression) -> Self {
        Expression::UnaryConditional {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn eq(left: Expression, right: Expression) -> Self {
        Self::comparison(ComparisonOperator::EqualTo, left, right)
    }

    pub fn ne(left: Expression, right: Expression) -> Self {
        Self::comparison(ComparisonOperator::NotEquals, left, right)
    }

    pub fn lt(left: Expression, right: Expression) -> Self {
        Self::comparison(ComparisonOperator::LessThan, left, right)
    }

    pub fn le(left: Expression, right: Expression) -> Self {
        Self::comparison(ComparisonOperator::LessThanEqualTo, left, right)
    }

    pub fn gt(left: Expression, right: Expression) -> Self {
        Self::comparison(ComparisonOperator::GreaterThan, left, right)
    }

    pub fn ge(left: Expression, right: Expression) -> Self {
        Self::comparison(ComparisonOperator::GreaterThanEqualTo, left, right)
    }

    pub fn and(left: Expression, right: Expression) -> Self {
        Self::logical(LogicalOperator::And, left, right)
    }

    pub fn or(left: Expression, right: Expression) -> Self {
        Self::logical(LogicalOperator::Or, left, right)
    }

    pub fn not_expr(operand: Expression) -> Self {
        Self::unary(UnaryOperator::Not, operand)
    }

    pub fn is_null(operand: Expression) -> Self {
        Self::unary(UnaryOperator::IsNull, operand)
    }

    pub fn is_not_null(operand: Expression) -> Self {
        Self::unary(UnaryOperator::IsNotNull, operand)
    }

    pub fn in_list(expr: Expression, list: Vec<Expression>) -> Self {
        Expression::In {
            expr: Box::new(expr),
            list,
            negated: false,
        }
    }

    pub fn not_in_list(expr: Expression, list: Vec<Expression>) -> Self {
        Expression::In {
            expr: Box::new(expr),
            list,
            negated: true,
        }
    }

    pub fn expression_type(&self) -> ExpressionType {
        match self {
            Expression::Literal(_) => ExpressionType::Literal,
            Expression::Column(_) => ExpressionType::Column,
            Expression::BinaryConditional { op, .. } => op.expression_type(),
            Expression::BinaryLogical { op, .. } => op.expression_type(),
            Expression::UnaryConditional { op, .. } => op.expression_type(),
            Expression::In { negated: false, .. } => ExpressionType::In,
            Expression::In { negated: true, .. } => ExpressionType::NotIn,
        }
    }

    /// Render the predicate for diagnostics, e.g. `LessThanEqualTo(Column(age),Literal(30))`
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(lit) => write!(f, "Literal({})", lit.value),
            Expression::Column(col) => match &col.name {
                Some(name) => write!(f, "Column({})", name),
                None => write!(f, "Column(#{})", col.index),
            },
            Expression::BinaryConditional { op, left, right } => {
                write!(f, "{}({},{})", op.name(), left, right)
            }
            Expression::BinaryLogical { op, left, right } => {
                write!(f, "{}({},{})", op.name(), left, right)
            }
            Expression::UnaryConditional { op, operand } => {
                write!(f, "{}({})", op.name(), operand)
            }
            Expression::In {
                expr,
                list,
                negated,
            } => {
                write!(f, "{}({},List(", if *negated { "NotIn" } else { "In" }, expr)?;
                for (i, item) in list.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "))")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_ref() {
        let col1 = ColumnRef::new(0);
        assert_eq!(col1.index, 0);
        assert!(col1.name.is_none());

        let col2 = ColumnRef::with_name(1, "age");
        assert_eq!(col2.index, 1);
        assert_eq!(col2.name.as_deref(), Some("age"));
    }

    #[test]
    fn test_describe() {
        let expr = Expression::le(
            Expression::column_with_name(0, "age"),
            Expression::literal(TypedValue::int(30)),
        );
        assert_eq!(expr.describe(), "LessThanEqualTo(Column(age),Literal(30))");

        let expr = Expression::and(
            Expression::eq(
                Expression::column(2),
                Expression::literal(TypedValue::string("x")),
            ),
            Expression::not_expr(Expression::is_null(Expression::column(1))),
        );
        assert_eq!(
            expr.describe(),
            "And(EqualTo(Column(#2),Literal(x)),Not(IsNull(Column(#1))))"
        );

        let expr = Expression::not_in_list(
            Expression::column(0),
            vec![
                Expression::literal(TypedValue::int(1)),
                Expression::literal(TypedValue::int(2)),
            ],
        );
        assert_eq!(
            expr.describe(),
            "NotIn(Column(#0),List(Literal(1),Literal(2)))"
        );
    }

    #[test]
    fn test_expression_type() {
        let col = || Expression::column(0);
        let lit = || Expression::literal(TypedValue::long(1));

        assert_eq!(lit().expression_type(), ExpressionType::Literal);
        assert_eq!(col().expression_type(), ExpressionType::Column);
        assert_eq!(
            Expression::le(col(), lit()).expression_type(),
            ExpressionType::LessThanEqualTo
        );
        assert_eq!(
            Expression::ge(col(), lit()).expression_type(),
            ExpressionType::GreaterThanEqualTo
        );
        assert_eq!(
            Expression::or(col(), lit()).expression_type(),
            ExpressionType::Or
        );
        assert_eq!(
            Expression::is_not_null(col()).expression_type(),
            ExpressionType::IsNotNull
        );
        assert_eq!(
            Expression::in_list(col(), vec![lit()]).expression_type(),
            ExpressionType::In
        );
        assert_eq!(
            Expression::not_in_list(col(), vec![lit()]).expression_type(),
            ExpressionType::NotIn
        );
    }
}
