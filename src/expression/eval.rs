//! Expression evaluation implementation.

use crate::access::{DataType, Row, TypedValue, Value};
use crate::expression::{
    ColumnRef, ComparisonOperator, Expression, FilterError, FilterResult, LogicalOperator,
    UnaryOperator,
};
use bigdecimal::BigDecimal;
use std::borrow::Cow;

/// Evaluator for expressions against one row
pub struct ExpressionEvaluator<'a, R: Row + ?Sized> {
    row: &'a R,
}

impl<'a, R: Row + ?Sized> ExpressionEvaluator<'a, R> {
    pub fn new(row: &'a R) -> Self {
        Self { row }
    }

    /// Evaluate an expression and return the result.
    ///
    /// Column and literal leaves come back borrowed from the row and the
    /// tree. Only conditional nodes produce an owned value, and that value
    /// is always a BOOLEAN, so filtering allocates nothing per row unless a
    /// comparison has to coerce an operand to text.
    pub fn evaluate<'e>(&self, expr: &'e Expression) -> FilterResult<Cow<'e, TypedValue>>
    where
        'a: 'e,
    {
        match expr {
            Expression::Literal(lit) => Ok(Cow::Borrowed(&lit.value)),

            Expression::Column(col) => {
                let value: &'e TypedValue = self.evaluate_column(col)?;
                Ok(Cow::Borrowed(value))
            }

            Expression::BinaryConditional { op, left, right } => {
                let left_val = self.evaluate(left)?;
                let right_val = self.evaluate(right)?;
                let result = comparison_holds(*op, &left_val, &right_val)?;
                Ok(Cow::Owned(boolean_result(left_val, result)))
            }

            Expression::BinaryLogical { op, left, right } => {
                // Both sides always run so an error on the right is never masked
                let left_val = self.evaluate(left)?;
                let right_val = self.evaluate(right)?;
                self.evaluate_logical(*op, left_val, &right_val)
                    .map(Cow::Owned)
            }

            Expression::UnaryConditional { op, operand } => {
                let operand_val = self.evaluate(operand)?;
                self.evaluate_unary(*op, operand_val).map(Cow::Owned)
            }

            Expression::In {
                expr,
                list,
                negated,
            } => {
                let probe = self.evaluate(expr)?;
                self.evaluate_in(probe, list, *negated).map(Cow::Owned)
            }
        }
    }

    fn evaluate_column(&self, col: &ColumnRef) -> FilterResult<&'a TypedValue> {
        let row: &'a R = self.row;
        row.get(col.index)
            .ok_or(FilterError::ColumnIndexOutOfBounds {
                index: col.index,
                row_size: row.len(),
            })
    }

    fn evaluate_logical(
        &self,
        op: LogicalOperator,
        left: Cow<'_, TypedValue>,
        right: &TypedValue,
    ) -> FilterResult<TypedValue> {
        let result = if left.is_null() || right.is_null() {
            false
        } else {
            let a = boolean_operand(&left, op.name())?;
            let b = boolean_operand(right, op.name())?;
            op.apply(a, b)
        };
        Ok(boolean_result(left, result))
    }

    fn evaluate_unary(
        &self,
        op: UnaryOperator,
        operand: Cow<'_, TypedValue>,
    ) -> FilterResult<TypedValue> {
        let result = match op {
            UnaryOperator::IsNull => operand.is_null(),
            UnaryOperator::IsNotNull => !operand.is_null(),
            UnaryOperator::Not if operand.is_null() => false,
            UnaryOperator::Not => !boolean_operand(&operand, op.name())?,
        };
        Ok(boolean_result(operand, result))
    }

    /// Membership stops at the first equal member. A null member makes
    /// NOT IN false since the list can no longer be shown to exclude the probe.
    fn evaluate_in<'e>(
        &self,
        probe: Cow<'_, TypedValue>,
        list: &'e [Expression],
        negated: bool,
    ) -> FilterResult<TypedValue>
    where
        'a: 'e,
    {
        if probe.is_null() {
            return Ok(boolean_result(probe, false));
        }

        let mut found = false;
        let mut saw_null = false;
        for item in list {
            let member = self.evaluate(item)?;
            if member.is_null() {
                saw_null = true;
                continue;
            }
            if compare_values(ComparisonOperator::EqualTo, &probe, &member)? {
                found = true;
                break;
            }
        }

        let result = if negated { !found && !saw_null } else { found };
        Ok(boolean_result(probe, result))
    }
}

/// Apply one comparison to two evaluated operands.
///
/// A null on either side yields `false` without comparing. The result reuses
/// `left` re-tagged as BOOLEAN; `right` is only borrowed and never mutated.
pub fn compare(
    op: ComparisonOperator,
    left: TypedValue,
    right: &TypedValue,
) -> FilterResult<TypedValue> {
    let result = comparison_holds(op, &left, right)?;
    Ok(boolean_result(Cow::Owned(left), result))
}

fn comparison_holds(
    op: ComparisonOperator,
    left: &TypedValue,
    right: &TypedValue,
) -> FilterResult<bool> {
    if left.is_null() || right.is_null() {
        return Ok(false);
    }
    compare_values(op, left, right)
}

/// Compare two non-null values through the getter of the pivot type.
pub fn compare_values(
    op: ComparisonOperator,
    left: &TypedValue,
    right: &TypedValue,
) -> FilterResult<bool> {
    let pivot = DataType::pivot(left.data_type(), right.data_type());
    let result = match pivot {
        DataType::String => {
            let (a, b) = (left.get_string()?, right.get_string()?);
            op.apply::<str>(&a, &b)
        }
        DataType::Short => op.apply(&left.get_short()?, &right.get_short()?),
        DataType::Int => op.apply(&left.get_int()?, &right.get_int()?),
        DataType::Long => op.apply(&left.get_long()?, &right.get_long()?),
        DataType::Double => op.apply(&left.get_double()?, &right.get_double()?),
        DataType::Decimal => {
            let (a, b) = (left.get_decimal()?, right.get_decimal()?);
            op.apply::<BigDecimal>(&a, &b)
        }
        DataType::Date | DataType::Timestamp => op.apply(&left.get_time()?, &right.get_time()?),
        DataType::Null | DataType::Boolean | DataType::Binary => {
            return Err(FilterError::UnsupportedFilterType {
                data_type: pivot,
                operator: op.name().to_string(),
            })
        }
    };
    Ok(result)
}

fn boolean_operand(value: &TypedValue, operator: &str) -> FilterResult<bool> {
    if value.data_type() != DataType::Boolean {
        return Err(FilterError::UnsupportedFilterType {
            data_type: value.data_type(),
            operator: operator.to_string(),
        });
    }
    value.get_boolean()
}

/// Outcome of a conditional node. An owned operand is re-tagged in place;
/// a borrowed one is left alone and a fresh BOOLEAN is returned instead.
fn boolean_result(operand: Cow<'_, TypedValue>, result: bool) -> TypedValue {
    match operand {
        Cow::Owned(mut value) => {
            value.set(DataType::Boolean, Value::Boolean(result));
            value
        }
        Cow::Borrowed(_) => TypedValue::boolean(result),
    }
}

impl Expression {
    /// Evaluate this expression against a row
    pub fn evaluate<R: Row + ?Sized>(&self, row: &R) -> FilterResult<TypedValue> {
        evaluate_expression(self, row)
    }
}

/// Helper function to evaluate an expression against a row
pub fn evaluate_expression<R: Row + ?Sized>(
    expr: &Expression,
    row: &R,
) -> FilterResult<TypedValue> {
    ExpressionEvaluator::new(row)
        .evaluate(expr)
        .map(Cow::into_owned)
}

/// Evaluate a filter and demand a boolean outcome.
///
/// A null outcome counts as not matching. Any non-boolean outcome is an
/// `FilterIllegalMember` error.
pub fn row_matches<R: Row + ?Sized>(expr: &Expression, row: &R) -> FilterResult<bool> {
    let result = ExpressionEvaluator::new(row).evaluate(expr)?;
    if result.is_null() {
        return Ok(false);
    }
    if result.data_type() != DataType::Boolean {
        return Err(FilterError::FilterIllegalMember {
            data_type: result.data_type(),
            message: format!("filter {} did not produce a boolean", expr),
        });
    }
    result.get_boolean()
}

/// Type alias for predicate functions
pub type Predicate = Box<dyn Fn(&[TypedValue]) -> FilterResult<bool> + Send + Sync + 'static>;

/// Helper function to create a predicate function from an expression
pub fn expression_to_predicate(expr: Expression) -> Predicate {
    Box::new(move |values| row_matches(&expr, values))
}
