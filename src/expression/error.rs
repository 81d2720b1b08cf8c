//! Error types for filter evaluation.

use crate::access::DataType;
use std::fmt;

/// Errors that can occur during filter evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum FilterError {
    /// The pivot type has no comparison or the operand type has no
    /// meaning for the operator
    UnsupportedFilterType {
        data_type: DataType,
        operator: String,
    },

    /// A value's runtime representation does not match its declared type,
    /// or cannot be coerced to the type the comparison needs
    FilterIllegalMember { data_type: DataType, message: String },

    /// Column ordinal past the end of the row
    ColumnIndexOutOfBounds { index: usize, row_size: usize },

    /// Expression tree could not be encoded or decoded
    Codec { message: String },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterError::UnsupportedFilterType {
                data_type,
                operator,
            } => {
                write!(
                    f,
                    "Data type {} not supported for filter expression {}",
                    data_type, operator
                )
            }

            FilterError::FilterIllegalMember { data_type, message } => {
                write!(f, "Illegal member for data type {}: {}", data_type, message)
            }

            FilterError::ColumnIndexOutOfBounds { index, row_size } => {
                write!(
                    f,
                    "Column index {} out of bounds for row with {} columns",
                    index, row_size
                )
            }

            FilterError::Codec { message } => write!(f, "Expression codec error: {}", message),
        }
    }
}

impl std::error::Error for FilterError {}

/// Result type for filter operations
pub type FilterResult<T> = Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FilterError::UnsupportedFilterType {
            data_type: DataType::Binary,
            operator: "LessThan".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Data type BINARY not supported for filter expression LessThan"
        );

        let err = FilterError::FilterIllegalMember {
            data_type: DataType::Int,
            message: "cannot convert String(\"x\") to int".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Illegal member for data type INT: cannot convert String(\"x\") to int"
        );

        let err = FilterError::ColumnIndexOutOfBounds {
            index: 5,
            row_size: 3,
        };
        assert_eq!(
            err.to_string(),
            "Column index 5 out of bounds for row with 3 columns"
        );

        let err = FilterError::Codec {
            message: "unexpected end of input".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Expression codec error: unexpected end of input"
        );
    }
}
