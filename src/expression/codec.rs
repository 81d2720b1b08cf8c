//! Binary encoding of expression trees.
//!
//! Plan builders ship predicates to scan workers as bytes; workers decode
//! once per scan unit and evaluate the tree against every row.

use crate::expression::{Expression, FilterError, FilterResult};

pub fn encode_expression(expr: &Expression) -> FilterResult<Vec<u8>> {
    bincode::serialize(expr).map_err(|e| FilterError::Codec {
        message: e.to_string(),
    })
}

pub fn decode_expression(bytes: &[u8]) -> FilterResult<Expression> {
    bincode::deserialize(bytes).map_err(|e| FilterError::Codec {
        message: e.to_string(),
    })
}
