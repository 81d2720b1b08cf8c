pub mod access;
pub mod error;
pub mod expression;
pub mod probe;
pub mod storage;

pub use error::{Error, Result};
