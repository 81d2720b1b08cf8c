use crate::expression::{FilterError, FilterResult};
use bigdecimal::{BigDecimal, ToPrimitive};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Scalar types understood by the filter engine.
///
/// The discriminant doubles as the coercion precedence: when two operands of
/// a comparison disagree on type, the one with the larger discriminant picks
/// the typed getter used for both sides.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Null = 0,
    Boolean = 1,
    Binary = 2,
    Short = 3,
    Int = 4,
    Long = 5,
    Double = 6,
    Decimal = 7,
    Date = 8,
    Timestamp = 9,
    String = 10,
}

impl DataType {
    /// Coercion precedence. Unique per variant.
    pub const fn precedence(self) -> u8 {
        self as u8
    }

    /// Pick the type that drives comparison dispatch for two operands.
    ///
    /// Precedence is a strict total order, so two different types never tie
    /// and the result does not depend on which side each type came from.
    pub fn pivot(left: DataType, right: DataType) -> DataType {
        if left.precedence() >= right.precedence() {
            left
        } else {
            right
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DataType::Null => "NULL",
            DataType::Boolean => "BOOLEAN",
            DataType::Binary => "BINARY",
            DataType::Short => "SHORT",
            DataType::Int => "INT",
            DataType::Long => "LONG",
            DataType::Double => "DOUBLE",
            DataType::Decimal => "DECIMAL",
            DataType::Date => "DATE",
            DataType::Timestamp => "TIMESTAMP",
            DataType::String => "STRING",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runtime representation of a decoded column value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    String(String),
    Short(i16),
    Int(i32),
    Long(i64),
    Double(f64),
    Decimal(#[serde(with = "decimal_text")] BigDecimal),
    /// Milliseconds since the Unix epoch.
    Time(i64),
    Boolean(bool),
    Binary(Vec<u8>),
}

impl Value {
    /// Check if this representation is legal for the declared type
    pub fn fits(&self, data_type: DataType) -> bool {
        matches!(
            (data_type, self),
            (_, Value::Null)
                | (DataType::String, Value::String(_))
                | (DataType::Short, Value::Short(_))
                | (DataType::Int, Value::Int(_))
                | (DataType::Long, Value::Long(_))
                | (DataType::Double, Value::Double(_))
                | (DataType::Decimal, Value::Decimal(_))
                | (DataType::Date | DataType::Timestamp, Value::Time(_))
                | (DataType::Boolean, Value::Boolean(_))
                | (DataType::Binary, Value::Binary(_))
        )
    }
}

/// Decimals travel as their canonical text so every serde format can carry them.
mod decimal_text {
    use bigdecimal::BigDecimal;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigDecimal, D::Error> {
        let text = String::deserialize(deserializer)?;
        BigDecimal::from_str(&text).map_err(D::Error::custom)
    }
}

/// A decoded scalar paired with its declared type.
///
/// The typed constructors always produce a consistent pair. `new` accepts
/// whatever the decoding layer hands over; a representation that does not
/// match the declared type surfaces as `FilterIllegalMember` from the typed
/// getters rather than at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedValue {
    data_type: DataType,
    value: Value,
}

impl TypedValue {
    pub fn new(data_type: DataType, value: Value) -> Self {
        Self { data_type, value }
    }

    pub fn null() -> Self {
        Self::new(DataType::Null, Value::Null)
    }

    pub fn string(val: impl Into<String>) -> Self {
        Self::new(DataType::String, Value::String(val.into()))
    }

    pub fn short(val: i16) -> Self {
        Self::new(DataType::Short, Value::Short(val))
    }

    pub fn int(val: i32) -> Self {
        Self::new(DataType::Int, Value::Int(val))
    }

    pub fn long(val: i64) -> Self {
        Self::new(DataType::Long, Value::Long(val))
    }

    pub fn double(val: f64) -> Self {
        Self::new(DataType::Double, Value::Double(val))
    }

    pub fn decimal(val: BigDecimal) -> Self {
        Self::new(DataType::Decimal, Value::Decimal(val))
    }

    pub fn date(epoch_millis: i64) -> Self {
        Self::new(DataType::Date, Value::Time(epoch_millis))
    }

    pub fn timestamp(epoch_millis: i64) -> Self {
        Self::new(DataType::Timestamp, Value::Time(epoch_millis))
    }

    pub fn boolean(val: bool) -> Self {
        Self::new(DataType::Boolean, Value::Boolean(val))
    }

    pub fn binary(val: Vec<u8>) -> Self {
        Self::new(DataType::Binary, Value::Binary(val))
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Replace both the declared type and the value.
    pub fn set(&mut self, data_type: DataType, value: Value) {
        self.data_type = data_type;
        self.value = value;
    }

    pub fn is_null(&self) -> bool {
        self.data_type == DataType::Null || matches!(self.value, Value::Null)
    }

    /// The value, provided it is legal for the declared type and not null.
    fn checked(&self, target: &str) -> FilterResult<&Value> {
        if self.is_null() {
            return Err(self.illegal(format!("cannot read NULL as {}", target)));
        }
        if !self.value.fits(self.data_type) {
            return Err(self.illegal(format!(
                "value {:?} does not match declared type",
                self.value
            )));
        }
        Ok(&self.value)
    }

    fn illegal(&self, message: String) -> FilterError {
        FilterError::FilterIllegalMember {
            data_type: self.data_type,
            message,
        }
    }

    fn cannot_convert(&self, target: &str) -> FilterError {
        self.illegal(format!("cannot convert {:?} to {}", self.value, target))
    }

    pub fn get_string(&self) -> FilterResult<Cow<'_, str>> {
        match self.checked("string")? {
            Value::String(s) => Ok(Cow::Borrowed(s)),
            Value::Short(v) => Ok(Cow::Owned(v.to_string())),
            Value::Int(v) => Ok(Cow::Owned(v.to_string())),
            Value::Long(v) | Value::Time(v) => Ok(Cow::Owned(v.to_string())),
            Value::Double(v) => Ok(Cow::Owned(v.to_string())),
            Value::Decimal(v) => Ok(Cow::Owned(v.to_string())),
            Value::Boolean(v) => Ok(Cow::Owned(v.to_string())),
            Value::Binary(_) | Value::Null => Err(self.cannot_convert("string")),
        }
    }

    pub fn get_short(&self) -> FilterResult<i16> {
        match self.checked("short")? {
            Value::Short(v) => Ok(*v),
            Value::Int(v) => i16::try_from(*v).map_err(|_| self.cannot_convert("short")),
            Value::Long(v) => i16::try_from(*v).map_err(|_| self.cannot_convert("short")),
            Value::String(s) => s.trim().parse().map_err(|_| self.cannot_convert("short")),
            _ => Err(self.cannot_convert("short")),
        }
    }

    pub fn get_int(&self) -> FilterResult<i32> {
        match self.checked("int")? {
            Value::Short(v) => Ok(i32::from(*v)),
            Value::Int(v) => Ok(*v),
            Value::Long(v) => i32::try_from(*v).map_err(|_| self.cannot_convert("int")),
            Value::String(s) => s.trim().parse().map_err(|_| self.cannot_convert("int")),
            _ => Err(self.cannot_convert("int")),
        }
    }

    pub fn get_long(&self) -> FilterResult<i64> {
        match self.checked("long")? {
            Value::Short(v) => Ok(i64::from(*v)),
            Value::Int(v) => Ok(i64::from(*v)),
            Value::Long(v) | Value::Time(v) => Ok(*v),
            Value::String(s) => s.trim().parse().map_err(|_| self.cannot_convert("long")),
            _ => Err(self.cannot_convert("long")),
        }
    }

    pub fn get_double(&self) -> FilterResult<f64> {
        match self.checked("double")? {
            Value::Short(v) => Ok(f64::from(*v)),
            Value::Int(v) => Ok(f64::from(*v)),
            Value::Long(v) => Ok(*v as f64),
            Value::Double(v) => Ok(*v),
            Value::Decimal(v) => v.to_f64().ok_or_else(|| self.cannot_convert("double")),
            Value::String(s) => s.trim().parse().map_err(|_| self.cannot_convert("double")),
            _ => Err(self.cannot_convert("double")),
        }
    }

    /// A DECIMAL value is borrowed; every other source is converted.
    pub fn get_decimal(&self) -> FilterResult<Cow<'_, BigDecimal>> {
        let converted = match self.checked("decimal")? {
            Value::Decimal(v) => return Ok(Cow::Borrowed(v)),
            Value::Short(v) => BigDecimal::from(*v),
            Value::Int(v) => BigDecimal::from(*v),
            Value::Long(v) => BigDecimal::from(*v),
            // f64 Display is the shortest round-trip form and never uses an exponent
            Value::Double(v) if v.is_finite() => BigDecimal::from_str(&v.to_string())
                .map_err(|_| self.cannot_convert("decimal"))?,
            Value::String(s) => {
                BigDecimal::from_str(s.trim()).map_err(|_| self.cannot_convert("decimal"))?
            }
            _ => return Err(self.cannot_convert("decimal")),
        };
        Ok(Cow::Owned(converted))
    }

    /// Epoch milliseconds.
    pub fn get_time(&self) -> FilterResult<i64> {
        match self.checked("time")? {
            Value::Time(v) | Value::Long(v) => Ok(*v),
            Value::Short(v) => Ok(i64::from(*v)),
            Value::Int(v) => Ok(i64::from(*v)),
            Value::String(s) => s.trim().parse().map_err(|_| self.cannot_convert("time")),
            _ => Err(self.cannot_convert("time")),
        }
    }

    pub fn get_boolean(&self) -> FilterResult<bool> {
        match self.checked("boolean")? {
            Value::Boolean(v) => Ok(*v),
            Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
            Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
            _ => Err(self.cannot_convert("boolean")),
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Value::Null => write!(f, "null"),
            Value::String(s) => write!(f, "{}", s),
            Value::Short(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Long(v) | Value::Time(v) => write!(f, "{}", v),
            Value::Double(v) => write!(f, "{}", v),
            Value::Decimal(v) => write!(f, "{}", v),
            Value::Boolean(v) => write!(f, "{}", v),
            Value::Binary(bytes) => {
                for b in bytes {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
        }
    }
}
