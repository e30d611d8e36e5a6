//! FromValue trait for converting catalog values to Rust types

use crate::error::{Error, Result};
use crate::value::Value;

/// Trait for types that can be constructed from a catalog value.
///
/// Conversions are lenient in the directions catalogs actually need: text
/// protocols hand back counts as strings, and flags arrive as `YES`/`NO`,
/// `Y`/`N` or `0`/`1` depending on the engine.
pub trait FromValue: Sized {
    /// Convert a catalog value to this type.
    fn from_value(value: Value) -> Result<Self>;
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bool(v) => Ok(v),
            Value::I64(v) => Ok(v != 0),
            Value::U64(v) => Ok(v != 0),
            Value::String(ref s) => match s.trim().to_ascii_uppercase().as_str() {
                "YES" | "Y" | "TRUE" | "T" | "1" => Ok(true),
                "NO" | "N" | "FALSE" | "F" | "0" | "" => Ok(false),
                _ => Err(Error::TypeConversion {
                    expected: "bool",
                    actual: format!("string({})", s),
                }),
            },
            Value::Null => Err(Error::UnexpectedNull(String::new())),
            _ => Err(Error::TypeConversion {
                expected: "bool",
                actual: value.type_name().to_string(),
            }),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::I64(v) => Ok(v),
            Value::U64(v) => v.try_into().map_err(|_| Error::TypeConversion {
                expected: "i64",
                actual: format!("u64({}) out of range", v),
            }),
            Value::Bool(v) => Ok(v.into()),
            // Oracle NUMBER and text-protocol results arrive as strings
            Value::String(ref s) => s.trim().parse().map_err(|_| Error::TypeConversion {
                expected: "i64",
                actual: format!("string({})", s),
            }),
            Value::Null => Err(Error::UnexpectedNull(String::new())),
            _ => Err(Error::TypeConversion {
                expected: "i64",
                actual: value.type_name().to_string(),
            }),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: Value) -> Result<Self> {
        let v = i64::from_value(value)?;
        v.try_into().map_err(|_| Error::TypeConversion {
            expected: "i32",
            actual: format!("i64({}) out of range", v),
        })
    }
}

impl FromValue for u64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::U64(v) => Ok(v),
            Value::I64(v) => v.try_into().map_err(|_| Error::TypeConversion {
                expected: "u64",
                actual: format!("i64({}) out of range", v),
            }),
            Value::String(ref s) => s.trim().parse().map_err(|_| Error::TypeConversion {
                expected: "u64",
                actual: format!("string({})", s),
            }),
            Value::Null => Err(Error::UnexpectedNull(String::new())),
            _ => Err(Error::TypeConversion {
                expected: "u64",
                actual: value.type_name().to_string(),
            }),
        }
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::F64(v) => Ok(v),
            Value::I64(v) => Ok(v as f64),
            Value::U64(v) => Ok(v as f64),
            Value::String(ref s) => s.trim().parse().map_err(|_| Error::TypeConversion {
                expected: "f64",
                actual: format!("string({})", s),
            }),
            Value::Null => Err(Error::UnexpectedNull(String::new())),
            _ => Err(Error::TypeConversion {
                expected: "f64",
                actual: value.type_name().to_string(),
            }),
        }
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(v) => Ok(v),
            Value::Bytes(v) => String::from_utf8(v).map_err(|e| Error::TypeConversion {
                expected: "string",
                actual: format!("invalid utf8: {}", e),
            }),
            Value::I64(v) => Ok(v.to_string()),
            Value::U64(v) => Ok(v.to_string()),
            Value::Bool(v) => Ok(v.to_string()),
            Value::Null => Err(Error::UnexpectedNull(String::new())),
            _ => Err(Error::TypeConversion {
                expected: "string",
                actual: value.type_name().to_string(),
            }),
        }
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Bytes(v) => Ok(v),
            Value::String(v) => Ok(v.into_bytes()),
            Value::Null => Err(Error::UnexpectedNull(String::new())),
            _ => Err(Error::TypeConversion {
                expected: "bytes",
                actual: value.type_name().to_string(),
            }),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            v => T::from_value(v).map(Some),
        }
    }
}
