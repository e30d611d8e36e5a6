//! Type conversion utilities for MySQL

use crate::error::Result;
use crate::value::Value;
use mysql_async::Value as MySqlValue;

/// Convert a schemagen Value to a mysql_async Value
pub fn to_mysql_value(value: &Value) -> MySqlValue {
    match value {
        Value::Null => MySqlValue::NULL,
        Value::Bool(v) => MySqlValue::from(*v),
        Value::I64(v) => MySqlValue::from(*v),
        Value::U64(v) => MySqlValue::from(*v),
        Value::F64(v) => MySqlValue::from(*v),
        Value::String(v) => MySqlValue::from(v.as_str()),
        Value::Bytes(v) => MySqlValue::from(v.as_slice()),
    }
}

/// Convert a mysql_async Value to a schemagen Value
///
/// Catalog queries never select temporal columns on purpose; if one shows
/// up anyway it is rendered as text rather than rejected.
pub fn from_mysql_value(value: MySqlValue) -> Result<Value> {
    match value {
        MySqlValue::NULL => Ok(Value::Null),
        MySqlValue::Bytes(v) => {
            // Try to interpret as string first
            match String::from_utf8(v) {
                Ok(s) => Ok(Value::String(s)),
                Err(e) => Ok(Value::Bytes(e.into_bytes())),
            }
        }
        MySqlValue::Int(v) => Ok(Value::I64(v)),
        MySqlValue::UInt(v) => Ok(Value::U64(v)),
        MySqlValue::Float(v) => Ok(Value::F64(v.into())),
        MySqlValue::Double(v) => Ok(Value::F64(v)),
        MySqlValue::Date(year, month, day, hour, min, sec, micro) => Ok(Value::String(format!(
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}.{:06}",
            year, month, day, hour, min, sec, micro
        ))),
        MySqlValue::Time(is_neg, days, hours, mins, secs, micro) => Ok(Value::String(format!(
            "{}{}:{:02}:{:02}.{:06}",
            if is_neg { "-" } else { "" },
            days * 24 + hours as u32,
            mins,
            secs,
            micro
        ))),
    }
}
