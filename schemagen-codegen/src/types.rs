//! Native column types to canonical semantic types
//!
//! Every reader funnels its engine's type descriptors through [`map_type`].
//! Each provider keeps its own table because the same native name can mean
//! different things per engine (`float` is single precision in MySQL and
//! double precision in SQL Server; Oracle `number` is an integer only when
//! its scale is zero). Anything a table does not recognise maps to
//! [`ScalarType::String`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::provider::Provider;

/// Provider-independent scalar type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Decimal,
    Bool,
    DateTime,
    Guid,
    Bytes,
    String,
}

impl ScalarType {
    /// Canonical name used in configuration and serialized models.
    pub fn name(&self) -> &'static str {
        match self {
            ScalarType::I8 => "i8",
            ScalarType::I16 => "i16",
            ScalarType::I32 => "i32",
            ScalarType::I64 => "i64",
            ScalarType::U8 => "u8",
            ScalarType::U16 => "u16",
            ScalarType::U32 => "u32",
            ScalarType::U64 => "u64",
            ScalarType::F32 => "f32",
            ScalarType::F64 => "f64",
            ScalarType::Decimal => "decimal",
            ScalarType::Bool => "bool",
            ScalarType::DateTime => "datetime",
            ScalarType::Guid => "guid",
            ScalarType::Bytes => "bytes",
            ScalarType::String => "string",
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ScalarType::I8
                | ScalarType::I16
                | ScalarType::I32
                | ScalarType::I64
                | ScalarType::U8
                | ScalarType::U16
                | ScalarType::U32
                | ScalarType::U64
        )
    }

    pub fn is_datetime(&self) -> bool {
        matches!(self, ScalarType::DateTime)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A type name that is not part of the canonical vocabulary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown property type '{0}'")]
pub struct ParseTypeError(pub String);

impl FromStr for ScalarType {
    type Err = ParseTypeError;

    /// Accepts canonical names plus the common aliases people write in
    /// override files (`long`, `int`, `DateTime`, `byte[]`, `uuid`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let scalar = match s.trim().to_ascii_lowercase().as_str() {
            "i8" | "sbyte" => ScalarType::I8,
            "i16" | "short" => ScalarType::I16,
            "i32" | "int" => ScalarType::I32,
            "i64" | "long" => ScalarType::I64,
            "u8" | "byte" => ScalarType::U8,
            "u16" | "ushort" => ScalarType::U16,
            "u32" | "uint" => ScalarType::U32,
            "u64" | "ulong" => ScalarType::U64,
            "f32" | "float" => ScalarType::F32,
            "f64" | "double" => ScalarType::F64,
            "decimal" => ScalarType::Decimal,
            "bool" | "boolean" => ScalarType::Bool,
            "datetime" | "timestamp" => ScalarType::DateTime,
            "guid" | "uuid" => ScalarType::Guid,
            "bytes" | "byte[]" | "binary" => ScalarType::Bytes,
            "string" | "str" | "text" => ScalarType::String,
            _ => return Err(ParseTypeError(s.to_string())),
        };
        Ok(scalar)
    }
}

/// The resolved type of a generated property: a scalar plus nullability.
///
/// The textual form is the scalar's canonical name with a `?` suffix when
/// nullable, e.g. `"i64"` or `"datetime?"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PropertyType {
    pub scalar: ScalarType,
    pub nullable: bool,
}

impl PropertyType {
    pub fn new(scalar: ScalarType, nullable: bool) -> Self {
        Self { scalar, nullable }
    }

    /// A non-nullable property of the given scalar.
    pub fn required(scalar: ScalarType) -> Self {
        Self::new(scalar, false)
    }

    /// A nullable property of the given scalar.
    pub fn optional(scalar: ScalarType) -> Self {
        Self::new(scalar, true)
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "{}?", self.scalar)
        } else {
            f.write_str(self.scalar.name())
        }
    }
}

impl FromStr for PropertyType {
    type Err = ParseTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.strip_suffix('?') {
            Some(inner) => Ok(Self::optional(inner.parse()?)),
            None => Ok(Self::required(trimmed.parse()?)),
        }
    }
}

impl From<PropertyType> for String {
    fn from(value: PropertyType) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for PropertyType {
    type Error = ParseTypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A native type descriptor split into base name and numeric arguments,
/// e.g. `"NUMBER(10,0)"` becomes `("number", [10, 0])`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Descriptor {
    base: String,
    args: Vec<u32>,
}

impl Descriptor {
    fn parse(raw: &str) -> Self {
        let lower = raw.trim().to_ascii_lowercase();
        let (head, args) = match lower.split_once('(') {
            Some((head, rest)) => {
                let inner = rest.split(')').next().unwrap_or_default();
                let args = inner
                    .split(',')
                    .filter_map(|a| a.trim().parse().ok())
                    .collect();
                (head.to_string(), args)
            }
            None => (lower, Vec::new()),
        };

        let base = head
            .split_whitespace()
            .filter(|word| !matches!(*word, "unsigned" | "signed" | "zerofill"))
            .collect::<Vec<_>>()
            .join(" ");

        Self { base, args }
    }

    fn arg(&self, index: usize) -> Option<u32> {
        self.args.get(index).copied()
    }
}

/// Map a native type descriptor to its canonical scalar type.
///
/// `descriptor` may carry size arguments (`varchar(255)`, `number(10,0)`);
/// `unsigned` is only consulted by engines that have unsigned integers.
/// Total and deterministic: unknown descriptors map to
/// [`ScalarType::String`].
pub fn map_type(provider: Provider, descriptor: &str, unsigned: bool) -> ScalarType {
    let native = Descriptor::parse(descriptor);
    match provider {
        Provider::MySql => map_mysql(&native, unsigned),
        Provider::SqlServer => map_sqlserver(&native),
        Provider::Postgres => map_postgres(&native),
        Provider::Oracle => map_oracle(&native),
        Provider::Sqlite => map_sqlite(&native),
    }
}

fn signed_or_not(unsigned: bool, signed: ScalarType, unsigned_ty: ScalarType) -> ScalarType {
    if unsigned {
        unsigned_ty
    } else {
        signed
    }
}

fn map_mysql(native: &Descriptor, unsigned: bool) -> ScalarType {
    match native.base.as_str() {
        "bigint" => signed_or_not(unsigned, ScalarType::I64, ScalarType::U64),
        "int" | "integer" | "mediumint" => signed_or_not(unsigned, ScalarType::I32, ScalarType::U32),
        "smallint" => signed_or_not(unsigned, ScalarType::I16, ScalarType::U16),
        // tinyint(1) is MySQL's boolean
        "tinyint" if native.arg(0) == Some(1) => ScalarType::Bool,
        "tinyint" => signed_or_not(unsigned, ScalarType::I8, ScalarType::U8),
        "bit" if native.arg(0).map_or(true, |width| width == 1) => ScalarType::Bool,
        "bit" => ScalarType::Bytes,
        "bool" | "boolean" => ScalarType::Bool,
        "guid" => ScalarType::Guid,
        "date" | "datetime" | "timestamp" | "smalldatetime" => ScalarType::DateTime,
        "float" => ScalarType::F32,
        "double" | "double precision" | "real" => ScalarType::F64,
        "decimal" | "dec" | "numeric" | "fixed" | "money" | "smallmoney" => ScalarType::Decimal,
        "binary" | "varbinary" | "image" | "blob" | "tinyblob" | "mediumblob" | "longblob" => {
            ScalarType::Bytes
        }
        _ => ScalarType::String,
    }
}

fn map_sqlserver(native: &Descriptor) -> ScalarType {
    match native.base.as_str() {
        "bigint" => ScalarType::I64,
        "int" => ScalarType::I32,
        "smallint" => ScalarType::I16,
        // SQL Server's tinyint is unsigned
        "tinyint" => ScalarType::U8,
        "bit" => ScalarType::Bool,
        "uniqueidentifier" => ScalarType::Guid,
        "date" | "datetime" | "datetime2" | "smalldatetime" | "datetimeoffset" => {
            ScalarType::DateTime
        }
        "float" => ScalarType::F64,
        "real" => ScalarType::F32,
        "decimal" | "numeric" | "money" | "smallmoney" => ScalarType::Decimal,
        "binary" | "varbinary" | "image" | "timestamp" | "rowversion" => ScalarType::Bytes,
        _ => ScalarType::String,
    }
}

fn map_postgres(native: &Descriptor) -> ScalarType {
    match native.base.as_str() {
        "bigint" | "int8" | "bigserial" | "serial8" => ScalarType::I64,
        "integer" | "int" | "int4" | "serial" | "serial4" => ScalarType::I32,
        "smallint" | "int2" | "smallserial" | "serial2" => ScalarType::I16,
        "oid" => ScalarType::U32,
        "boolean" | "bool" => ScalarType::Bool,
        "uuid" => ScalarType::Guid,
        "date"
        | "timestamp"
        | "timestamp without time zone"
        | "timestamp with time zone"
        | "timestamptz" => ScalarType::DateTime,
        "real" | "float4" => ScalarType::F32,
        "double precision" | "float8" => ScalarType::F64,
        "numeric" | "decimal" | "money" => ScalarType::Decimal,
        "bytea" => ScalarType::Bytes,
        _ => ScalarType::String,
    }
}

fn map_oracle(native: &Descriptor) -> ScalarType {
    match native.base.as_str() {
        // NUMBER(p, 0) is an integer; precision picks the width
        "number" => match (native.arg(0), native.arg(1)) {
            (Some(1), Some(0)) => ScalarType::Bool,
            (Some(p), Some(0)) if p <= 4 => ScalarType::I16,
            (Some(p), Some(0)) if p <= 9 => ScalarType::I32,
            (Some(p), Some(0)) if p <= 18 => ScalarType::I64,
            _ => ScalarType::Decimal,
        },
        "integer" | "int" | "smallint" => ScalarType::I64,
        "binary_float" => ScalarType::F32,
        "binary_double" | "float" => ScalarType::F64,
        "date" | "timestamp" | "timestamp with time zone" | "timestamp with local time zone" => {
            ScalarType::DateTime
        }
        "raw" if native.arg(0) == Some(16) => ScalarType::Guid,
        "raw" | "long raw" | "blob" | "bfile" => ScalarType::Bytes,
        _ => ScalarType::String,
    }
}

/// SQLite declares types freely; resolve by column affinity first and only
/// then by exact name.
fn map_sqlite(native: &Descriptor) -> ScalarType {
    let base = native.base.as_str();
    if base.is_empty() || base.contains("blob") {
        return ScalarType::Bytes;
    }
    if base.contains("int") {
        return ScalarType::I64;
    }
    if base.contains("char") || base.contains("clob") || base.contains("text") {
        return ScalarType::String;
    }
    if base.contains("real") || base.contains("floa") || base.contains("doub") {
        return ScalarType::F64;
    }
    match base {
        "bool" | "boolean" => ScalarType::Bool,
        "date" | "datetime" | "timestamp" => ScalarType::DateTime,
        "decimal" | "numeric" => ScalarType::Decimal,
        "guid" | "uuid" | "uniqueidentifier" => ScalarType::Guid,
        _ => ScalarType::String,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mysql_integers_honor_unsigned() {
        assert_eq!(map_type(Provider::MySql, "bigint", false), ScalarType::I64);
        assert_eq!(map_type(Provider::MySql, "bigint", true), ScalarType::U64);
        assert_eq!(map_type(Provider::MySql, "int(10) unsigned", true), ScalarType::U32);
        assert_eq!(map_type(Provider::MySql, "smallint", true), ScalarType::U16);
        assert_eq!(map_type(Provider::MySql, "tinyint(4)", false), ScalarType::I8);
        assert_eq!(map_type(Provider::MySql, "tinyint(1)", false), ScalarType::Bool);
    }

    #[test]
    fn test_same_name_differs_per_provider() {
        assert_eq!(map_type(Provider::MySql, "float", false), ScalarType::F32);
        assert_eq!(map_type(Provider::SqlServer, "float", false), ScalarType::F64);
        assert_eq!(map_type(Provider::MySql, "timestamp", false), ScalarType::DateTime);
        assert_eq!(map_type(Provider::SqlServer, "timestamp", false), ScalarType::Bytes);
        assert_eq!(map_type(Provider::Oracle, "NUMBER(10,0)", false), ScalarType::I64);
        assert_eq!(map_type(Provider::Oracle, "NUMBER(5,0)", false), ScalarType::I32);
        assert_eq!(map_type(Provider::Oracle, "NUMBER(12,2)", false), ScalarType::Decimal);
        assert_eq!(map_type(Provider::Oracle, "NUMBER", false), ScalarType::Decimal);
    }

    #[test]
    fn test_oracle_wide_numbers_stay_decimal() {
        assert_eq!(map_type(Provider::Oracle, "NUMBER(18,0)", false), ScalarType::I64);
        assert_eq!(map_type(Provider::Oracle, "NUMBER(19,0)", false), ScalarType::Decimal);
        assert_eq!(map_type(Provider::Oracle, "NUMBER(38,0)", false), ScalarType::Decimal);
        assert_eq!(map_type(Provider::Oracle, "NUMBER(1,0)", false), ScalarType::Bool);
        assert_eq!(map_type(Provider::Oracle, "RAW(16)", false), ScalarType::Guid);
        assert_eq!(map_type(Provider::Oracle, "RAW(32)", false), ScalarType::Bytes);
        assert_eq!(map_type(Provider::Oracle, "RAW", false), ScalarType::Bytes);
    }

    #[test]
    fn test_unsigned_ignored_without_unsigned_concept() {
        assert_eq!(map_type(Provider::Postgres, "bigint", true), ScalarType::I64);
        assert_eq!(map_type(Provider::SqlServer, "int", true), ScalarType::I32);
    }

    #[test]
    fn test_postgres_multiword_names() {
        assert_eq!(
            map_type(Provider::Postgres, "timestamp(3) without time zone", false),
            ScalarType::DateTime
        );
        assert_eq!(
            map_type(Provider::Postgres, "double precision", false),
            ScalarType::F64
        );
        assert_eq!(
            map_type(Provider::Postgres, "character varying(40)", false),
            ScalarType::String
        );
        assert_eq!(map_type(Provider::Postgres, "uuid", false), ScalarType::Guid);
    }

    #[test]
    fn test_sqlite_affinity() {
        assert_eq!(map_type(Provider::Sqlite, "INTEGER", false), ScalarType::I64);
        assert_eq!(map_type(Provider::Sqlite, "BIGINT", false), ScalarType::I64);
        assert_eq!(map_type(Provider::Sqlite, "VARCHAR(20)", false), ScalarType::String);
        assert_eq!(map_type(Provider::Sqlite, "", false), ScalarType::Bytes);
        assert_eq!(map_type(Provider::Sqlite, "DOUBLE", false), ScalarType::F64);
        assert_eq!(map_type(Provider::Sqlite, "DATETIME", false), ScalarType::DateTime);
        assert_eq!(map_type(Provider::Sqlite, "NUMERIC(10,2)", false), ScalarType::Decimal);
    }

    #[test]
    fn test_unknown_falls_back_to_string() {
        for provider in Provider::ALL {
            assert_eq!(map_type(provider, "geography", false), ScalarType::String);
        }
    }

    #[test]
    fn test_deterministic() {
        for provider in Provider::ALL {
            for native in ["int", "varchar(10)", "number(3,0)", "bit", "blob", "uuid"] {
                assert_eq!(
                    map_type(provider, native, false),
                    map_type(provider, native, false)
                );
            }
        }
    }

    #[test]
    fn test_property_type_text_form() {
        let ty: PropertyType = "i64?".parse().unwrap();
        assert_eq!(ty, PropertyType::optional(ScalarType::I64));
        assert_eq!(ty.to_string(), "i64?");

        let ty: PropertyType = "DateTime".parse().unwrap();
        assert_eq!(ty, PropertyType::required(ScalarType::DateTime));
        assert_eq!(ty.to_string(), "datetime");

        assert_eq!("byte[]".parse::<ScalarType>().unwrap(), ScalarType::Bytes);
        assert!("money?".parse::<PropertyType>().is_err());
    }

    #[test]
    fn test_property_type_serde() {
        let json = serde_json::to_string(&PropertyType::optional(ScalarType::Guid)).unwrap();
        assert_eq!(json, "\"guid?\"");
        let back: PropertyType = serde_json::from_str("\"u16\"").unwrap();
        assert_eq!(back, PropertyType::required(ScalarType::U16));
    }
}
