//! MySQL column type to Go field type mapping.

use std::fmt;
use thiserror::Error;

/// Go field types emitted by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GoType {
    /// `sql.NullString`
    NullString,
    /// `string`
    String,
    /// `[]byte`
    Bytes,
    /// `sql.NullBool`
    NullBool,
    /// `Bool`, a type the model package is expected to define
    Bool,
    /// `sql.NullFloat64`
    NullFloat64,
    /// `float64`
    Float64,
    /// `sql.NullInt64`
    NullInt64,
    /// `int`
    Int,
    /// `uint`
    Uint,
    /// `int64`
    Int64,
    /// `uint64`
    Uint64,
}

impl GoType {
    /// The type as written in Go source.
    pub fn as_str(&self) -> &'static str {
        match self {
            GoType::NullString => "sql.NullString",
            GoType::String => "string",
            GoType::Bytes => "[]byte",
            GoType::NullBool => "sql.NullBool",
            GoType::Bool => "Bool",
            GoType::NullFloat64 => "sql.NullFloat64",
            GoType::Float64 => "float64",
            GoType::NullInt64 => "sql.NullInt64",
            GoType::Int => "int",
            GoType::Uint => "uint",
            GoType::Int64 => "int64",
            GoType::Uint64 => "uint64",
        }
    }

    /// The package a field of this type has to import.
    pub fn import(&self) -> Option<GoImport> {
        match self {
            GoType::NullString | GoType::NullBool | GoType::NullFloat64 | GoType::NullInt64 => {
                Some(GoImport::DatabaseSql)
            }
            _ => None,
        }
    }
}

impl fmt::Display for GoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Go packages a generated model may import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GoImport {
    /// `"database/sql"`, home of the `sql.Null*` wrappers
    DatabaseSql,
}

impl GoImport {
    /// Import path without quotes.
    pub fn path(&self) -> &'static str {
        match self {
            GoImport::DatabaseSql => "database/sql",
        }
    }
}

/// A column whose `DATA_TYPE` has no Go mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported database column type `{declared_type}`")]
pub struct UnsupportedType {
    pub declared_type: String,
}

/// How a group of declared types resolves to Go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    /// Strings and dates: `string` / `sql.NullString`
    Text,
    /// Raw bytes regardless of nullability
    Bytes,
    Bit,
    Decimal,
    /// Integers up to 32 bits: `int` / `uint` / `sql.NullInt64`
    Int,
    /// `int64` / `uint64` / `sql.NullInt64`
    BigInt,
}

impl Family {
    fn resolve(self, nullable: bool, unsigned: bool) -> GoType {
        match (self, nullable) {
            (Family::Bytes, _) => GoType::Bytes,
            (Family::Text, true) => GoType::NullString,
            (Family::Text, false) => GoType::String,
            (Family::Bit, true) => GoType::NullBool,
            (Family::Bit, false) => GoType::Bool,
            (Family::Decimal, true) => GoType::NullFloat64,
            (Family::Decimal, false) => GoType::Float64,
            (Family::Int | Family::BigInt, true) => GoType::NullInt64,
            (Family::Int, false) if unsigned => GoType::Uint,
            (Family::Int, false) => GoType::Int,
            (Family::BigInt, false) if unsigned => GoType::Uint64,
            (Family::BigInt, false) => GoType::Int64,
        }
    }
}

/// `DATA_TYPE` values the generator understands. Matching is exact.
const TYPE_TABLE: &[(&str, Family)] = &[
    ("varchar", Family::Text),
    ("char", Family::Text),
    ("timestamp", Family::Text),
    ("date", Family::Text),
    ("binary", Family::Bytes),
    ("tinyblob", Family::Bytes),
    ("blob", Family::Bytes),
    ("mediumblob", Family::Bytes),
    ("longblob", Family::Bytes),
    ("bit", Family::Bit),
    ("decimal", Family::Decimal),
    ("tinyint", Family::Int),
    ("smallint", Family::Int),
    ("int", Family::Int),
    ("bigint", Family::BigInt),
];

/// Whether a `COLUMN_TYPE` string describes an unsigned column.
pub fn is_unsigned(raw_column_type: &str) -> bool {
    raw_column_type.contains("unsigned")
}

/// Map a column to its Go field type.
///
/// `declared_type` is the catalog's `DATA_TYPE`, `raw_column_type` its
/// `COLUMN_TYPE` (only consulted for `unsigned`). Nullable columns always get
/// the `sql.Null*` wrapper of their family, except byte columns.
pub fn map_type(
    declared_type: &str,
    is_nullable: bool,
    raw_column_type: &str,
) -> Result<GoType, UnsupportedType> {
    TYPE_TABLE
        .iter()
        .find(|(name, _)| *name == declared_type)
        .map(|(_, family)| family.resolve(is_nullable, is_unsigned(raw_column_type)))
        .ok_or_else(|| UnsupportedType {
            declared_type: declared_type.to_string(),
        })
}
