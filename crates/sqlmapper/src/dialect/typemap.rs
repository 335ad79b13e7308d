//! Per-dialect canonical type converters.
//!
//! Each dialect has a `ToCanonical` (reading its native names) and a
//! `FromCanonical` (writing them). PostgreSQL and SQL Server types are
//! rendered lowercase; MySQL, SQLite and Oracle types uppercase.

use super::canonical::{CanonicalType, CanonicalTypeInfo, FromCanonical, ToCanonical};
use super::DialectKind;
use crate::core::schema::DataType;
use crate::core::traits::TypeMapping;

fn len_or(data_type: &DataType, default: u32) -> u32 {
    data_type.length.unwrap_or(default)
}

fn decimal(data_type: &DataType, default_precision: u8, default_scale: u8) -> CanonicalType {
    let precision = data_type
        .precision
        .map(|p| p.min(u8::MAX as u32) as u8)
        .unwrap_or(default_precision);
    let scale = data_type
        .scale
        .map(|s| s.min(u8::MAX as u32) as u8)
        .unwrap_or(default_scale);
    CanonicalType::Decimal { precision, scale }
}

fn unknown(dialect: &str, data_type: &DataType) -> CanonicalTypeInfo {
    CanonicalTypeInfo::lossy(
        CanonicalType::Unknown(data_type.name.clone()),
        format!("Unknown {} type '{}'.", dialect, data_type.name),
    )
}

fn quoted_values(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("'{}'", v.replace('\'', "''")))
        .collect::<Vec<_>>()
        .join(",")
}

// =============================================================================
// MySQL
// =============================================================================

/// MySQL to canonical type converter.
#[derive(Debug, Clone, Default)]
pub struct MysqlToCanonical;

impl MysqlToCanonical {
    pub fn new() -> Self {
        Self
    }
}

impl ToCanonical for MysqlToCanonical {
    fn dialect(&self) -> DialectKind {
        DialectKind::Mysql
    }

    fn to_canonical(&self, data_type: &DataType) -> CanonicalTypeInfo {
        let unsigned = data_type.unsigned;
        match data_type.name.as_str() {
            // MySQL spells BOOLEAN as TINYINT(1).
            "tinyint" if data_type.length == Some(1) && !unsigned => {
                CanonicalTypeInfo::lossless(CanonicalType::Boolean)
            }
            "bool" | "boolean" => CanonicalTypeInfo::lossless(CanonicalType::Boolean),

            "tinyint" if unsigned => CanonicalTypeInfo::lossless(CanonicalType::UInt8),
            "tinyint" => CanonicalTypeInfo::lossless(CanonicalType::Int8),
            "smallint" if unsigned => CanonicalTypeInfo::lossless(CanonicalType::Int32),
            "smallint" => CanonicalTypeInfo::lossless(CanonicalType::Int16),
            "mediumint" => CanonicalTypeInfo::lossless(CanonicalType::Int32),
            "int" | "integer" if unsigned => CanonicalTypeInfo::lossless(CanonicalType::UInt32),
            "int" | "integer" => CanonicalTypeInfo::lossless(CanonicalType::Int32),
            "bigint" | "serial" if unsigned => CanonicalTypeInfo::lossless(CanonicalType::UInt64),
            "bigint" => CanonicalTypeInfo::lossless(CanonicalType::Int64),
            "serial" => CanonicalTypeInfo::lossless(CanonicalType::UInt64),

            "float" if data_type.precision.is_some_and(|p| p > 24) => {
                CanonicalTypeInfo::lossless(CanonicalType::Float64)
            }
            "float" => CanonicalTypeInfo::lossless(CanonicalType::Float32),
            "double" | "double precision" | "real" => {
                CanonicalTypeInfo::lossless(CanonicalType::Float64)
            }
            "decimal" | "numeric" | "dec" | "fixed" => {
                CanonicalTypeInfo::lossless(decimal(data_type, 10, 0))
            }

            "char" | "nchar" => CanonicalTypeInfo::lossless(CanonicalType::Char(len_or(data_type, 1))),
            "varchar" | "nvarchar" => {
                CanonicalTypeInfo::lossless(CanonicalType::Varchar(len_or(data_type, 0)))
            }
            "tinytext" | "text" | "mediumtext" | "longtext" => {
                CanonicalTypeInfo::lossless(CanonicalType::Text)
            }

            "binary" => CanonicalTypeInfo::lossless(CanonicalType::Binary(len_or(data_type, 1))),
            "varbinary" => {
                CanonicalTypeInfo::lossless(CanonicalType::Varbinary(len_or(data_type, 0)))
            }
            "tinyblob" | "blob" | "mediumblob" | "longblob" => {
                CanonicalTypeInfo::lossless(CanonicalType::Blob)
            }

            "date" => CanonicalTypeInfo::lossless(CanonicalType::Date),
            "time" => CanonicalTypeInfo::lossless(CanonicalType::Time),
            "datetime" | "timestamp" => CanonicalTypeInfo::lossless(CanonicalType::DateTime),
            "year" => CanonicalTypeInfo::lossless(CanonicalType::Year),

            "json" => CanonicalTypeInfo::lossless(CanonicalType::Json),
            "enum" => CanonicalTypeInfo::lossless(CanonicalType::Enum(data_type.values.clone())),
            "set" => CanonicalTypeInfo::lossless(CanonicalType::Set(data_type.values.clone())),
            "bit" => CanonicalTypeInfo::lossless(CanonicalType::Bit(len_or(data_type, 1))),

            "geometry" | "point" | "linestring" | "polygon" | "multipoint" | "multilinestring"
            | "multipolygon" | "geometrycollection" => {
                CanonicalTypeInfo::lossless(CanonicalType::Geometry)
            }

            _ => unknown("MySQL", data_type),
        }
    }
}

/// Canonical to MySQL type converter.
#[derive(Debug, Clone, Default)]
pub struct MysqlFromCanonical;

impl MysqlFromCanonical {
    pub fn new() -> Self {
        Self
    }
}

impl FromCanonical for MysqlFromCanonical {
    fn dialect(&self) -> DialectKind {
        DialectKind::Mysql
    }

    fn from_canonical(&self, canonical: &CanonicalType) -> TypeMapping {
        match canonical {
            CanonicalType::Boolean => TypeMapping::lossless("TINYINT(1)"),

            CanonicalType::Int8 => TypeMapping::lossless("TINYINT"),
            CanonicalType::UInt8 => TypeMapping::lossless("TINYINT UNSIGNED"),
            CanonicalType::Int16 => TypeMapping::lossless("SMALLINT"),
            CanonicalType::Int32 => TypeMapping::lossless("INT"),
            CanonicalType::UInt32 => TypeMapping::lossless("INT UNSIGNED"),
            CanonicalType::Int64 => TypeMapping::lossless("BIGINT"),
            CanonicalType::UInt64 => TypeMapping::lossless("BIGINT UNSIGNED"),

            CanonicalType::Float32 => TypeMapping::lossless("FLOAT"),
            CanonicalType::Float64 => TypeMapping::lossless("DOUBLE"),

            CanonicalType::Decimal { precision, scale } => {
                if *precision > 65 {
                    TypeMapping::lossy(
                        format!("DECIMAL(65,{})", (*scale).min(30)),
                        format!("Precision {} exceeds MySQL max of 65.", precision),
                    )
                } else {
                    TypeMapping::lossless(format!("DECIMAL({},{})", precision, scale))
                }
            }
            CanonicalType::Numeric => TypeMapping::lossy(
                "DECIMAL(65,30)",
                "Unconstrained numeric stored as DECIMAL(65,30).",
            ),
            CanonicalType::Money => TypeMapping::lossless("DECIMAL(19,4)"),

            CanonicalType::Char(len) => {
                if *len <= 255 {
                    TypeMapping::lossless(format!("CHAR({})", len))
                } else {
                    TypeMapping::lossless("LONGTEXT")
                }
            }
            CanonicalType::Varchar(len) => {
                if *len == 0 || *len > 16383 {
                    TypeMapping::lossless("LONGTEXT")
                } else {
                    TypeMapping::lossless(format!("VARCHAR({})", len))
                }
            }
            CanonicalType::Text => TypeMapping::lossless("LONGTEXT"),

            CanonicalType::Binary(len) => {
                if *len <= 255 {
                    TypeMapping::lossless(format!("BINARY({})", len))
                } else {
                    TypeMapping::lossless("LONGBLOB")
                }
            }
            CanonicalType::Varbinary(len) => {
                if *len == 0 || *len > 65535 {
                    TypeMapping::lossless("LONGBLOB")
                } else {
                    TypeMapping::lossless(format!("VARBINARY({})", len))
                }
            }
            CanonicalType::Blob => TypeMapping::lossless("LONGBLOB"),

            CanonicalType::Date => TypeMapping::lossless("DATE"),
            CanonicalType::Time => TypeMapping::lossless("TIME"),
            CanonicalType::DateTime => TypeMapping::lossless("DATETIME"),
            CanonicalType::DateTimeTz => TypeMapping::lossy(
                "TIMESTAMP",
                "Timezone offset not preserved; MySQL TIMESTAMP stores UTC.",
            ),
            CanonicalType::Interval => {
                TypeMapping::lossy("VARCHAR(64)", "Interval stored as string.")
            }
            CanonicalType::Year => TypeMapping::lossless("YEAR"),

            CanonicalType::Uuid => TypeMapping::lossless("CHAR(36)"),
            CanonicalType::Json => TypeMapping::lossless("JSON"),
            CanonicalType::JsonBinary => TypeMapping::lossless("JSON"),
            CanonicalType::Xml => TypeMapping::lossy("LONGTEXT", "XML stored as text."),

            CanonicalType::Bit(len) => TypeMapping::lossless(format!("BIT({})", len)),
            CanonicalType::InetAddr => TypeMapping::lossless("VARCHAR(45)"),
            CanonicalType::Geometry => TypeMapping::lossless("GEOMETRY"),

            CanonicalType::Array(_) => {
                TypeMapping::lossy("JSON", "Array stored as JSON.")
            }
            CanonicalType::Enum(values) => {
                TypeMapping::lossless(format!("ENUM({})", quoted_values(values)))
            }
            CanonicalType::Set(values) => {
                TypeMapping::lossless(format!("SET({})", quoted_values(values)))
            }

            CanonicalType::Unknown(name) => {
                TypeMapping::lossy("LONGTEXT", format!("Unknown type '{}' stored as text.", name))
            }
        }
    }
}

// =============================================================================
// PostgreSQL
// =============================================================================

/// PostgreSQL to canonical type converter.
#[derive(Debug, Clone, Default)]
pub struct PostgresToCanonical;

impl PostgresToCanonical {
    pub fn new() -> Self {
        Self
    }
}

impl ToCanonical for PostgresToCanonical {
    fn dialect(&self) -> DialectKind {
        DialectKind::Postgres
    }

    fn to_canonical(&self, data_type: &DataType) -> CanonicalTypeInfo {
        let name = data_type.name.as_str();

        if let Some(base) = name.strip_suffix("[]") {
            let inner = self.to_canonical(&DataType {
                name: base.trim().to_string(),
                ..data_type.clone()
            });
            return CanonicalTypeInfo {
                canonical_type: CanonicalType::Array(Box::new(inner.canonical_type)),
                is_lossy: inner.is_lossy,
                warning: inner.warning,
            };
        }

        match name {
            "bool" | "boolean" => CanonicalTypeInfo::lossless(CanonicalType::Boolean),

            "int2" | "smallint" | "smallserial" | "serial2" => {
                CanonicalTypeInfo::lossless(CanonicalType::Int16)
            }
            "int4" | "integer" | "int" | "serial" | "serial4" => {
                CanonicalTypeInfo::lossless(CanonicalType::Int32)
            }
            "int8" | "bigint" | "bigserial" | "serial8" | "oid" => {
                CanonicalTypeInfo::lossless(CanonicalType::Int64)
            }

            "float4" | "real" => CanonicalTypeInfo::lossless(CanonicalType::Float32),
            "float8" | "double precision" | "float" => {
                CanonicalTypeInfo::lossless(CanonicalType::Float64)
            }

            "numeric" | "decimal" if data_type.precision.is_some() => {
                CanonicalTypeInfo::lossless(decimal(data_type, 38, 0))
            }
            "numeric" | "decimal" => CanonicalTypeInfo::lossless(CanonicalType::Numeric),
            "money" => CanonicalTypeInfo::lossless(CanonicalType::Money),

            "char" | "character" | "bpchar" => {
                CanonicalTypeInfo::lossless(CanonicalType::Char(len_or(data_type, 1)))
            }
            "varchar" | "character varying" => {
                CanonicalTypeInfo::lossless(CanonicalType::Varchar(len_or(data_type, 0)))
            }
            "text" | "citext" => CanonicalTypeInfo::lossless(CanonicalType::Text),
            "name" => CanonicalTypeInfo::lossless(CanonicalType::Varchar(63)),

            "bytea" => CanonicalTypeInfo::lossless(CanonicalType::Blob),

            "date" => CanonicalTypeInfo::lossless(CanonicalType::Date),
            "time" | "time without time zone" => CanonicalTypeInfo::lossless(CanonicalType::Time),
            "timetz" | "time with time zone" => CanonicalTypeInfo::lossy(
                CanonicalType::Time,
                "Time with timezone loses timezone info in some targets.",
            ),
            "timestamp" | "timestamp without time zone" => {
                CanonicalTypeInfo::lossless(CanonicalType::DateTime)
            }
            "timestamptz" | "timestamp with time zone" => {
                CanonicalTypeInfo::lossless(CanonicalType::DateTimeTz)
            }
            "interval" => CanonicalTypeInfo::lossless(CanonicalType::Interval),

            "uuid" => CanonicalTypeInfo::lossless(CanonicalType::Uuid),
            "json" => CanonicalTypeInfo::lossless(CanonicalType::Json),
            "jsonb" => CanonicalTypeInfo::lossy(
                CanonicalType::JsonBinary,
                "JSONB binary features may be unavailable in target.",
            ),
            "xml" => CanonicalTypeInfo::lossless(CanonicalType::Xml),

            "bit" => CanonicalTypeInfo::lossless(CanonicalType::Bit(len_or(data_type, 1))),
            "varbit" | "bit varying" => CanonicalTypeInfo::lossy(
                CanonicalType::Bit(len_or(data_type, 64)),
                "Variable bit string stored as fixed width.",
            ),

            "inet" | "cidr" => CanonicalTypeInfo::lossless(CanonicalType::InetAddr),
            "macaddr" | "macaddr8" => CanonicalTypeInfo::lossless(CanonicalType::Varchar(17)),
            "geometry" | "geography" | "point" | "line" | "lseg" | "box" | "path" | "polygon"
            | "circle" => CanonicalTypeInfo::lossless(CanonicalType::Geometry),

            _ => unknown("PostgreSQL", data_type),
        }
    }
}

/// Canonical to PostgreSQL type converter.
#[derive(Debug, Clone, Default)]
pub struct PostgresFromCanonical;

impl PostgresFromCanonical {
    pub fn new() -> Self {
        Self
    }
}

impl FromCanonical for PostgresFromCanonical {
    fn dialect(&self) -> DialectKind {
        DialectKind::Postgres
    }

    fn from_canonical(&self, canonical: &CanonicalType) -> TypeMapping {
        match canonical {
            CanonicalType::Boolean => TypeMapping::lossless("boolean"),

            // PG has no unsigned types; widen.
            CanonicalType::Int8 | CanonicalType::UInt8 | CanonicalType::Int16 => {
                TypeMapping::lossless("smallint")
            }
            CanonicalType::Int32 => TypeMapping::lossless("integer"),
            CanonicalType::UInt32 | CanonicalType::Int64 => TypeMapping::lossless("bigint"),
            CanonicalType::UInt64 => TypeMapping::lossless("numeric(20,0)"),

            CanonicalType::Float32 => TypeMapping::lossless("real"),
            CanonicalType::Float64 => TypeMapping::lossless("double precision"),

            CanonicalType::Decimal { precision, scale } => {
                TypeMapping::lossless(format!("numeric({},{})", precision, scale))
            }
            CanonicalType::Numeric => TypeMapping::lossless("numeric"),
            CanonicalType::Money => TypeMapping::lossless("numeric(19,4)"),

            CanonicalType::Char(len) => {
                if *len <= 10485760 {
                    TypeMapping::lossless(format!("char({})", len))
                } else {
                    TypeMapping::lossless("text")
                }
            }
            CanonicalType::Varchar(len) => {
                if *len == 0 || *len > 10485760 {
                    TypeMapping::lossless("text")
                } else {
                    TypeMapping::lossless(format!("varchar({})", len))
                }
            }
            CanonicalType::Text => TypeMapping::lossless("text"),

            CanonicalType::Binary(_) | CanonicalType::Varbinary(_) | CanonicalType::Blob => {
                TypeMapping::lossless("bytea")
            }

            CanonicalType::Date => TypeMapping::lossless("date"),
            CanonicalType::Time => TypeMapping::lossless("time"),
            CanonicalType::DateTime => TypeMapping::lossless("timestamp"),
            CanonicalType::DateTimeTz => TypeMapping::lossless("timestamptz"),
            CanonicalType::Interval => TypeMapping::lossless("interval"),
            CanonicalType::Year => TypeMapping::lossless("smallint"),

            CanonicalType::Uuid => TypeMapping::lossless("uuid"),
            CanonicalType::Json => TypeMapping::lossless("json"),
            CanonicalType::JsonBinary => TypeMapping::lossless("jsonb"),
            CanonicalType::Xml => TypeMapping::lossless("xml"),

            CanonicalType::Bit(len) => {
                if *len == 1 {
                    TypeMapping::lossless("boolean")
                } else {
                    TypeMapping::lossless(format!("bit({})", len))
                }
            }
            CanonicalType::InetAddr => TypeMapping::lossless("inet"),
            CanonicalType::Geometry => TypeMapping::lossy(
                "text",
                "Spatial type stored as text. Consider PostGIS for spatial operations.",
            ),

            CanonicalType::Array(inner) => {
                let inner_mapping = self.from_canonical(inner);
                TypeMapping {
                    target_type: format!("{}[]", inner_mapping.target_type),
                    is_lossy: inner_mapping.is_lossy,
                    warning: inner_mapping.warning,
                }
            }

            CanonicalType::Enum(_) => TypeMapping::lossy(
                "text",
                "ENUM stored as text. Consider PostgreSQL ENUM or CHECK constraint.",
            ),
            CanonicalType::Set(_) => TypeMapping::lossy(
                "text",
                "SET stored as text. Consider array type or separate table.",
            ),

            CanonicalType::Unknown(name) => {
                TypeMapping::lossy("text", format!("Unknown type '{}' stored as text.", name))
            }
        }
    }
}

// =============================================================================
// SQLite
// =============================================================================

/// SQLite to canonical type converter.
///
/// Known names map directly; anything else follows SQLite's column affinity
/// rules (INT, CHAR/CLOB/TEXT, BLOB, REAL/FLOA/DOUB, else NUMERIC).
#[derive(Debug, Clone, Default)]
pub struct SqliteToCanonical;

impl SqliteToCanonical {
    pub fn new() -> Self {
        Self
    }
}

impl ToCanonical for SqliteToCanonical {
    fn dialect(&self) -> DialectKind {
        DialectKind::Sqlite
    }

    fn to_canonical(&self, data_type: &DataType) -> CanonicalTypeInfo {
        let name = data_type.name.as_str();
        match name {
            "bool" | "boolean" => CanonicalTypeInfo::lossless(CanonicalType::Boolean),
            "tinyint" if data_type.length == Some(1) => {
                CanonicalTypeInfo::lossless(CanonicalType::Boolean)
            }
            "tinyint" => CanonicalTypeInfo::lossless(CanonicalType::Int8),
            "smallint" | "int2" => CanonicalTypeInfo::lossless(CanonicalType::Int16),
            "mediumint" => CanonicalTypeInfo::lossless(CanonicalType::Int32),
            // INTEGER storage is always 64-bit.
            "integer" | "int" | "bigint" | "int8" | "unsigned big int" => {
                CanonicalTypeInfo::lossless(CanonicalType::Int64)
            }
            "real" | "double" | "double precision" | "float" => {
                CanonicalTypeInfo::lossless(CanonicalType::Float64)
            }
            "numeric" | "decimal" if data_type.precision.is_some() => {
                CanonicalTypeInfo::lossless(decimal(data_type, 38, 0))
            }
            "numeric" | "decimal" => CanonicalTypeInfo::lossless(CanonicalType::Numeric),
            "char" | "character" | "nchar" | "native character" => {
                CanonicalTypeInfo::lossless(CanonicalType::Char(len_or(data_type, 1)))
            }
            "varchar" | "nvarchar" | "character varying" | "varying character" => {
                CanonicalTypeInfo::lossless(CanonicalType::Varchar(len_or(data_type, 0)))
            }
            "text" | "clob" => CanonicalTypeInfo::lossless(CanonicalType::Text),
            "blob" => CanonicalTypeInfo::lossless(CanonicalType::Blob),
            "date" => CanonicalTypeInfo::lossless(CanonicalType::Date),
            "time" => CanonicalTypeInfo::lossless(CanonicalType::Time),
            "datetime" | "timestamp" => CanonicalTypeInfo::lossless(CanonicalType::DateTime),
            "uuid" => CanonicalTypeInfo::lossless(CanonicalType::Uuid),
            "json" => CanonicalTypeInfo::lossless(CanonicalType::Json),
            _ => {
                let upper = name.to_uppercase();
                if upper.contains("INT") {
                    CanonicalTypeInfo::lossless(CanonicalType::Int64)
                } else if upper.contains("CHAR") || upper.contains("CLOB") || upper.contains("TEXT")
                {
                    CanonicalTypeInfo::lossless(CanonicalType::Text)
                } else if upper.contains("BLOB") {
                    CanonicalTypeInfo::lossless(CanonicalType::Blob)
                } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB")
                {
                    CanonicalTypeInfo::lossless(CanonicalType::Float64)
                } else {
                    CanonicalTypeInfo::lossy(
                        CanonicalType::Numeric,
                        format!("SQLite type '{}' has NUMERIC affinity.", name),
                    )
                }
            }
        }
    }
}

/// Canonical to SQLite type converter.
#[derive(Debug, Clone, Default)]
pub struct SqliteFromCanonical;

impl SqliteFromCanonical {
    pub fn new() -> Self {
        Self
    }
}

impl FromCanonical for SqliteFromCanonical {
    fn dialect(&self) -> DialectKind {
        DialectKind::Sqlite
    }

    fn from_canonical(&self, canonical: &CanonicalType) -> TypeMapping {
        match canonical {
            CanonicalType::Boolean => TypeMapping::lossless("BOOLEAN"),

            CanonicalType::Int8
            | CanonicalType::UInt8
            | CanonicalType::Int16
            | CanonicalType::Int32
            | CanonicalType::UInt32
            | CanonicalType::Int64
            | CanonicalType::Year => TypeMapping::lossless("INTEGER"),
            CanonicalType::UInt64 => TypeMapping::lossy(
                "NUMERIC",
                "Unsigned 64-bit values above 2^63-1 are stored as REAL.",
            ),

            CanonicalType::Float32 | CanonicalType::Float64 => TypeMapping::lossless("REAL"),

            CanonicalType::Decimal { precision, scale } => {
                TypeMapping::lossless(format!("NUMERIC({},{})", precision, scale))
            }
            CanonicalType::Numeric => TypeMapping::lossless("NUMERIC"),
            CanonicalType::Money => TypeMapping::lossless("NUMERIC(19,4)"),

            CanonicalType::Char(len) => TypeMapping::lossless(format!("CHAR({})", len)),
            CanonicalType::Varchar(0) | CanonicalType::Text => TypeMapping::lossless("TEXT"),
            CanonicalType::Varchar(len) => TypeMapping::lossless(format!("VARCHAR({})", len)),

            CanonicalType::Binary(_) | CanonicalType::Varbinary(_) | CanonicalType::Blob => {
                TypeMapping::lossless("BLOB")
            }

            CanonicalType::Date => TypeMapping::lossless("DATE"),
            CanonicalType::Time => TypeMapping::lossless("TIME"),
            CanonicalType::DateTime => TypeMapping::lossless("DATETIME"),
            CanonicalType::DateTimeTz => TypeMapping::lossy(
                "DATETIME",
                "SQLite has no timezone-aware type; offset not preserved.",
            ),
            CanonicalType::Interval => TypeMapping::lossy("TEXT", "Interval stored as text."),

            CanonicalType::Uuid
            | CanonicalType::Json
            | CanonicalType::JsonBinary
            | CanonicalType::Xml
            | CanonicalType::InetAddr => TypeMapping::lossless("TEXT"),

            CanonicalType::Bit(_) => TypeMapping::lossless("INTEGER"),
            CanonicalType::Geometry => TypeMapping::lossy("BLOB", "Spatial type stored as BLOB."),

            CanonicalType::Array(_) => TypeMapping::lossy("TEXT", "Array stored as JSON text."),
            CanonicalType::Enum(_) => TypeMapping::lossy(
                "TEXT",
                "ENUM stored as text. Consider a CHECK constraint.",
            ),
            CanonicalType::Set(_) => TypeMapping::lossy("TEXT", "SET stored as text."),

            CanonicalType::Unknown(name) => {
                TypeMapping::lossy("TEXT", format!("Unknown type '{}' stored as text.", name))
            }
        }
    }
}

// =============================================================================
// Oracle
// =============================================================================

/// Oracle to canonical type converter.
#[derive(Debug, Clone, Default)]
pub struct OracleToCanonical;

impl OracleToCanonical {
    pub fn new() -> Self {
        Self
    }
}

impl ToCanonical for OracleToCanonical {
    fn dialect(&self) -> DialectKind {
        DialectKind::Oracle
    }

    fn to_canonical(&self, data_type: &DataType) -> CanonicalTypeInfo {
        match data_type.name.as_str() {
            "number" => {
                let scale = data_type.scale.unwrap_or(0);
                match data_type.precision {
                    None => CanonicalTypeInfo::lossless(CanonicalType::Numeric),
                    Some(_) if scale > 0 => CanonicalTypeInfo::lossless(decimal(data_type, 38, 0)),
                    // NUMBER(1) is the conventional boolean.
                    Some(1) => CanonicalTypeInfo::lossless(CanonicalType::Boolean),
                    Some(p) if p <= 4 => CanonicalTypeInfo::lossless(CanonicalType::Int16),
                    Some(p) if p <= 9 => CanonicalTypeInfo::lossless(CanonicalType::Int32),
                    Some(p) if p <= 18 => CanonicalTypeInfo::lossless(CanonicalType::Int64),
                    Some(_) => CanonicalTypeInfo::lossless(decimal(data_type, 38, 0)),
                }
            }
            "integer" | "int" => CanonicalTypeInfo::lossless(CanonicalType::Int32),
            "smallint" => CanonicalTypeInfo::lossless(CanonicalType::Int16),
            "decimal" | "numeric" | "dec" => {
                CanonicalTypeInfo::lossless(decimal(data_type, 38, 0))
            }
            "binary_float" => CanonicalTypeInfo::lossless(CanonicalType::Float32),
            "binary_double" | "float" | "double precision" | "real" => {
                CanonicalTypeInfo::lossless(CanonicalType::Float64)
            }
            "boolean" => CanonicalTypeInfo::lossless(CanonicalType::Boolean),

            "char" | "nchar" | "character" => {
                CanonicalTypeInfo::lossless(CanonicalType::Char(len_or(data_type, 1)))
            }
            "varchar2" | "nvarchar2" | "varchar" => {
                CanonicalTypeInfo::lossless(CanonicalType::Varchar(len_or(data_type, 4000)))
            }
            "clob" | "nclob" | "long" => CanonicalTypeInfo::lossless(CanonicalType::Text),

            "raw" => CanonicalTypeInfo::lossless(CanonicalType::Varbinary(len_or(data_type, 2000))),
            "blob" | "long raw" | "bfile" => CanonicalTypeInfo::lossless(CanonicalType::Blob),

            // Oracle DATE carries a time of day.
            "date" | "timestamp" => CanonicalTypeInfo::lossless(CanonicalType::DateTime),
            "timestamp with time zone" | "timestamp with local time zone" => {
                CanonicalTypeInfo::lossless(CanonicalType::DateTimeTz)
            }
            "interval year to month" | "interval day to second" => {
                CanonicalTypeInfo::lossless(CanonicalType::Interval)
            }

            "xmltype" => CanonicalTypeInfo::lossless(CanonicalType::Xml),
            "json" => CanonicalTypeInfo::lossless(CanonicalType::Json),
            "rowid" | "urowid" => CanonicalTypeInfo::lossless(CanonicalType::Varchar(18)),
            "sdo_geometry" => CanonicalTypeInfo::lossless(CanonicalType::Geometry),

            _ => unknown("Oracle", data_type),
        }
    }
}

/// Canonical to Oracle type converter.
#[derive(Debug, Clone, Default)]
pub struct OracleFromCanonical;

impl OracleFromCanonical {
    pub fn new() -> Self {
        Self
    }
}

impl FromCanonical for OracleFromCanonical {
    fn dialect(&self) -> DialectKind {
        DialectKind::Oracle
    }

    fn from_canonical(&self, canonical: &CanonicalType) -> TypeMapping {
        match canonical {
            CanonicalType::Boolean => TypeMapping::lossless("NUMBER(1)"),

            CanonicalType::Int8 | CanonicalType::UInt8 | CanonicalType::Int16 => {
                TypeMapping::lossless("NUMBER(5)")
            }
            CanonicalType::Int32 | CanonicalType::UInt32 => TypeMapping::lossless("NUMBER(10)"),
            CanonicalType::Int64 => TypeMapping::lossless("NUMBER(19)"),
            CanonicalType::UInt64 => TypeMapping::lossless("NUMBER(20)"),

            CanonicalType::Float32 => TypeMapping::lossless("BINARY_FLOAT"),
            CanonicalType::Float64 => TypeMapping::lossless("BINARY_DOUBLE"),

            CanonicalType::Decimal { precision, scale } => {
                if *precision > 38 {
                    TypeMapping::lossy(
                        format!("NUMBER(38,{})", (*scale).min(38)),
                        format!("Precision {} exceeds Oracle max of 38.", precision),
                    )
                } else {
                    TypeMapping::lossless(format!("NUMBER({},{})", precision, scale))
                }
            }
            CanonicalType::Numeric => TypeMapping::lossless("NUMBER"),
            CanonicalType::Money => TypeMapping::lossless("NUMBER(19,4)"),

            CanonicalType::Char(len) => {
                if *len <= 2000 {
                    TypeMapping::lossless(format!("CHAR({})", len))
                } else {
                    TypeMapping::lossless("CLOB")
                }
            }
            CanonicalType::Varchar(len) => {
                if *len == 0 || *len > 4000 {
                    TypeMapping::lossless("CLOB")
                } else {
                    TypeMapping::lossless(format!("VARCHAR2({})", len))
                }
            }
            CanonicalType::Text => TypeMapping::lossless("CLOB"),

            CanonicalType::Binary(len) | CanonicalType::Varbinary(len) => {
                if *len == 0 || *len > 2000 {
                    TypeMapping::lossless("BLOB")
                } else {
                    TypeMapping::lossless(format!("RAW({})", len))
                }
            }
            CanonicalType::Blob => TypeMapping::lossless("BLOB"),

            CanonicalType::Date => TypeMapping::lossless("DATE"),
            CanonicalType::Time => TypeMapping::lossy(
                "TIMESTAMP",
                "Oracle has no TIME type; stored as TIMESTAMP.",
            ),
            CanonicalType::DateTime => TypeMapping::lossless("TIMESTAMP"),
            CanonicalType::DateTimeTz => TypeMapping::lossless("TIMESTAMP WITH TIME ZONE"),
            CanonicalType::Interval => TypeMapping::lossless("INTERVAL DAY TO SECOND"),
            CanonicalType::Year => TypeMapping::lossless("NUMBER(4)"),

            CanonicalType::Uuid => TypeMapping::lossless("CHAR(36)"),
            CanonicalType::Json | CanonicalType::JsonBinary => TypeMapping::lossless("CLOB"),
            CanonicalType::Xml => TypeMapping::lossless("XMLTYPE"),

            CanonicalType::Bit(1) => TypeMapping::lossless("NUMBER(1)"),
            CanonicalType::Bit(len) => TypeMapping::lossy(
                format!("RAW({})", len.div_ceil(8)),
                "Bit string stored as RAW.",
            ),
            CanonicalType::InetAddr => TypeMapping::lossless("VARCHAR2(45)"),
            CanonicalType::Geometry => TypeMapping::lossless("SDO_GEOMETRY"),

            CanonicalType::Array(_) => TypeMapping::lossy("CLOB", "Array stored as JSON text."),
            CanonicalType::Enum(values) => {
                let width = values.iter().map(|v| v.chars().count()).max().unwrap_or(1);
                TypeMapping::lossy(
                    format!("VARCHAR2({})", width.max(1)),
                    "ENUM stored as VARCHAR2. Consider a CHECK constraint.",
                )
            }
            CanonicalType::Set(_) => {
                TypeMapping::lossy("VARCHAR2(4000)", "SET stored as comma-separated text.")
            }

            CanonicalType::Unknown(name) => {
                TypeMapping::lossy("CLOB", format!("Unknown type '{}' stored as CLOB.", name))
            }
        }
    }
}

// =============================================================================
// SQL Server
// =============================================================================

/// SQL Server to canonical type converter.
#[derive(Debug, Clone, Default)]
pub struct MssqlToCanonical;

impl MssqlToCanonical {
    pub fn new() -> Self {
        Self
    }
}

impl ToCanonical for MssqlToCanonical {
    fn dialect(&self) -> DialectKind {
        DialectKind::Sqlserver
    }

    fn to_canonical(&self, data_type: &DataType) -> CanonicalTypeInfo {
        let max = data_type.is_max;
        match data_type.name.as_str() {
            "bit" => CanonicalTypeInfo::lossless(CanonicalType::Boolean),

            "tinyint" => CanonicalTypeInfo::lossless(CanonicalType::UInt8),
            "smallint" => CanonicalTypeInfo::lossless(CanonicalType::Int16),
            "int" | "integer" => CanonicalTypeInfo::lossless(CanonicalType::Int32),
            "bigint" => CanonicalTypeInfo::lossless(CanonicalType::Int64),

            "real" => CanonicalTypeInfo::lossless(CanonicalType::Float32),
            "float" if data_type.precision.is_some_and(|p| p <= 24) => {
                CanonicalTypeInfo::lossless(CanonicalType::Float32)
            }
            "float" | "double precision" => CanonicalTypeInfo::lossless(CanonicalType::Float64),

            "decimal" | "numeric" | "dec" => {
                CanonicalTypeInfo::lossless(decimal(data_type, 18, 0))
            }
            "money" => CanonicalTypeInfo::lossless(CanonicalType::Money),
            "smallmoney" => CanonicalTypeInfo::lossless(CanonicalType::Decimal {
                precision: 10,
                scale: 4,
            }),

            "char" | "nchar" => CanonicalTypeInfo::lossless(CanonicalType::Char(len_or(data_type, 1))),
            "varchar" | "nvarchar" if max => CanonicalTypeInfo::lossless(CanonicalType::Text),
            "varchar" | "nvarchar" => {
                CanonicalTypeInfo::lossless(CanonicalType::Varchar(len_or(data_type, 1)))
            }
            "text" | "ntext" => CanonicalTypeInfo::lossless(CanonicalType::Text),

            "binary" => CanonicalTypeInfo::lossless(CanonicalType::Binary(len_or(data_type, 1))),
            "varbinary" if max => CanonicalTypeInfo::lossless(CanonicalType::Blob),
            "varbinary" => {
                CanonicalTypeInfo::lossless(CanonicalType::Varbinary(len_or(data_type, 1)))
            }
            "image" => CanonicalTypeInfo::lossless(CanonicalType::Blob),

            "date" => CanonicalTypeInfo::lossless(CanonicalType::Date),
            "time" => CanonicalTypeInfo::lossless(CanonicalType::Time),
            "datetime" | "datetime2" | "smalldatetime" => {
                CanonicalTypeInfo::lossless(CanonicalType::DateTime)
            }
            "datetimeoffset" => CanonicalTypeInfo::lossless(CanonicalType::DateTimeTz),
            // TIMESTAMP is a synonym for ROWVERSION.
            "timestamp" | "rowversion" => CanonicalTypeInfo::lossy(
                CanonicalType::Binary(8),
                "ROWVERSION stored as binary(8); values are not generated.",
            ),

            "uniqueidentifier" => CanonicalTypeInfo::lossless(CanonicalType::Uuid),
            "xml" => CanonicalTypeInfo::lossless(CanonicalType::Xml),
            "geometry" | "geography" => CanonicalTypeInfo::lossless(CanonicalType::Geometry),
            "sql_variant" => CanonicalTypeInfo::lossy(
                CanonicalType::Text,
                "SQL_VARIANT stored as text.",
            ),

            _ => unknown("SQL Server", data_type),
        }
    }
}

/// Canonical to SQL Server type converter.
#[derive(Debug, Clone, Default)]
pub struct MssqlFromCanonical;

impl MssqlFromCanonical {
    pub fn new() -> Self {
        Self
    }
}

impl FromCanonical for MssqlFromCanonical {
    fn dialect(&self) -> DialectKind {
        DialectKind::Sqlserver
    }

    fn from_canonical(&self, canonical: &CanonicalType) -> TypeMapping {
        match canonical {
            CanonicalType::Boolean => TypeMapping::lossless("bit"),

            CanonicalType::Int8 | CanonicalType::Int16 => TypeMapping::lossless("smallint"),
            CanonicalType::UInt8 => TypeMapping::lossless("tinyint"),
            CanonicalType::Int32 => TypeMapping::lossless("int"),
            CanonicalType::UInt32 | CanonicalType::Int64 => TypeMapping::lossless("bigint"),
            CanonicalType::UInt64 => TypeMapping::lossless("decimal(20,0)"),

            CanonicalType::Float32 => TypeMapping::lossless("real"),
            CanonicalType::Float64 => TypeMapping::lossless("float"),

            CanonicalType::Decimal { precision, scale } => {
                let p = (*precision).min(38);
                let s = (*scale).min(p);
                if *precision > 38 {
                    TypeMapping::lossy(
                        format!("decimal({},{})", p, s),
                        format!("Precision {} exceeds MSSQL max of 38.", precision),
                    )
                } else {
                    TypeMapping::lossless(format!("decimal({},{})", p, s))
                }
            }
            CanonicalType::Numeric => TypeMapping::lossy(
                "decimal(38,10)",
                "Unconstrained numeric stored as decimal(38,10).",
            ),
            CanonicalType::Money => TypeMapping::lossless("money"),

            CanonicalType::Char(len) => {
                if *len <= 4000 {
                    TypeMapping::lossless(format!("nchar({})", len))
                } else {
                    TypeMapping::lossless("nvarchar(max)")
                }
            }
            CanonicalType::Varchar(len) => {
                if *len == 0 || *len > 4000 {
                    TypeMapping::lossless("nvarchar(max)")
                } else {
                    TypeMapping::lossless(format!("nvarchar({})", len))
                }
            }
            CanonicalType::Text => TypeMapping::lossless("nvarchar(max)"),

            CanonicalType::Binary(len) => {
                if *len <= 8000 {
                    TypeMapping::lossless(format!("binary({})", len))
                } else {
                    TypeMapping::lossless("varbinary(max)")
                }
            }
            CanonicalType::Varbinary(len) => {
                if *len == 0 || *len > 8000 {
                    TypeMapping::lossless("varbinary(max)")
                } else {
                    TypeMapping::lossless(format!("varbinary({})", len))
                }
            }
            CanonicalType::Blob => TypeMapping::lossless("varbinary(max)"),

            CanonicalType::Date => TypeMapping::lossless("date"),
            CanonicalType::Time => TypeMapping::lossless("time"),
            CanonicalType::DateTime => TypeMapping::lossless("datetime2"),
            CanonicalType::DateTimeTz => TypeMapping::lossless("datetimeoffset"),
            CanonicalType::Interval => TypeMapping::lossy(
                "nvarchar(100)",
                "Interval stored as string. Interval arithmetic unavailable.",
            ),
            CanonicalType::Year => TypeMapping::lossless("smallint"),

            CanonicalType::Uuid => TypeMapping::lossless("uniqueidentifier"),
            CanonicalType::Json => TypeMapping::lossless("nvarchar(max)"),
            CanonicalType::JsonBinary => {
                TypeMapping::lossy("nvarchar(max)", "JSONB stored as text JSON.")
            }
            CanonicalType::Xml => TypeMapping::lossless("xml"),

            CanonicalType::Bit(1) => TypeMapping::lossless("bit"),
            CanonicalType::Bit(len) => TypeMapping::lossy(
                format!("varbinary({})", len.div_ceil(8)),
                "Bit string stored as varbinary.",
            ),
            CanonicalType::InetAddr => TypeMapping::lossless("nvarchar(45)"),
            CanonicalType::Geometry => TypeMapping::lossless("geometry"),

            CanonicalType::Array(_) => {
                TypeMapping::lossy("nvarchar(max)", "Array stored as JSON text.")
            }
            CanonicalType::Enum(_) => TypeMapping::lossy(
                "nvarchar(255)",
                "ENUM stored as nvarchar. Consider a CHECK constraint.",
            ),
            CanonicalType::Set(_) => TypeMapping::lossy("nvarchar(max)", "SET stored as text."),

            CanonicalType::Unknown(name) => TypeMapping::lossy(
                "nvarchar(max)",
                format!("Unknown type '{}' stored as nvarchar(max).", name),
            ),
        }
    }
}
