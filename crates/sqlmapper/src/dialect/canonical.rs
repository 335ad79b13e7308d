//! Hub-and-spoke canonical type system for type name mapping.
//!
//! Each dialect converts its native types into a [`CanonicalType`] and back,
//! so n dialects need 2n converters instead of n*(n-1) direct mappers:
//! - `ToCanonical`: native type → canonical type
//! - `FromCanonical`: canonical type → native type
//!
//! ```text
//!   Source     →  CanonicalType  →  Target
//!   MySQL          Boolean          PostgreSQL
//!   tinyint(1)                      boolean
//! ```

use std::sync::Arc;

use crate::core::schema::{Column, DataType};
use crate::core::traits::{ColumnMapping, TypeMapper, TypeMapping};
use crate::dialect::DialectKind;

/// Canonical type representation for cross-dialect type mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanonicalType {
    // ===== Boolean =====
    Boolean,

    // ===== Integer Types =====
    /// 8-bit signed integer (MySQL TINYINT).
    Int8,
    /// 8-bit unsigned integer (SQL Server TINYINT, MySQL TINYINT UNSIGNED).
    UInt8,
    Int16,
    Int32,
    /// 32-bit unsigned integer (MySQL INT UNSIGNED).
    UInt32,
    Int64,
    /// 64-bit unsigned integer (MySQL BIGINT UNSIGNED).
    UInt64,

    // ===== Floating Point =====
    Float32,
    Float64,

    // ===== Decimal/Numeric =====
    /// Exact decimal with precision and scale.
    Decimal {
        /// Total number of digits.
        precision: u8,
        /// Digits after the decimal point.
        scale: u8,
    },
    /// Exact numeric without declared precision (Oracle NUMBER, PostgreSQL NUMERIC).
    Numeric,
    /// Money type with fixed precision (19,4).
    Money,

    // ===== String Types =====
    /// Fixed-length character string.
    Char(u32),
    /// Variable-length character string. 0 means unlimited/max.
    Varchar(u32),
    /// Unlimited text.
    Text,

    // ===== Binary Types =====
    Binary(u32),
    /// Variable-length binary data. 0 means unlimited/max.
    Varbinary(u32),
    Blob,

    // ===== Date/Time Types =====
    Date,
    Time,
    DateTime,
    DateTimeTz,
    Interval,
    /// Year (MySQL specific, stored as small integer).
    Year,

    // ===== Special Types =====
    Uuid,
    Json,
    /// Binary JSON (PostgreSQL JSONB).
    JsonBinary,
    Xml,

    // ===== Bit Strings =====
    Bit(u32),

    // ===== Network / Spatial =====
    InetAddr,
    Geometry,

    // ===== Array Types =====
    Array(Box<CanonicalType>),

    // ===== MySQL-Specific =====
    Enum(Vec<String>),
    Set(Vec<String>),

    // ===== Fallback =====
    /// Type that could not be mapped; holds the original name.
    Unknown(String),
}

impl std::fmt::Display for CanonicalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CanonicalType::Decimal { precision, scale } => {
                write!(f, "Decimal({},{})", precision, scale)
            }
            CanonicalType::Char(n) => write!(f, "Char({})", n),
            CanonicalType::Varchar(n) => write!(f, "Varchar({})", n),
            CanonicalType::Binary(n) => write!(f, "Binary({})", n),
            CanonicalType::Varbinary(n) => write!(f, "Varbinary({})", n),
            CanonicalType::Bit(n) => write!(f, "Bit({})", n),
            CanonicalType::Array(inner) => write!(f, "Array({})", inner),
            CanonicalType::Enum(values) => write!(f, "Enum({})", values.join(",")),
            CanonicalType::Set(values) => write!(f, "Set({})", values.join(",")),
            CanonicalType::Unknown(name) => write!(f, "Unknown({})", name),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Result of converting a native type to canonical form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalTypeInfo {
    /// The canonical type.
    pub canonical_type: CanonicalType,
    /// Whether the conversion loses information.
    pub is_lossy: bool,
    /// Explanation when lossy.
    pub warning: Option<String>,
}

impl CanonicalTypeInfo {
    /// Create a lossless conversion result.
    pub fn lossless(canonical_type: CanonicalType) -> Self {
        Self {
            canonical_type,
            is_lossy: false,
            warning: None,
        }
    }

    /// Create a lossy conversion result with a warning.
    pub fn lossy(canonical_type: CanonicalType, warning: impl Into<String>) -> Self {
        Self {
            canonical_type,
            is_lossy: true,
            warning: Some(warning.into()),
        }
    }
}

/// Convert native types to canonical types.
pub trait ToCanonical: Send + Sync {
    /// Dialect this converter reads.
    fn dialect(&self) -> DialectKind;

    /// Convert a parsed column type to canonical form.
    fn to_canonical(&self, data_type: &DataType) -> CanonicalTypeInfo;
}

/// Convert canonical types to native types.
#[allow(clippy::wrong_self_convention)]
pub trait FromCanonical: Send + Sync {
    /// Dialect this converter writes.
    fn dialect(&self) -> DialectKind;

    /// Convert a canonical type to a rendered native type.
    fn from_canonical(&self, canonical: &CanonicalType) -> TypeMapping;
}

/// Composed type mapper that chains ToCanonical and FromCanonical conversions.
///
/// # Example
///
/// ```rust,ignore
/// let mapper = ComposedMapper::new(
///     Arc::new(MysqlToCanonical),
///     Arc::new(PostgresFromCanonical),
/// );
/// let mapping = mapper.map_type(&DataType::with_length("tinyint", 1));
/// assert_eq!(mapping.target_type, "boolean");
/// ```
pub struct ComposedMapper {
    source_converter: Arc<dyn ToCanonical>,
    target_converter: Arc<dyn FromCanonical>,
}

impl ComposedMapper {
    /// Create a new composed mapper.
    pub fn new(
        source_converter: Arc<dyn ToCanonical>,
        target_converter: Arc<dyn FromCanonical>,
    ) -> Self {
        Self {
            source_converter,
            target_converter,
        }
    }

    /// Canonical form of a source type.
    pub fn canonical(&self, data_type: &DataType) -> CanonicalTypeInfo {
        self.source_converter.to_canonical(data_type)
    }
}

impl std::fmt::Debug for ComposedMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComposedMapper")
            .field("source", &self.source_converter.dialect())
            .field("target", &self.target_converter.dialect())
            .finish()
    }
}

impl TypeMapper for ComposedMapper {
    fn source_dialect(&self) -> DialectKind {
        self.source_converter.dialect()
    }

    fn target_dialect(&self) -> DialectKind {
        self.target_converter.dialect()
    }

    fn map_column(&self, col: &Column) -> ColumnMapping {
        let type_mapping = self.map_type(&col.data_type);

        ColumnMapping {
            name: col.name.clone(),
            target_type: type_mapping.target_type,
            is_nullable: col.is_nullable,
            warning: type_mapping.warning,
        }
    }

    fn map_type(&self, data_type: &DataType) -> TypeMapping {
        // Step 1: Source type → Canonical
        let canonical_info = self.source_converter.to_canonical(data_type);

        // Step 2: Canonical → Target type
        let mut target_mapping = self
            .target_converter
            .from_canonical(&canonical_info.canonical_type);

        if canonical_info.is_lossy {
            target_mapping.is_lossy = true;
            target_mapping.warning = match (canonical_info.warning, target_mapping.warning) {
                (Some(src), Some(tgt)) => Some(format!("{} {}", src, tgt)),
                (Some(src), None) => Some(src),
                (None, tgt) => tgt,
            };
        }

        target_mapping
    }
}

/// Same-dialect mapper: renders the parsed type back unchanged.
#[derive(Debug, Clone)]
pub struct IdentityMapper {
    dialect: DialectKind,
}

impl IdentityMapper {
    pub fn new(dialect: DialectKind) -> Self {
        Self { dialect }
    }
}

impl TypeMapper for IdentityMapper {
    fn source_dialect(&self) -> DialectKind {
        self.dialect
    }

    fn target_dialect(&self) -> DialectKind {
        self.dialect
    }

    fn map_column(&self, col: &Column) -> ColumnMapping {
        ColumnMapping {
            name: col.name.clone(),
            target_type: col.data_type.to_string(),
            is_nullable: col.is_nullable,
            warning: None,
        }
    }

    fn map_type(&self, data_type: &DataType) -> TypeMapping {
        TypeMapping::lossless(data_type.to_string())
    }
}
