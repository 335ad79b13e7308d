//! Core traits for dialect-agnostic DDL conversion.
//!
//! This module defines the primary abstractions used by the converter:
//!
//! - [`Dialect`]: parse one dialect's DDL into a [`Schema`] and render a
//!   [`Schema`] back out as that dialect's DDL
//! - [`TypeMapper`]: maps column types between source and target dialects
//!
//! # Design Patterns
//!
//! - **Strategy**: Dialect and TypeMapper provide interchangeable algorithms
//! - **Hub and spoke**: every dialect talks to every other through [`Schema`]

use serde::{Deserialize, Serialize};

use crate::core::identifier::QuotePolicy;
use crate::core::schema::{Column, DataType, Schema};
use crate::dialect::{DialectDescriptor, DialectKind, Version};
use crate::error::Result;

/// Rendering knobs shared by every generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// When to quote identifiers.
    pub quote_identifiers: QuotePolicy,

    /// Prefix object names with their schema when the source named one.
    pub qualify_schema: bool,

    /// Source engine version for version-scoped value conversion.
    pub source_version: Option<Version>,

    /// Target engine version for version-scoped value conversion.
    pub target_version: Option<Version>,
}

/// One SQL dialect: a parser and a generator sharing a descriptor.
///
/// Implementations hold no per-call state. The output buffer of
/// [`generate`](Dialect::generate) lives only for that call, so one instance
/// can serve concurrent conversions.
///
/// # enum_dispatch
///
/// Used through the `DialectImpl` enum in the `drivers` module for static
/// dispatch over the five built-in dialects.
pub trait Dialect: Send + Sync {
    /// Dialect tag.
    fn kind(&self) -> DialectKind;

    /// Dialect identifier (e.g., "mysql", "sqlserver").
    fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Quoting, reserved words and limits.
    fn descriptor(&self) -> &DialectDescriptor;

    /// Parse DDL text into a schema tagged with this dialect.
    ///
    /// # Errors
    ///
    /// - `EmptyInput` when the text has no statements
    /// - `MalformedStatement` when a recognized statement cannot be parsed
    /// - `UnsupportedConstruct` for recognized statements the IR cannot hold
    fn parse(&self, text: &str) -> Result<Schema>;

    /// Render a schema as this dialect's DDL.
    ///
    /// # Errors
    ///
    /// - `NilSchema` when `schema` is `None`
    /// - `UnsupportedConstruct` when an object has no equivalent here
    /// - `IdentifierTooLong` / `ReservedWordCollision` from identifier checks
    fn generate(&self, schema: Option<&Schema>) -> Result<String>;
}

/// Maps data types between source and target database dialects.
///
/// # Design Pattern
///
/// TypeMapper uses a **(source, target) pair keying** approach. Mappers are
/// registered per source→target combination in the
/// [`DriverCatalog`](crate::core::DriverCatalog).
pub trait TypeMapper: Send + Sync {
    /// Source dialect.
    fn source_dialect(&self) -> DialectKind;

    /// Target dialect.
    fn target_dialect(&self) -> DialectKind;

    /// Map a column definition from source to target.
    ///
    /// Returns a [`ColumnMapping`] with the target type string and
    /// any warnings about lossy conversions.
    fn map_column(&self, col: &Column) -> ColumnMapping;

    /// Map a parsed source type to a rendered target type.
    fn map_type(&self, data_type: &DataType) -> TypeMapping;
}

/// Result of mapping a column from source to target.
#[derive(Debug, Clone)]
pub struct ColumnMapping {
    /// Target column name (usually same as source).
    pub name: String,
    /// Target data type string.
    pub target_type: String,
    /// Whether the column is nullable.
    pub is_nullable: bool,
    /// Warning message if the mapping is lossy.
    pub warning: Option<String>,
}

/// Result of mapping a type from source to target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMapping {
    /// Target type string (e.g., "varchar(255)", "BIGINT").
    pub target_type: String,
    /// Whether this mapping loses data or precision.
    pub is_lossy: bool,
    /// Warning message for lossy mappings.
    pub warning: Option<String>,
}

impl TypeMapping {
    /// Create a lossless type mapping.
    pub fn lossless(target_type: impl Into<String>) -> Self {
        Self {
            target_type: target_type.into(),
            is_lossy: false,
            warning: None,
        }
    }

    /// Create a lossy type mapping with a warning.
    pub fn lossy(target_type: impl Into<String>, warning: impl Into<String>) -> Self {
        Self {
            target_type: target_type.into(),
            is_lossy: true,
            warning: Some(warning.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mapping_lossless() {
        let mapping = TypeMapping::lossless("bigint");
        assert_eq!(mapping.target_type, "bigint");
        assert!(!mapping.is_lossy);
        assert!(mapping.warning.is_none());
    }

    #[test]
    fn test_type_mapping_lossy() {
        let mapping = TypeMapping::lossy("text", "Array types stored as JSON");
        assert_eq!(mapping.target_type, "text");
        assert!(mapping.is_lossy);
        assert_eq!(
            mapping.warning.as_deref(),
            Some("Array types stored as JSON")
        );
    }

    #[test]
    fn test_generate_options_default() {
        let opts = GenerateOptions::default();
        assert_eq!(opts.quote_identifiers, QuotePolicy::AsNeeded);
        assert!(!opts.qualify_schema);
        assert!(opts.source_version.is_none());
    }

    #[test]
    fn test_generate_options_from_yaml() {
        let opts: GenerateOptions =
            serde_yaml::from_str("quote_identifiers: always\ntarget_version: \"5.7\"\n").unwrap();
        assert_eq!(opts.quote_identifiers, QuotePolicy::Always);
        assert_eq!(opts.target_version, Some(Version::new(5, 7)));
    }
}
