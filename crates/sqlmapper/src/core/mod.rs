//! Core abstractions for dialect-agnostic DDL conversion.
//!
//! This module provides the foundational types and traits used throughout
//! the converter:
//!
//! - [`schema`]: the canonical schema IR (tables, columns, constraints, ...)
//! - [`value`]: literal values carried in defaults
//! - [`traits`]: the `Dialect` and `TypeMapper` traits
//! - [`identifier`]: identifier validation and quoting
//! - [`catalog`]: shared registries for dependency injection
//!
//! # Architecture
//!
//! Parsers lower text into a [`Schema`]; generators render a [`Schema`] in
//! a target dialect. The core module knows nothing about any particular
//! dialect's syntax; that lives in `drivers/<dialect>`.

pub mod catalog;
pub mod identifier;
pub mod schema;
pub mod traits;
pub mod value;

// Re-export commonly used types for convenience
pub use catalog::DriverCatalog;
pub use identifier::{qualify, quote_identifier, unquote, validate_identifier, QuotePolicy};
pub use schema::{
    Column, Constraint, ConstraintKind, DataType, ForeignKeyRef, Identity, Index,
    ReferentialAction, Schema, Sequence, Table, Trigger, TriggerEvent, TriggerTiming, View,
};
pub use traits::{ColumnMapping, Dialect, GenerateOptions, TypeMapper, TypeMapping};
pub use value::SqlValue;
