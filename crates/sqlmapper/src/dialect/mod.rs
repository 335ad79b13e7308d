//! Dialect descriptors, type mapping and capability registries.
//!
//! This module holds everything that is *about* a dialect but not a parser
//! or generator:
//!
//! - [`DialectDescriptor`]: quoting, reserved words, identifier limits
//! - [`CanonicalType`] with per-dialect `ToCanonical`/`FromCanonical`
//!   converters composed by [`ComposedMapper`]
//! - [`ValueRegistry`]: version-scoped conversion of literal values between types
//! - [`CharsetRegistry`] / [`CollationRegistry`]: capability lookups
//!
//! # Usage
//!
//! Mappers are registered in a [`DriverCatalog`](crate::core::DriverCatalog)
//! and retrieved by source/target dialect pair:
//!
//! ```rust,ignore
//! let catalog = DriverCatalog::with_builtins();
//! let mapper = catalog.mapper(DialectKind::Mysql, DialectKind::Postgres)?;
//! let mapping = mapper.map_column(&column);
//! ```

pub mod canonical;
pub mod charset;
pub mod descriptor;
pub mod registry;
pub mod reserved;
pub mod typemap;
pub mod version;

pub use canonical::{
    CanonicalType, CanonicalTypeInfo, ComposedMapper, FromCanonical, IdentityMapper, ToCanonical,
};
pub use charset::{CharsetInfo, CharsetRegistry, CollationInfo, CollationRegistry};
pub use descriptor::{CaseFolding, DialectDescriptor, DialectKind, Descriptors};
pub use registry::{normalize_type_key, ConvertFn, TypeRule, ValueRegistry};
pub use typemap::{
    MssqlFromCanonical, MssqlToCanonical, MysqlFromCanonical, MysqlToCanonical,
    OracleFromCanonical, OracleToCanonical, PostgresFromCanonical, PostgresToCanonical,
    SqliteFromCanonical, SqliteToCanonical,
};
pub use version::Version;
