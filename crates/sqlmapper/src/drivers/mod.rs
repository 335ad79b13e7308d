//! Dialect driver implementations.
//!
//! This module provides one driver per supported dialect, each implementing
//! the [`Dialect`] trait:
//!
//! - [`mysql`]: MySQL/MariaDB driver
//! - [`postgres`]: PostgreSQL driver
//! - [`sqlite`]: SQLite driver
//! - [`oracle`]: Oracle driver
//! - [`mssql`]: Microsoft SQL Server driver
//! - [`common`]: Shared parse and render engine
//!
//! # Architecture
//!
//! Each driver module holds:
//! - a parser: `ParseHooks` for the dialect's DDL syntax
//! - a generator: `RenderHooks` for the dialect's DDL spelling
//! - a dialect: the `Dialect` strategy pairing the two with a descriptor
//!
//! # enum_dispatch
//!
//! [`DialectImpl`] gives static dispatch over the five drivers. Instead of
//! `Box<dyn Dialect>`, callers hold an enum whose variants implement the
//! trait directly.
//!
//! # Adding New Dialects
//!
//! 1. Add a [`DialectKind`] variant and its descriptor
//! 2. Create a module under `drivers/` with parser, generator and dialect
//! 3. Add an enum variant to `DialectImpl`
//! 4. Register type converters in `DriverCatalog::with_builtins()`

pub mod common;
pub mod mssql;
pub mod mysql;
pub mod oracle;
pub mod postgres;
pub mod sqlite;

use std::sync::Arc;

// Re-export driver types
pub use mssql::MssqlDialect;
pub use mysql::MysqlDialect;
pub use oracle::OracleDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;

use crate::core::catalog::DriverCatalog;
use crate::core::schema::Schema;
use crate::core::traits::{Dialect, GenerateOptions};
use crate::dialect::{DialectDescriptor, DialectKind};
use crate::error::Result;

/// Enum-based static dispatch for dialects.
///
/// This provides zero-cost polymorphism - the compiler generates
/// a match statement instead of using vtable dispatch.
#[derive(Debug, Clone)]
pub enum DialectImpl {
    Mysql(MysqlDialect),
    Postgres(PostgresDialect),
    Sqlite(SqliteDialect),
    Oracle(OracleDialect),
    Sqlserver(MssqlDialect),
}

impl Dialect for DialectImpl {
    fn kind(&self) -> DialectKind {
        match self {
            DialectImpl::Mysql(d) => d.kind(),
            DialectImpl::Postgres(d) => d.kind(),
            DialectImpl::Sqlite(d) => d.kind(),
            DialectImpl::Oracle(d) => d.kind(),
            DialectImpl::Sqlserver(d) => d.kind(),
        }
    }

    fn descriptor(&self) -> &DialectDescriptor {
        match self {
            DialectImpl::Mysql(d) => d.descriptor(),
            DialectImpl::Postgres(d) => d.descriptor(),
            DialectImpl::Sqlite(d) => d.descriptor(),
            DialectImpl::Oracle(d) => d.descriptor(),
            DialectImpl::Sqlserver(d) => d.descriptor(),
        }
    }

    fn parse(&self, text: &str) -> Result<Schema> {
        match self {
            DialectImpl::Mysql(d) => d.parse(text),
            DialectImpl::Postgres(d) => d.parse(text),
            DialectImpl::Sqlite(d) => d.parse(text),
            DialectImpl::Oracle(d) => d.parse(text),
            DialectImpl::Sqlserver(d) => d.parse(text),
        }
    }

    fn generate(&self, schema: Option<&Schema>) -> Result<String> {
        match self {
            DialectImpl::Mysql(d) => d.generate(schema),
            DialectImpl::Postgres(d) => d.generate(schema),
            DialectImpl::Sqlite(d) => d.generate(schema),
            DialectImpl::Oracle(d) => d.generate(schema),
            DialectImpl::Sqlserver(d) => d.generate(schema),
        }
    }
}

impl DialectImpl {
    /// Build the driver for a dialect over a shared catalog.
    pub fn new(kind: DialectKind, catalog: Arc<DriverCatalog>, options: GenerateOptions) -> Self {
        match kind {
            DialectKind::Mysql => DialectImpl::Mysql(MysqlDialect::new(catalog, options)),
            DialectKind::Postgres => DialectImpl::Postgres(PostgresDialect::new(catalog, options)),
            DialectKind::Sqlite => DialectImpl::Sqlite(SqliteDialect::new(catalog, options)),
            DialectKind::Oracle => DialectImpl::Oracle(OracleDialect::new(catalog, options)),
            DialectKind::Sqlserver => DialectImpl::Sqlserver(MssqlDialect::new(catalog, options)),
        }
    }

    /// Create a dialect implementation from a dialect name.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error if the name is not recognized.
    pub fn from_db_type(
        db_type: &str,
        catalog: Arc<DriverCatalog>,
        options: GenerateOptions,
    ) -> Result<Self> {
        let kind: DialectKind = db_type.parse()?;
        Ok(Self::new(kind, catalog, options))
    }
}
