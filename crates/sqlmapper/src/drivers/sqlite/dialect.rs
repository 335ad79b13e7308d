//! SQLite SQL dialect (Strategy pattern).
//!
//! Pairs [`SqliteParser`] and [`SqliteGenerator`] with the SQLite
//! descriptor and the shared type catalog.

use std::sync::Arc;

use super::{SqliteGenerator, SqliteParser};
use crate::core::catalog::DriverCatalog;
use crate::core::schema::Schema;
use crate::core::traits::{Dialect, GenerateOptions};
use crate::dialect::{DialectDescriptor, DialectKind};
use crate::drivers::common::{generate_script, parse_script};
use crate::error::Result;

/// SQLite dialect implementation.
///
/// Implements the Strategy pattern for SQL syntax differences.
#[derive(Debug, Clone)]
pub struct SqliteDialect {
    catalog: Arc<DriverCatalog>,
    descriptor: Arc<DialectDescriptor>,
    options: GenerateOptions,
}

impl SqliteDialect {
    /// Create a new SQLite dialect instance.
    pub fn new(catalog: Arc<DriverCatalog>, options: GenerateOptions) -> Self {
        let descriptor = catalog.descriptor(DialectKind::Sqlite);
        Self {
            catalog,
            descriptor,
            options,
        }
    }
}

impl Default for SqliteDialect {
    fn default() -> Self {
        Self::new(Arc::new(DriverCatalog::with_builtins()), GenerateOptions::default())
    }
}

impl Dialect for SqliteDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Sqlite
    }

    fn descriptor(&self) -> &DialectDescriptor {
        &self.descriptor
    }

    fn parse(&self, text: &str) -> Result<Schema> {
        parse_script(&SqliteParser, text)
    }

    fn generate(&self, schema: Option<&Schema>) -> Result<String> {
        generate_script(
            &SqliteGenerator,
            &self.catalog,
            &self.descriptor,
            &self.options,
            schema,
        )
    }
}
