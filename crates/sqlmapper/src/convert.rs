//! Conversion driver: parse with the source dialect, render with the target.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::core::catalog::DriverCatalog;
use crate::core::traits::{Dialect, GenerateOptions};
use crate::dialect::DialectKind;
use crate::drivers::DialectImpl;
use crate::error::Result;

/// Stateless converter over a shared catalog.
///
/// One instance can serve any number of concurrent conversions. Every call
/// builds its own parser and generator; nothing survives between calls.
#[derive(Debug, Clone)]
pub struct Converter {
    catalog: Arc<DriverCatalog>,
    options: GenerateOptions,
}

impl Converter {
    pub fn new(catalog: Arc<DriverCatalog>, options: GenerateOptions) -> Self {
        Self { catalog, options }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    pub fn catalog(&self) -> &Arc<DriverCatalog> {
        &self.catalog
    }

    /// Convert DDL text from `source` to `target`.
    ///
    /// The first error from the parser or generator is returned unchanged;
    /// no partial output is produced.
    #[instrument(skip(self, text), fields(bytes = text.len()))]
    pub fn convert(&self, text: &str, source: DialectKind, target: DialectKind) -> Result<String> {
        let parser = DialectImpl::new(source, self.catalog.clone(), self.options.clone());
        let schema = parser.parse(text)?;
        debug!(
            tables = schema.tables.len(),
            views = schema.views.len(),
            indexes = schema.tables.iter().map(|t| t.indexes.len()).sum::<usize>(),
            triggers = schema.triggers.len(),
            sequences = schema.sequences.len(),
            "Parsed schema"
        );

        let generator = DialectImpl::new(target, self.catalog.clone(), self.options.clone());
        generator.generate(Some(&schema))
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(Arc::new(DriverCatalog::with_builtins()), GenerateOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    // =========================================================================
    // Conversion Tests
    // =========================================================================

    #[test]
    fn test_convert_mysql_to_postgres() {
        let converter = Converter::default();
        let out = converter
            .convert(
                "CREATE TABLE users (id INT NOT NULL AUTO_INCREMENT, email VARCHAR(255) NOT NULL, PRIMARY KEY (id)) ENGINE=InnoDB;",
                DialectKind::Mysql,
                DialectKind::Postgres,
            )
            .unwrap();
        assert!(out.contains("CREATE TABLE users ("), "{out}");
        assert!(out.contains("id serial NOT NULL"), "{out}");
        assert!(out.contains("email varchar(255) NOT NULL"), "{out}");
        assert!(out.contains("PRIMARY KEY (id)"), "{out}");
    }

    #[test]
    fn test_convert_same_dialect() {
        let converter = Converter::default();
        let out = converter
            .convert(
                "CREATE TABLE t (a integer NOT NULL);",
                DialectKind::Postgres,
                DialectKind::Postgres,
            )
            .unwrap();
        assert!(out.contains("a integer NOT NULL"), "{out}");
    }

    // =========================================================================
    // Error Propagation Tests
    // =========================================================================

    #[test]
    fn test_convert_empty_input() {
        let converter = Converter::default();
        let err = converter
            .convert("  -- nothing\n", DialectKind::Mysql, DialectKind::Oracle)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyInput);
    }

    #[test]
    fn test_convert_unsupported_target_construct() {
        let converter = Converter::default();
        let err = converter
            .convert(
                "CREATE SEQUENCE order_seq START WITH 1 INCREMENT BY 1;",
                DialectKind::Postgres,
                DialectKind::Mysql,
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedConstruct);
    }

    #[test]
    fn test_converter_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Converter>();
    }
}
