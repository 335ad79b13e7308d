//! Oracle SQL dialect (Strategy pattern).
//!
//! Pairs [`OracleParser`] and [`OracleGenerator`] with the Oracle
//! descriptor and the shared type catalog.

use std::sync::Arc;

use super::{OracleGenerator, OracleParser};
use crate::core::catalog::DriverCatalog;
use crate::core::schema::Schema;
use crate::core::traits::{Dialect, GenerateOptions};
use crate::dialect::{DialectDescriptor, DialectKind};
use crate::drivers::common::{generate_script, parse_script};
use crate::error::Result;

/// Oracle dialect implementation.
///
/// Implements the Strategy pattern for SQL syntax differences.
#[derive(Debug, Clone)]
pub struct OracleDialect {
    catalog: Arc<DriverCatalog>,
    descriptor: Arc<DialectDescriptor>,
    options: GenerateOptions,
}

impl OracleDialect {
    /// Create a new Oracle dialect instance.
    pub fn new(catalog: Arc<DriverCatalog>, options: GenerateOptions) -> Self {
        let descriptor = catalog.descriptor(DialectKind::Oracle);
        Self {
            catalog,
            descriptor,
            options,
        }
    }
}

impl Default for OracleDialect {
    fn default() -> Self {
        Self::new(Arc::new(DriverCatalog::with_builtins()), GenerateOptions::default())
    }
}

impl Dialect for OracleDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Oracle
    }

    fn descriptor(&self) -> &DialectDescriptor {
        &self.descriptor
    }

    fn parse(&self, text: &str) -> Result<Schema> {
        parse_script(&OracleParser, text)
    }

    fn generate(&self, schema: Option<&Schema>) -> Result<String> {
        generate_script(
            &OracleGenerator,
            &self.catalog,
            &self.descriptor,
            &self.options,
            schema,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::postgres::PostgresDialect;

    fn from_postgres(sql: &str) -> String {
        let schema = PostgresDialect::default().parse(sql).unwrap();
        OracleDialect::default().generate(Some(&schema)).unwrap()
    }

    // =========================================================================
    // Table Tests
    // =========================================================================

    #[test]
    fn test_identity_and_boolean_default() {
        let out = from_postgres(
            "CREATE TABLE accounts (\n\
               id bigserial PRIMARY KEY,\n\
               active boolean DEFAULT true NOT NULL,\n\
               opened timestamp DEFAULT now()\n\
             );",
        );
        assert!(
            out.contains("id NUMBER(19) GENERATED BY DEFAULT AS IDENTITY NOT NULL"),
            "{}",
            out
        );
        assert!(out.contains("active NUMBER(1) DEFAULT 1 NOT NULL"), "{}", out);
        assert!(out.contains("opened TIMESTAMP DEFAULT CURRENT_TIMESTAMP"), "{}", out);
    }

    #[test]
    fn test_foreign_key_actions_are_filtered() {
        let out = from_postgres(
            "CREATE TABLE a (id integer PRIMARY KEY);\n\
             CREATE TABLE b (\n\
               a_id integer REFERENCES a (id) ON DELETE CASCADE ON UPDATE CASCADE,\n\
               c_id integer REFERENCES a (id) ON DELETE RESTRICT\n\
             );",
        );
        assert!(out.contains("FOREIGN KEY (a_id) REFERENCES a (id) ON DELETE CASCADE,"), "{}", out);
        assert!(!out.contains("ON UPDATE"), "{}", out);
        assert!(!out.contains("RESTRICT"), "{}", out);
    }

    #[test]
    fn test_comments_and_sequences() {
        let out = from_postgres(
            "CREATE SEQUENCE order_seq START WITH 1000 INCREMENT BY 10;\n\
             CREATE TABLE orders (id integer);\n\
             COMMENT ON TABLE orders IS 'All orders';",
        );
        assert!(out.starts_with("CREATE SEQUENCE order_seq START WITH 1000 INCREMENT BY 10;"), "{}", out);
        assert!(out.contains("COMMENT ON TABLE orders IS 'All orders';"), "{}", out);
    }

    // =========================================================================
    // Trigger Tests
    // =========================================================================

    #[test]
    fn test_trigger_round_trip_ends_with_slash() {
        let dialect = OracleDialect::default();
        let schema = dialect
            .parse(
                "CREATE TABLE t (id NUMBER(10), changed DATE);\n\
                 CREATE OR REPLACE TRIGGER t_biu\n\
                 BEFORE INSERT OR UPDATE ON t\n\
                 FOR EACH ROW\n\
                 BEGIN\n  :NEW.changed := SYSDATE;\nEND;\n\
                 /\n",
            )
            .unwrap();
        let out = dialect.generate(Some(&schema)).unwrap();
        assert!(
            out.contains("CREATE OR REPLACE TRIGGER t_biu\nBEFORE INSERT OR UPDATE ON t\nFOR EACH ROW\nBEGIN"),
            "{}",
            out
        );
        assert!(out.ends_with("END;\n/\n"), "{}", out);
    }

    #[test]
    fn test_plain_body_is_wrapped_in_block() {
        let out = from_postgres(
            "CREATE TABLE t (x integer);\n\
             CREATE TRIGGER t_ad AFTER DELETE ON t FOR EACH STATEMENT EXECUTE FUNCTION log_delete();",
        );
        assert!(
            out.contains("AFTER DELETE ON t\nBEGIN\n    EXECUTE FUNCTION log_delete();\nEND;\n/"),
            "{}",
            out
        );
    }
}
