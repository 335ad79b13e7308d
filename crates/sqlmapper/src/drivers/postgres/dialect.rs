//! PostgreSQL SQL dialect (Strategy pattern).
//!
//! Pairs [`PostgresParser`] and [`PostgresGenerator`] with the PostgreSQL
//! descriptor and the shared type catalog.

use std::sync::Arc;

use super::{PostgresGenerator, PostgresParser};
use crate::core::catalog::DriverCatalog;
use crate::core::schema::Schema;
use crate::core::traits::{Dialect, GenerateOptions};
use crate::dialect::{DialectDescriptor, DialectKind};
use crate::drivers::common::{generate_script, parse_script};
use crate::error::Result;

/// PostgreSQL dialect implementation.
///
/// Implements the Strategy pattern for SQL syntax differences.
#[derive(Debug, Clone)]
pub struct PostgresDialect {
    catalog: Arc<DriverCatalog>,
    descriptor: Arc<DialectDescriptor>,
    options: GenerateOptions,
}

impl PostgresDialect {
    /// Create a new PostgreSQL dialect instance.
    pub fn new(catalog: Arc<DriverCatalog>, options: GenerateOptions) -> Self {
        let descriptor = catalog.descriptor(DialectKind::Postgres);
        Self {
            catalog,
            descriptor,
            options,
        }
    }
}

impl Default for PostgresDialect {
    fn default() -> Self {
        Self::new(Arc::new(DriverCatalog::with_builtins()), GenerateOptions::default())
    }
}

impl Dialect for PostgresDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Postgres
    }

    fn descriptor(&self) -> &DialectDescriptor {
        &self.descriptor
    }

    fn parse(&self, text: &str) -> Result<Schema> {
        parse_script(&PostgresParser, text)
    }

    fn generate(&self, schema: Option<&Schema>) -> Result<String> {
        generate_script(
            &PostgresGenerator,
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
    use crate::core::schema::{Column, DataType, Table, Trigger, TriggerEvent, TriggerTiming};
    use crate::error::MapperError;

    fn round_trip(sql: &str) -> String {
        let dialect = PostgresDialect::default();
        let schema = dialect.parse(sql).unwrap();
        dialect.generate(Some(&schema)).unwrap()
    }

    // =========================================================================
    // Identity Tests
    // =========================================================================

    #[test]
    fn test_serial_round_trip() {
        let out = round_trip("CREATE TABLE users (id serial PRIMARY KEY, name text NOT NULL);");
        assert!(out.contains("id serial NOT NULL"), "{}", out);
        assert!(out.contains("PRIMARY KEY (id)"), "{}", out);
    }

    #[test]
    fn test_explicit_identity_keeps_options() {
        let out = round_trip(
            "CREATE TABLE t (id bigint GENERATED BY DEFAULT AS IDENTITY (START WITH 10 INCREMENT BY 2));",
        );
        assert!(
            out.contains("id bigint GENERATED BY DEFAULT AS IDENTITY (START WITH 10 INCREMENT BY 2)"),
            "{}",
            out
        );
        assert!(!out.contains("serial"));
    }

    // =========================================================================
    // Statement Tests
    // =========================================================================

    #[test]
    fn test_comments_become_comment_on() {
        let out = round_trip(
            "CREATE TABLE t (a int);\nCOMMENT ON TABLE t IS 'Things';\nCOMMENT ON COLUMN t.a IS 'It''s a';",
        );
        assert!(out.contains("COMMENT ON TABLE t IS 'Things';"), "{}", out);
        assert!(out.contains("COMMENT ON COLUMN t.a IS 'It''s a';"), "{}", out);
    }

    #[test]
    fn test_partial_index_with_method() {
        let out = round_trip(
            "CREATE TABLE docs (id int, body jsonb, live boolean);\n\
             CREATE INDEX docs_body_idx ON docs USING gin (body) WHERE live;",
        );
        assert!(
            out.contains("CREATE INDEX docs_body_idx ON docs USING gin (body) WHERE live;"),
            "{}",
            out
        );
    }

    #[test]
    fn test_execute_function_trigger_is_kept() {
        let out = round_trip(
            "CREATE TABLE t (x int);\n\
             CREATE TRIGGER t_audit AFTER INSERT OR DELETE ON t FOR EACH ROW EXECUTE FUNCTION audit();",
        );
        assert!(
            out.contains("CREATE TRIGGER t_audit AFTER INSERT OR DELETE ON t\nFOR EACH ROW\nEXECUTE FUNCTION audit();"),
            "{}",
            out
        );
        assert!(!out.contains("CREATE OR REPLACE FUNCTION"));
    }

    #[test]
    fn test_foreign_body_becomes_trigger_function() {
        let mut schema = Schema::new(DialectKind::Mysql);
        schema.tables.push({
            let mut t = Table::new("t");
            t.columns.push(Column::new("x", DataType::new("int")));
            t
        });
        schema.triggers.push(Trigger {
            name: "t_bi".to_string(),
            table: "t".to_string(),
            timing: TriggerTiming::Before,
            events: vec![TriggerEvent::Insert],
            for_each_row: true,
            condition: None,
            body: "SET NEW.x = 1".to_string(),
        });

        let out = PostgresDialect::default().generate(Some(&schema)).unwrap();
        assert!(out.contains("CREATE OR REPLACE FUNCTION t_bi_fn() RETURNS trigger AS $$"), "{}", out);
        assert!(out.contains("BEGIN\n    SET NEW.x = 1;\n    RETURN NEW;\nEND;"), "{}", out);
        assert!(out.contains("EXECUTE FUNCTION t_bi_fn();"), "{}", out);
    }

    #[test]
    fn test_generate_none_is_nil_schema() {
        let err = PostgresDialect::default().generate(None).unwrap_err();
        assert!(matches!(err, MapperError::NilSchema));
    }
}
