//! SQL Server SQL dialect (Strategy pattern).
//!
//! Pairs [`MssqlParser`] and [`MssqlGenerator`] with the SQL Server
//! descriptor and the shared type catalog.

use std::sync::Arc;

use super::{MssqlGenerator, MssqlParser};
use crate::core::catalog::DriverCatalog;
use crate::core::schema::Schema;
use crate::core::traits::{Dialect, GenerateOptions};
use crate::dialect::{DialectDescriptor, DialectKind};
use crate::drivers::common::{generate_script, parse_script};
use crate::error::Result;

/// SQL Server dialect implementation.
///
/// Implements the Strategy pattern for SQL syntax differences.
#[derive(Debug, Clone)]
pub struct MssqlDialect {
    catalog: Arc<DriverCatalog>,
    descriptor: Arc<DialectDescriptor>,
    options: GenerateOptions,
}

impl MssqlDialect {
    /// Create a new SQL Server dialect instance.
    pub fn new(catalog: Arc<DriverCatalog>, options: GenerateOptions) -> Self {
        let descriptor = catalog.descriptor(DialectKind::Sqlserver);
        Self {
            catalog,
            descriptor,
            options,
        }
    }
}

impl Default for MssqlDialect {
    fn default() -> Self {
        Self::new(Arc::new(DriverCatalog::with_builtins()), GenerateOptions::default())
    }
}

impl Dialect for MssqlDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Sqlserver
    }

    fn descriptor(&self) -> &DialectDescriptor {
        &self.descriptor
    }

    fn parse(&self, text: &str) -> Result<Schema> {
        parse_script(&MssqlParser, text)
    }

    fn generate(&self, schema: Option<&Schema>) -> Result<String> {
        generate_script(
            &MssqlGenerator,
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
    use crate::drivers::mysql::MysqlDialect;
    use crate::drivers::postgres::PostgresDialect;
    use crate::error::MapperError;

    fn from_postgres(sql: &str) -> Result<String> {
        let schema = PostgresDialect::default().parse(sql)?;
        MssqlDialect::default().generate(Some(&schema))
    }

    // =========================================================================
    // Table Tests
    // =========================================================================

    #[test]
    fn test_postgres_table_to_mssql() {
        let out = from_postgres(
            "CREATE TABLE users (\n\
               id serial PRIMARY KEY,\n\
               email varchar(255) NOT NULL UNIQUE,\n\
               active boolean DEFAULT false,\n\
               token uuid DEFAULT gen_random_uuid()\n\
             );\n\
             CREATE INDEX users_email_live ON users (email) INCLUDE (active) WHERE active;",
        )
        .unwrap();
        assert!(out.contains("id int IDENTITY(1,1) NOT NULL"), "{}", out);
        assert!(out.contains("email nvarchar(255) NOT NULL UNIQUE"), "{}", out);
        assert!(out.contains("active bit DEFAULT 0"), "{}", out);
        assert!(out.contains("token uniqueidentifier DEFAULT NEWID()"), "{}", out);
        assert!(
            out.contains("CREATE INDEX users_email_live ON users (email) INCLUDE (active) WHERE active;\nGO"),
            "{}",
            out
        );
    }

    #[test]
    fn test_statements_are_separated_by_go() {
        let out = from_postgres("CREATE TABLE a (x int);\nCREATE VIEW v AS SELECT x FROM a;").unwrap();
        assert_eq!(
            out,
            "CREATE TABLE a (\n    x int\n);\nGO\n\nCREATE VIEW v AS\nSELECT x FROM a;\nGO\n"
        );
    }

    #[test]
    fn test_restrict_becomes_no_action() {
        let out = from_postgres(
            "CREATE TABLE p (id int PRIMARY KEY);\n\
             CREATE TABLE c (p_id int REFERENCES p (id) ON DELETE RESTRICT);",
        )
        .unwrap();
        assert!(out.contains("REFERENCES p (id) ON DELETE NO ACTION"), "{}", out);
    }

    // =========================================================================
    // Trigger Tests
    // =========================================================================

    #[test]
    fn test_before_trigger_is_unsupported() {
        let schema = MysqlDialect::default()
            .parse(
                "CREATE TABLE t (x int);\n\
                 CREATE TRIGGER t_bi BEFORE INSERT ON t FOR EACH ROW SET NEW.x = 1;",
            )
            .unwrap();
        let err = MssqlDialect::default().generate(Some(&schema)).unwrap_err();
        assert!(matches!(err, MapperError::UnsupportedConstruct { .. }));
        assert!(err.to_string().contains("BEFORE trigger t_bi"));
    }

    #[test]
    fn test_trigger_round_trip() {
        let dialect = MssqlDialect::default();
        let schema = dialect
            .parse(
                "CREATE TABLE t (x int)\nGO\n\
                 CREATE TRIGGER t_ai ON t AFTER INSERT, DELETE AS\nBEGIN\n  SET NOCOUNT ON;\nEND\nGO\n",
            )
            .unwrap();
        let out = dialect.generate(Some(&schema)).unwrap();
        assert!(
            out.contains("CREATE TRIGGER t_ai ON t\nAFTER INSERT, DELETE\nAS\nBEGIN\n  SET NOCOUNT ON;\nEND;\nGO"),
            "{}",
            out
        );
    }
}
