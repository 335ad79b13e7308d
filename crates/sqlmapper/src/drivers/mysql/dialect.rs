//! MySQL/MariaDB SQL dialect (Strategy pattern).
//!
//! Pairs [`MysqlParser`] and [`MysqlGenerator`] with the MySQL descriptor
//! and the shared type catalog.

use std::sync::Arc;

use super::{MysqlGenerator, MysqlParser};
use crate::core::catalog::DriverCatalog;
use crate::core::schema::Schema;
use crate::core::traits::{Dialect, GenerateOptions};
use crate::dialect::{DialectDescriptor, DialectKind};
use crate::drivers::common::{generate_script, parse_script};
use crate::error::Result;

/// MySQL/MariaDB dialect implementation.
///
/// Implements the Strategy pattern for SQL syntax differences.
/// Compatible with MySQL 5.7+, 8.0+, and MariaDB 10.2+.
#[derive(Debug, Clone)]
pub struct MysqlDialect {
    catalog: Arc<DriverCatalog>,
    descriptor: Arc<DialectDescriptor>,
    options: GenerateOptions,
}

impl MysqlDialect {
    /// Create a new MySQL dialect instance.
    pub fn new(catalog: Arc<DriverCatalog>, options: GenerateOptions) -> Self {
        let descriptor = catalog.descriptor(DialectKind::Mysql);
        Self {
            catalog,
            descriptor,
            options,
        }
    }
}

impl Default for MysqlDialect {
    fn default() -> Self {
        Self::new(Arc::new(DriverCatalog::with_builtins()), GenerateOptions::default())
    }
}

impl Dialect for MysqlDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Mysql
    }

    fn descriptor(&self) -> &DialectDescriptor {
        &self.descriptor
    }

    fn parse(&self, text: &str) -> Result<Schema> {
        parse_script(&MysqlParser, text)
    }

    fn generate(&self, schema: Option<&Schema>) -> Result<String> {
        generate_script(
            &MysqlGenerator,
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
    use crate::core::schema::{Trigger, TriggerEvent, TriggerTiming};
    use crate::error::MapperError;

    fn round_trip(sql: &str) -> String {
        let dialect = MysqlDialect::default();
        let schema = dialect.parse(sql).unwrap();
        dialect.generate(Some(&schema)).unwrap()
    }

    fn trigger(events: Vec<TriggerEvent>, for_each_row: bool) -> Schema {
        let mut schema = MysqlDialect::default()
            .parse("CREATE TABLE t (x int);")
            .unwrap();
        schema.dialect = Some(DialectKind::Postgres);
        schema.triggers.push(Trigger {
            name: "t_trg".to_string(),
            table: "t".to_string(),
            timing: TriggerTiming::After,
            events,
            for_each_row,
            condition: None,
            body: "INSERT INTO log VALUES (1)".to_string(),
        });
        schema
    }

    // =========================================================================
    // Table Tests
    // =========================================================================

    #[test]
    fn test_round_trip_keeps_mysql_features() {
        let out = round_trip(
            "CREATE TABLE `orders` (\n\
               `id` bigint unsigned NOT NULL AUTO_INCREMENT,\n\
               `note` varchar(200) CHARACTER SET utf8mb4 DEFAULT NULL COMMENT 'Free text',\n\
               PRIMARY KEY (`id`),\n\
               KEY `idx_note` (`note`) USING HASH\n\
             ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COMMENT='Orders';",
        );
        assert!(out.starts_with("CREATE TABLE orders (\n"), "{}", out);
        assert!(out.contains("id bigint unsigned NOT NULL AUTO_INCREMENT"), "{}", out);
        assert!(
            out.contains("note varchar(200) CHARACTER SET utf8mb4 COMMENT 'Free text'"),
            "{}",
            out
        );
        assert!(
            out.contains(") ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COMMENT='Orders';"),
            "{}",
            out
        );
        assert!(out.contains("CREATE INDEX idx_note ON orders (note) USING HASH;"), "{}", out);
    }

    #[test]
    fn test_unsupported_index_method_is_dropped() {
        let mut schema = MysqlDialect::default()
            .parse("CREATE TABLE d (body text); CREATE INDEX d_body ON d (body);")
            .unwrap();
        schema.tables[0].indexes[0].method = Some("gin".to_string());
        let out = MysqlDialect::default().generate(Some(&schema)).unwrap();
        assert!(out.contains("CREATE INDEX d_body ON d (body);"), "{}", out);
    }

    // =========================================================================
    // Trigger Tests
    // =========================================================================

    #[test]
    fn test_trigger_round_trip_uses_delimiter() {
        let out = round_trip(
            "CREATE TABLE a (x int, y int);\n\
             DELIMITER $$\n\
             CREATE TRIGGER a_bi BEFORE INSERT ON a FOR EACH ROW\n\
             BEGIN\n  SET NEW.y = NEW.x * 2;\nEND$$\n\
             DELIMITER ;\n",
        );
        assert!(out.contains("DELIMITER //\nCREATE TRIGGER a_bi BEFORE INSERT ON a\nFOR EACH ROW\nBEGIN"), "{}", out);
        assert!(out.contains("END//\nDELIMITER ;"), "{}", out);
    }

    #[test]
    fn test_single_statement_trigger_is_plain() {
        let out = MysqlDialect::default()
            .generate(Some(&trigger(vec![TriggerEvent::Insert], true)))
            .unwrap();
        assert!(
            out.contains("CREATE TRIGGER t_trg AFTER INSERT ON t\nFOR EACH ROW\nINSERT INTO log VALUES (1);"),
            "{}",
            out
        );
        assert!(!out.contains("DELIMITER"));
    }

    #[test]
    fn test_multi_event_trigger_is_unsupported() {
        let err = MysqlDialect::default()
            .generate(Some(&trigger(vec![TriggerEvent::Insert, TriggerEvent::Update], true)))
            .unwrap_err();
        assert!(matches!(err, MapperError::UnsupportedConstruct { .. }));
    }

    #[test]
    fn test_statement_level_trigger_is_unsupported() {
        let err = MysqlDialect::default()
            .generate(Some(&trigger(vec![TriggerEvent::Delete], false)))
            .unwrap_err();
        assert!(matches!(err, MapperError::UnsupportedConstruct { .. }));
    }
}
