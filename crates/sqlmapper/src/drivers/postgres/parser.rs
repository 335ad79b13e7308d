//! PostgreSQL parse hooks.

use crate::core::schema::Column;
use crate::ddl::Cursor;
use crate::dialect::DialectKind;
use crate::drivers::common::parse::read_generated_identity;
use crate::drivers::common::ParseHooks;
use crate::error::Result;

/// PostgreSQL syntax on top of the shared parse engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresParser;

impl ParseHooks for PostgresParser {
    fn kind(&self) -> DialectKind {
        DialectKind::Postgres
    }

    fn column_modifier(&self, cur: &mut Cursor<'_>, column: &mut Column) -> Result<bool> {
        read_generated_identity(cur, column)
    }

    fn finish_column(&self, column: &mut Column) {
        let integer = match column.data_type.name.as_str() {
            "serial" | "serial4" => Some("integer"),
            "bigserial" | "serial8" => Some("bigint"),
            "smallserial" | "serial2" => Some("smallint"),
            _ => None,
        };
        if let Some(integer) = integer {
            column.data_type.name = integer.to_string();
            column.auto_increment = true;
            column.is_nullable = false;
        }

        let owned_sequence = column
            .default
            .as_deref()
            .is_some_and(|d| d.trim_start().to_ascii_lowercase().starts_with("nextval("));
        if owned_sequence {
            column.auto_increment = true;
            column.default = None;
        }
    }
}
