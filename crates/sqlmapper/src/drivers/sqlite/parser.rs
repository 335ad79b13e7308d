//! SQLite parse hooks.

use crate::core::schema::{Column, DataType};
use crate::ddl::Cursor;
use crate::dialect::DialectKind;
use crate::drivers::common::ParseHooks;
use crate::error::Result;

/// SQLite syntax on top of the shared parse engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteParser;

impl ParseHooks for SqliteParser {
    fn kind(&self) -> DialectKind {
        DialectKind::Sqlite
    }

    /// Columns without a declared type have BLOB affinity.
    fn typeless_column(&self) -> Option<DataType> {
        Some(DataType::new("blob"))
    }

    fn column_modifier(&self, cur: &mut Cursor<'_>, column: &mut Column) -> Result<bool> {
        if cur.eat_kw("AUTOINCREMENT") {
            column.auto_increment = true;
            return Ok(true);
        }
        Ok(false)
    }

    fn row_triggers_by_default(&self) -> bool {
        true
    }
}
