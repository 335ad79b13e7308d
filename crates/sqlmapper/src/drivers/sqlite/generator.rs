//! SQLite render hooks.

use crate::core::schema::{Column, Table, Trigger};
use crate::dialect::DialectKind;
use crate::drivers::common::{
    body_is_block, single_row_event, IdentitySql, IndexSyntax, RenderHooks, Renderer,
};
use crate::error::Result;

/// SQLite spelling for the shared render engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteGenerator;

impl RenderHooks for SqliteGenerator {
    fn kind(&self) -> DialectKind {
        DialectKind::Sqlite
    }

    /// AUTOINCREMENT exists only on an `INTEGER PRIMARY KEY` column.
    fn identity(&self, table: &Table, column: &Column, _type_sql: &str) -> IdentitySql {
        if table.is_single_pk(&column.name) {
            IdentitySql {
                type_sql: Some("INTEGER".to_string()),
                after_null: Some("PRIMARY KEY AUTOINCREMENT".to_string()),
                ..IdentitySql::default()
            }
        } else {
            IdentitySql::default()
        }
    }

    fn primary_key_inline(&self, table: &Table) -> bool {
        match table.primary_key_columns() {
            [only] => table.column(only).is_some_and(|c| c.auto_increment),
            _ => false,
        }
    }

    fn index_syntax(&self) -> IndexSyntax {
        IndexSyntax {
            filter: true,
            ..IndexSyntax::default()
        }
    }

    fn render_trigger(&self, r: &Renderer<'_>, trigger: &Trigger) -> Result<String> {
        let event = single_row_event(trigger, DialectKind::Sqlite)?;
        let mut sql = format!(
            "CREATE TRIGGER {} {} {} ON {}\nFOR EACH ROW",
            r.ident(&trigger.name)?,
            trigger.timing.as_sql(),
            event.as_sql(),
            r.ident(&trigger.table)?
        );
        if let Some(condition) = &trigger.condition {
            sql.push_str(&format!("\nWHEN {}", condition));
        }

        let body = trigger.body.trim().trim_end_matches(';').trim_end();
        if body_is_block(body) {
            sql.push_str(&format!("\n{}", body));
        } else {
            sql.push_str(&format!("\nBEGIN\n    {};\nEND", body));
        }
        Ok(self.terminate(sql))
    }
}
