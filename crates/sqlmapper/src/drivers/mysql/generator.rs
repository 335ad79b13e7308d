//! MySQL render hooks.

use tracing::warn;

use crate::core::schema::{Column, ReferentialAction, Table, Trigger, TriggerTiming};
use crate::core::value::quote_string;
use crate::dialect::DialectKind;
use crate::drivers::common::{
    single_row_event, DefaultFunction, IdentitySql, IndexSyntax, MethodPlacement, RenderHooks,
    Renderer,
};
use crate::error::{MapperError, Result};

/// MySQL spelling for the shared render engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlGenerator;

impl RenderHooks for MysqlGenerator {
    fn kind(&self) -> DialectKind {
        DialectKind::Mysql
    }

    fn identity(&self, _table: &Table, _column: &Column, _type_sql: &str) -> IdentitySql {
        IdentitySql {
            after_null: Some("AUTO_INCREMENT".to_string()),
            ..IdentitySql::default()
        }
    }

    fn charset_clause(&self, charset: &str) -> Option<String> {
        Some(format!("CHARACTER SET {}", charset))
    }

    fn column_comment(&self, comment: &str) -> Option<String> {
        Some(format!("COMMENT {}", quote_string(comment)))
    }

    fn table_suffix(&self, r: &Renderer<'_>, table: &Table) -> Result<String> {
        let mut suffix = String::from(" ENGINE=InnoDB");
        if let Some(charset) = &table.charset {
            if r.charset_supported(charset) {
                suffix.push_str(&format!(" DEFAULT CHARSET={}", charset));
            } else {
                warn!("{}: character set {} not supported by mysql, dropped", table.name, charset);
            }
        }
        if let Some(collation) = &table.collation {
            if r.collation_supported(collation) {
                suffix.push_str(&format!(" COLLATE={}", collation));
            } else {
                warn!("{}: collation {} not supported by mysql, dropped", table.name, collation);
            }
        }
        if let Some(comment) = &table.comment {
            suffix.push_str(&format!(" COMMENT={}", quote_string(comment)));
        }
        Ok(suffix)
    }

    /// InnoDB parses SET DEFAULT but rejects it.
    fn referential_action(
        &self,
        action: ReferentialAction,
        _on_update: bool,
    ) -> Option<ReferentialAction> {
        match action {
            ReferentialAction::SetDefault => None,
            other => Some(other),
        }
    }

    fn index_syntax(&self) -> IndexSyntax {
        IndexSyntax {
            method: MethodPlacement::AfterColumns,
            ..IndexSyntax::default()
        }
    }

    fn index_method_supported(&self, method: &str) -> bool {
        matches!(method, "btree" | "hash")
    }

    fn default_function(&self, function: DefaultFunction) -> Option<String> {
        Some(
            match function {
                DefaultFunction::CurrentTimestamp => "CURRENT_TIMESTAMP",
                DefaultFunction::CurrentDate => "(CURRENT_DATE)",
                DefaultFunction::Uuid => "(UUID())",
            }
            .to_string(),
        )
    }

    /// Row-level, one event, no WHEN. Bodies with inner semicolons are
    /// wrapped in `DELIMITER //` so the script stays loadable by the client.
    fn render_trigger(&self, r: &Renderer<'_>, trigger: &Trigger) -> Result<String> {
        if matches!(trigger.timing, TriggerTiming::InsteadOf) {
            return Err(MapperError::unsupported(
                format!("INSTEAD OF trigger {}", trigger.name),
                DialectKind::Mysql,
            ));
        }
        let event = single_row_event(trigger, DialectKind::Mysql)?;
        if trigger.condition.is_some() {
            return Err(MapperError::unsupported(
                format!("WHEN condition on trigger {}", trigger.name),
                DialectKind::Mysql,
            ));
        }

        let body = trigger.body.trim().trim_end_matches(';').trim_end();
        let sql = format!(
            "CREATE TRIGGER {} {} {} ON {}\nFOR EACH ROW\n{}",
            r.ident(&trigger.name)?,
            trigger.timing.as_sql(),
            event.as_sql(),
            r.ident(&trigger.table)?,
            body
        );
        if body.contains(';') {
            Ok(format!("DELIMITER //\n{}//\nDELIMITER ;\n\n", sql))
        } else {
            Ok(self.terminate(sql))
        }
    }
}
