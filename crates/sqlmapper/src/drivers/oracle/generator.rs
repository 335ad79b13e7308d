//! Oracle render hooks.

use crate::core::schema::{Column, ReferentialAction, Table, Trigger};
use crate::dialect::DialectKind;
use crate::drivers::common::{
    body_is_block, comment_on_statements, DefaultFunction, IdentitySql, RenderHooks, Renderer,
};
use crate::error::Result;

/// Oracle spelling for the shared render engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleGenerator;

impl RenderHooks for OracleGenerator {
    fn kind(&self) -> DialectKind {
        DialectKind::Oracle
    }

    fn identity(&self, _table: &Table, column: &Column, _type_sql: &str) -> IdentitySql {
        let clause = match column.identity {
            Some(identity) => format!(
                "GENERATED BY DEFAULT AS IDENTITY (START WITH {} INCREMENT BY {})",
                identity.start, identity.increment
            ),
            None => "GENERATED BY DEFAULT AS IDENTITY".to_string(),
        };
        IdentitySql {
            before_null: Some(clause),
            ..IdentitySql::default()
        }
    }

    fn comment_statements(&self, r: &Renderer<'_>, table: &Table) -> Result<Vec<String>> {
        comment_on_statements(r, table)
    }

    /// Only ON DELETE CASCADE and ON DELETE SET NULL exist; NO ACTION is
    /// the implicit behavior.
    fn referential_action(
        &self,
        action: ReferentialAction,
        on_update: bool,
    ) -> Option<ReferentialAction> {
        match action {
            ReferentialAction::Cascade | ReferentialAction::SetNull if !on_update => Some(action),
            _ => None,
        }
    }

    fn default_function(&self, function: DefaultFunction) -> Option<String> {
        Some(
            match function {
                DefaultFunction::CurrentTimestamp => "CURRENT_TIMESTAMP",
                DefaultFunction::CurrentDate => "TRUNC(SYSDATE)",
                DefaultFunction::Uuid => "SYS_GUID()",
            }
            .to_string(),
        )
    }

    fn render_trigger(&self, r: &Renderer<'_>, trigger: &Trigger) -> Result<String> {
        let events: Vec<&str> = trigger.events.iter().map(|e| e.as_sql()).collect();
        let mut sql = format!(
            "CREATE OR REPLACE TRIGGER {}\n{} {} ON {}",
            r.ident(&trigger.name)?,
            trigger.timing.as_sql(),
            events.join(" OR "),
            r.ident(&trigger.table)?
        );
        if trigger.for_each_row {
            sql.push_str("\nFOR EACH ROW");
        }
        if let Some(condition) = &trigger.condition {
            sql.push_str(&format!("\nWHEN ({})", condition));
        }

        let body = trigger.body.trim();
        let block = if body_is_block(body) {
            if body.ends_with(';') {
                body.to_string()
            } else {
                format!("{};", body)
            }
        } else {
            format!("BEGIN\n    {};\nEND;", body.trim_end_matches(';'))
        };
        Ok(format!("{}\n{}\n/\n\n", sql, block))
    }
}
