//! SQL Server render hooks.

use tracing::warn;

use crate::core::schema::{Column, ReferentialAction, Table, Trigger, TriggerTiming};
use crate::dialect::DialectKind;
use crate::drivers::common::{DefaultFunction, IdentitySql, IndexSyntax, RenderHooks, Renderer};
use crate::error::{MapperError, Result};

/// SQL Server spelling for the shared render engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct MssqlGenerator;

impl RenderHooks for MssqlGenerator {
    fn kind(&self) -> DialectKind {
        DialectKind::Sqlserver
    }

    fn identity(&self, _table: &Table, column: &Column, _type_sql: &str) -> IdentitySql {
        let identity = column.identity.unwrap_or_default();
        IdentitySql {
            before_null: Some(format!("IDENTITY({},{})", identity.start, identity.increment)),
            ..IdentitySql::default()
        }
    }

    fn referential_action(
        &self,
        action: ReferentialAction,
        _on_update: bool,
    ) -> Option<ReferentialAction> {
        match action {
            ReferentialAction::Restrict => Some(ReferentialAction::NoAction),
            other => Some(other),
        }
    }

    fn index_syntax(&self) -> IndexSyntax {
        IndexSyntax {
            filter: true,
            include: true,
            ..IndexSyntax::default()
        }
    }

    fn default_function(&self, function: DefaultFunction) -> Option<String> {
        Some(
            match function {
                DefaultFunction::CurrentTimestamp => "GETDATE()",
                DefaultFunction::CurrentDate => "CAST(GETDATE() AS DATE)",
                DefaultFunction::Uuid => "NEWID()",
            }
            .to_string(),
        )
    }

    /// Every statement is its own batch so views and triggers start one.
    fn terminate(&self, statement: String) -> String {
        format!("{};\nGO\n\n", statement)
    }

    fn render_trigger(&self, r: &Renderer<'_>, trigger: &Trigger) -> Result<String> {
        if matches!(trigger.timing, TriggerTiming::Before) {
            return Err(MapperError::unsupported(
                format!("BEFORE trigger {}", trigger.name),
                DialectKind::Sqlserver,
            ));
        }
        if trigger.condition.is_some() {
            return Err(MapperError::unsupported(
                format!("WHEN condition on trigger {}", trigger.name),
                DialectKind::Sqlserver,
            ));
        }
        if trigger.for_each_row {
            warn!(
                "Trigger {}: row-level trigger rendered as statement-level",
                trigger.name
            );
        }

        let events: Vec<&str> = trigger.events.iter().map(|e| e.as_sql()).collect();
        Ok(self.terminate(format!(
            "CREATE TRIGGER {} ON {}\n{} {}\nAS\n{}",
            r.ident(&trigger.name)?,
            r.ident(&trigger.table)?,
            trigger.timing.as_sql(),
            events.join(", "),
            trigger.body.trim().trim_end_matches(';').trim_end()
        )))
    }
}
