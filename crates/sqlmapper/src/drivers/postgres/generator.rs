//! PostgreSQL render hooks.

use crate::core::schema::{Column, Table, Trigger, TriggerTiming};
use crate::dialect::DialectKind;
use crate::drivers::common::{
    body_is_block, comment_on_statements, DefaultFunction, IdentitySql, IndexSyntax,
    MethodPlacement, RenderHooks, Renderer,
};
use crate::error::Result;

/// PostgreSQL spelling for the shared render engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresGenerator;

impl RenderHooks for PostgresGenerator {
    fn kind(&self) -> DialectKind {
        DialectKind::Postgres
    }

    fn identity(&self, _table: &Table, column: &Column, type_sql: &str) -> IdentitySql {
        if let Some(identity) = column.identity {
            return IdentitySql {
                before_null: Some(format!(
                    "GENERATED BY DEFAULT AS IDENTITY (START WITH {} INCREMENT BY {})",
                    identity.start, identity.increment
                )),
                ..IdentitySql::default()
            };
        }
        let serial = match type_sql.to_ascii_lowercase().as_str() {
            "integer" | "int" | "int4" => "serial",
            "bigint" | "int8" => "bigserial",
            "smallint" | "int2" => "smallserial",
            _ => {
                return IdentitySql {
                    before_null: Some("GENERATED BY DEFAULT AS IDENTITY".to_string()),
                    ..IdentitySql::default()
                }
            }
        };
        IdentitySql {
            type_sql: Some(serial.to_string()),
            ..IdentitySql::default()
        }
    }

    fn collate_clause(&self, collation: &str) -> String {
        format!("COLLATE \"{}\"", collation.replace('"', "\"\""))
    }

    fn comment_statements(&self, r: &Renderer<'_>, table: &Table) -> Result<Vec<String>> {
        comment_on_statements(r, table)
    }

    fn index_syntax(&self) -> IndexSyntax {
        IndexSyntax {
            filter: true,
            include: true,
            method: MethodPlacement::BeforeColumns,
        }
    }

    fn default_function(&self, function: DefaultFunction) -> Option<String> {
        Some(
            match function {
                DefaultFunction::CurrentTimestamp => "CURRENT_TIMESTAMP",
                DefaultFunction::CurrentDate => "CURRENT_DATE",
                DefaultFunction::Uuid => "gen_random_uuid()",
            }
            .to_string(),
        )
    }

    /// Bodies that already call a function are used as-is; any other body
    /// becomes a plpgsql trigger function named after the trigger.
    fn render_trigger(&self, r: &Renderer<'_>, trigger: &Trigger) -> Result<String> {
        let events: Vec<&str> = trigger.events.iter().map(|e| e.as_sql()).collect();
        let level = if trigger.for_each_row { "ROW" } else { "STATEMENT" };
        let mut header = format!(
            "CREATE TRIGGER {} {} {} ON {}\nFOR EACH {}",
            r.ident(&trigger.name)?,
            trigger.timing.as_sql(),
            events.join(" OR "),
            r.ident(&trigger.table)?,
            level
        );
        if let Some(condition) = &trigger.condition {
            header.push_str(&format!("\nWHEN ({})", condition));
        }

        let body = trigger.body.trim();
        let upper = body.to_ascii_uppercase();
        if upper.starts_with("EXECUTE FUNCTION") || upper.starts_with("EXECUTE PROCEDURE") {
            return Ok(self.terminate(format!("{}\n{}", header, body)));
        }

        let function = r.ident(&format!("{}_fn", trigger.name))?;
        let block = if body_is_block(body) {
            let mut block = body.to_string();
            if !block.ends_with(';') {
                block.push(';');
            }
            block
        } else {
            let returns = match (trigger.for_each_row, trigger.timing) {
                (true, TriggerTiming::After) | (false, _) => "NULL",
                (true, _) => "NEW",
            };
            let statement = body.trim_end_matches(';');
            format!("BEGIN\n    {};\n    RETURN {};\nEND;", statement, returns)
        };

        Ok(format!(
            "CREATE OR REPLACE FUNCTION {}() RETURNS trigger AS $$\n{}\n$$ LANGUAGE plpgsql;\n\n{}",
            function,
            block,
            self.terminate(format!("{}\nEXECUTE FUNCTION {}()", header, function))
        ))
    }
}
