//! SQL Server parse hooks.

use crate::core::schema::{Column, Identity, Trigger, TriggerTiming};
use crate::ddl::Cursor;
use crate::dialect::DialectKind;
use crate::drivers::common::parse::{signed_number, trigger_events};
use crate::drivers::common::ParseHooks;
use crate::error::Result;

/// SQL Server syntax on top of the shared parse engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct MssqlParser;

impl ParseHooks for MssqlParser {
    fn kind(&self) -> DialectKind {
        DialectKind::Sqlserver
    }

    fn column_modifier(&self, cur: &mut Cursor<'_>, column: &mut Column) -> Result<bool> {
        if cur.eat_kws(&["NOT", "FOR", "REPLICATION"]) {
            return Ok(true);
        }
        if !cur.eat_kw("IDENTITY") {
            return Ok(false);
        }

        column.auto_increment = true;
        if let Some(group) = cur.group() {
            let inner = group.group().unwrap_or_default();
            let mut args = Cursor::new(inner, cur.source());
            let start = signed_number(&mut args)?;
            let increment = if args.eat_symbol(",") {
                signed_number(&mut args)?
            } else {
                None
            };
            let identity = Identity {
                start: start.unwrap_or(1),
                increment: increment.unwrap_or(1),
            };
            // IDENTITY(1,1) is the plain auto-increment idiom.
            if identity != Identity::default() {
                column.identity = Some(identity);
            }
        }
        Ok(true)
    }

    /// `ON t [WITH ...] {FOR | AFTER | INSTEAD OF} ev, ev [NOT FOR REPLICATION] AS body`.
    ///
    /// SQL Server triggers fire once per statement.
    fn parse_trigger(&self, cur: &mut Cursor<'_>, name: String) -> Result<Trigger> {
        cur.expect_kw("ON")?;
        let table = cur.object_name()?.name;
        if cur.eat_kw("WITH") {
            cur.take_until_kw(&["FOR", "AFTER", "INSTEAD"]);
        }

        let timing = if cur.eat_kw("FOR") || cur.eat_kw("AFTER") {
            TriggerTiming::After
        } else if cur.eat_kws(&["INSTEAD", "OF"]) {
            TriggerTiming::InsteadOf
        } else {
            return Err(cur.malformed("expected FOR, AFTER or INSTEAD OF"));
        };
        let events = trigger_events(cur)?;
        cur.eat_kws(&["WITH", "APPEND"]);
        cur.eat_kws(&["NOT", "FOR", "REPLICATION"]);
        cur.expect_kw("AS")?;

        let body = cur.tail_text();
        if body.is_empty() {
            return Err(cur.malformed("trigger has no body"));
        }
        Ok(Trigger {
            name,
            table,
            timing,
            events,
            for_each_row: false,
            condition: None,
            body: body.to_string(),
        })
    }
}
