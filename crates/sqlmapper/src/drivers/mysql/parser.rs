//! MySQL parse hooks.

use tracing::{debug, warn};

use crate::core::schema::{Column, Index, Table};
use crate::ddl::{name_list, Cursor, TokenKind};
use crate::dialect::DialectKind;
use crate::drivers::common::parse::{default_index_name, eat_any, name_or_string, read_default};
use crate::drivers::common::ParseHooks;
use crate::error::Result;

/// MySQL syntax on top of the shared parse engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlParser;

impl MysqlParser {
    /// `KEY name (cols)` rather than a column called `key`.
    fn starts_index(cur: &Cursor<'_>, offset: usize) -> bool {
        let names_columns = |i: usize| {
            cur.peek_at(i)
                .and_then(|t| t.group())
                .and_then(|inner| inner.first())
                .is_some_and(|t| matches!(t.kind, TokenKind::Word | TokenKind::QuotedIdent))
        };
        names_columns(offset)
            || names_columns(offset + 1)
            || cur.peek_at(offset + 1).is_some_and(|t| t.is_kw("USING"))
    }
}

impl ParseHooks for MysqlParser {
    fn kind(&self) -> DialectKind {
        DialectKind::Mysql
    }

    fn column_modifier(&self, cur: &mut Cursor<'_>, column: &mut Column) -> Result<bool> {
        if cur.eat_kw("AUTO_INCREMENT") {
            column.auto_increment = true;
        } else if cur.eat_kws(&["CHARACTER", "SET"]) || cur.eat_kw("CHARSET") {
            column.charset = Some(name_or_string(cur)?);
        } else if cur.eat_kw("COMMENT") {
            column.comment = Some(name_or_string(cur)?);
        } else if cur.eat_kws(&["ON", "UPDATE"]) {
            let expression = read_default(cur)?;
            debug!(
                "Dropping ON UPDATE {} on {}",
                expression.unwrap_or_default(),
                column.name
            );
        } else if cur.eat_kws(&["SERIAL", "DEFAULT", "VALUE"]) {
            column.auto_increment = true;
            column.is_nullable = false;
            column.is_unique = true;
        } else if cur.eat_kw("COLUMN_FORMAT") || cur.eat_kw("STORAGE") || cur.eat_kw("SRID") {
            cur.next();
        } else {
            return Ok(false);
        }
        Ok(true)
    }

    /// `SERIAL` is `BIGINT UNSIGNED NOT NULL AUTO_INCREMENT UNIQUE`.
    fn finish_column(&self, column: &mut Column) {
        if column.data_type.name == "serial" {
            column.data_type.name = "bigint".to_string();
            column.data_type.unsigned = true;
            column.auto_increment = true;
            column.is_nullable = false;
            column.is_unique = true;
        }
    }

    fn table_element(&self, cur: &mut Cursor<'_>, table: &mut Table) -> Result<bool> {
        let special = cur.peek_kw("FULLTEXT") || cur.peek_kw("SPATIAL");
        let plain = (cur.peek_kw("KEY") || cur.peek_kw("INDEX")) && Self::starts_index(cur, 1);
        if !special && !plain {
            return Ok(false);
        }

        if special {
            let kind = cur.next().map(|t| t.upper()).unwrap_or_default();
            warn!("{} index on {} kept as a plain index", kind, table.name);
        }
        eat_any(cur, &["KEY", "INDEX"]);

        let name = match cur.peek() {
            Some(t) if t.group().is_none() && !t.is_kw("USING") => Some(cur.ident()?),
            _ => None,
        };
        let mut method = None;
        if cur.eat_kw("USING") {
            method = Some(cur.ident()?.to_lowercase());
        }
        let group = cur.expect_group("index columns")?;
        let columns = name_list(cur.source(), group)?;
        if cur.eat_kw("USING") {
            method = Some(cur.ident()?.to_lowercase());
        }
        cur.skip_rest();

        table.indexes.push(Index {
            name: name.unwrap_or_else(|| default_index_name(&table.name, &columns)),
            table: table.name.clone(),
            columns,
            method,
            ..Index::default()
        });
        Ok(true)
    }

    fn table_options(&self, cur: &mut Cursor<'_>, table: &mut Table) -> Result<()> {
        while !cur.is_done() {
            cur.eat_kw("DEFAULT");
            if cur.eat_kws(&["CHARACTER", "SET"]) || cur.eat_kw("CHARSET") {
                cur.eat_symbol("=");
                table.charset = Some(name_or_string(cur)?);
            } else if cur.eat_kw("COLLATE") {
                cur.eat_symbol("=");
                table.collation = Some(name_or_string(cur)?);
            } else if cur.eat_kw("COMMENT") {
                cur.eat_symbol("=");
                table.comment = Some(name_or_string(cur)?);
            } else {
                cur.next();
            }
        }
        Ok(())
    }
}
