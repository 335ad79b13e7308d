//! Oracle parse hooks.

use crate::core::schema::Column;
use crate::ddl::Cursor;
use crate::dialect::DialectKind;
use crate::drivers::common::parse::{read_default, read_generated_identity};
use crate::drivers::common::ParseHooks;
use crate::error::Result;

/// Oracle syntax on top of the shared parse engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleParser;

impl ParseHooks for OracleParser {
    fn kind(&self) -> DialectKind {
        DialectKind::Oracle
    }

    fn column_modifier(&self, cur: &mut Cursor<'_>, column: &mut Column) -> Result<bool> {
        if read_generated_identity(cur, column)? {
            return Ok(true);
        }
        if cur.eat_kws(&["DEFAULT", "ON", "NULL"]) {
            column.default = read_default(cur)?;
            return Ok(true);
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::{ReferentialAction, Schema, TriggerEvent};
    use crate::drivers::common::parse_script;

    fn parse(sql: &str) -> Schema {
        parse_script(&OracleParser, sql).unwrap()
    }

    #[test]
    fn test_export_style_table() {
        let schema = parse(
            "CREATE TABLE \"HR\".\"EMPLOYEES\"\n\
             (\t\"ID\" NUMBER(10,0) GENERATED BY DEFAULT ON NULL AS IDENTITY MINVALUE 1 MAXVALUE 9999999999 NOT NULL ENABLE,\n\
             \t\"NAME\" VARCHAR2(100 BYTE) NOT NULL ENABLE,\n\
             \t\"HIRED\" DATE DEFAULT SYSDATE,\n\
             \t\"DEPT_ID\" NUMBER(10,0),\n\
             \t CONSTRAINT \"EMP_PK\" PRIMARY KEY (\"ID\")\n\
               USING INDEX PCTFREE 10 TABLESPACE \"USERS\"  ENABLE,\n\
             \t CONSTRAINT \"EMP_DEPT_FK\" FOREIGN KEY (\"DEPT_ID\")\n\
               REFERENCES \"HR\".\"DEPARTMENTS\" (\"ID\") ON DELETE SET NULL ENABLE\n\
             ) SEGMENT CREATION IMMEDIATE TABLESPACE \"USERS\";",
        );
        let table = &schema.tables[0];
        assert_eq!(table.schema.as_deref(), Some("HR"));
        assert_eq!(table.name, "EMPLOYEES");

        let id = table.column("ID").unwrap();
        assert!(id.auto_increment);
        assert!(!id.is_nullable);

        let name = table.column("NAME").unwrap();
        assert_eq!(name.data_type.name, "varchar2");
        assert_eq!(name.data_type.length, Some(100));

        assert_eq!(table.column("HIRED").unwrap().default.as_deref(), Some("SYSDATE"));
        assert_eq!(table.primary_key_columns().to_vec(), vec!["ID".to_string()]);

        let fk = table
            .constraints
            .iter()
            .find(|c| c.name.as_deref() == Some("EMP_DEPT_FK"))
            .unwrap();
        match &fk.kind {
            crate::core::schema::ConstraintKind::ForeignKey(reference) => {
                assert_eq!(reference.table, "DEPARTMENTS");
                assert_eq!(reference.on_delete, Some(ReferentialAction::SetNull));
            }
            other => panic!("expected foreign key, got {:?}", other),
        }
    }

    #[test]
    fn test_default_on_null() {
        let schema = parse("CREATE TABLE t (status VARCHAR2(10) DEFAULT ON NULL 'new' NOT NULL);");
        let status = &schema.tables[0].columns[0];
        assert_eq!(status.default.as_deref(), Some("'new'"));
        assert!(!status.is_nullable);
    }

    #[test]
    fn test_plsql_trigger_with_slash() {
        let schema = parse(
            "CREATE TABLE t (id NUMBER(10), changed DATE);\n\
             CREATE OR REPLACE TRIGGER t_biu\n\
             BEFORE INSERT OR UPDATE ON t\n\
             FOR EACH ROW\n\
             BEGIN\n  :NEW.changed := SYSDATE;\nEND;\n\
             /\n",
        );
        let trigger = &schema.triggers[0];
        assert_eq!(trigger.events, vec![TriggerEvent::Insert, TriggerEvent::Update]);
        assert!(trigger.for_each_row);
        assert!(trigger.body.starts_with("BEGIN"));
        assert!(trigger.body.contains(":NEW.changed := SYSDATE;"));
    }
}
