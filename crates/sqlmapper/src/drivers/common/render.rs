//! Shared DDL render engine.
//!
//! [`generate_script`] walks a schema in a fixed order (sequences, tables,
//! comments, indexes, views, triggers) and asks the dialect's
//! [`RenderHooks`] for every piece whose spelling differs. Output is built
//! in a `String` owned by the call.

use tracing::{debug, warn};

use crate::core::catalog::DriverCatalog;
use crate::core::identifier::{qualify, quote_identifier};
use crate::core::schema::{
    Column, Constraint, ConstraintKind, Index, ReferentialAction, Schema, Sequence, Table, Trigger,
    TriggerEvent, View,
};
use crate::core::traits::GenerateOptions;
use crate::core::value::{quote_string, strip_wrapping_parens, SqlValue};
use crate::dialect::{normalize_type_key, DialectDescriptor, DialectKind};
use crate::error::{MapperError, Result};

/// Identity spelling for one auto-increment column.
///
/// All fields empty means the dialect cannot express the identity here and
/// the column renders as a plain column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentitySql {
    /// Replacement for the mapped type (PostgreSQL `serial`).
    pub type_sql: Option<String>,
    /// Clause placed before NOT NULL.
    pub before_null: Option<String>,
    /// Clause placed after NOT NULL.
    pub after_null: Option<String>,
}

/// Where an index access method goes, if anywhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MethodPlacement {
    #[default]
    Omit,
    /// `ON t USING gin (cols)`
    BeforeColumns,
    /// `ON t (cols) USING BTREE`
    AfterColumns,
}

/// Optional index features a dialect can render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexSyntax {
    pub filter: bool,
    pub include: bool,
    pub method: MethodPlacement,
}

/// Well-known default functions with a spelling per dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultFunction {
    CurrentTimestamp,
    CurrentDate,
    Uuid,
}

impl DefaultFunction {
    /// Recognize a default expression, ignoring case and wrapping parens.
    pub fn recognize(expression: &str) -> Option<Self> {
        let key: String = strip_wrapping_parens(expression.trim())
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "current_timestamp" | "current_timestamp()" | "now()" | "getdate()" | "sysdate"
            | "systimestamp" | "localtimestamp" | "localtimestamp()" | "sysdatetime()"
            | "datetime('now')" | "transaction_timestamp()" => Some(Self::CurrentTimestamp),
            "current_date" | "curdate()" | "date('now')" | "trunc(sysdate)" => {
                Some(Self::CurrentDate)
            }
            "uuid()" | "gen_random_uuid()" | "uuid_generate_v4()" | "newid()" | "sys_guid()" => {
                Some(Self::Uuid)
            }
            _ => None,
        }
    }
}

/// Dialect-specific spelling consulted by the shared renderer.
pub trait RenderHooks: Send + Sync {
    /// Target dialect tag.
    fn kind(&self) -> DialectKind;

    /// Identity idiom for an auto-increment column with mapped type `type_sql`.
    fn identity(&self, table: &Table, column: &Column, type_sql: &str) -> IdentitySql;

    /// Whether the table's primary key is rendered inline on its column
    /// (and so skipped at table level).
    fn primary_key_inline(&self, _table: &Table) -> bool {
        false
    }

    /// Column-level character set clause, when the dialect has one.
    fn charset_clause(&self, _charset: &str) -> Option<String> {
        None
    }

    fn collate_clause(&self, collation: &str) -> String {
        format!("COLLATE {}", collation)
    }

    /// Inline column comment clause, when the dialect has one.
    fn column_comment(&self, _comment: &str) -> Option<String> {
        None
    }

    /// Text after the closing parenthesis of CREATE TABLE.
    fn table_suffix(&self, _r: &Renderer<'_>, _table: &Table) -> Result<String> {
        Ok(String::new())
    }

    /// Separate statements carrying table and column comments.
    fn comment_statements(&self, _r: &Renderer<'_>, table: &Table) -> Result<Vec<String>> {
        if table.comment.is_some() || table.columns.iter().any(|c| c.comment.is_some()) {
            debug!("Dropping comments on {}: no comment syntax", table.name);
        }
        Ok(Vec::new())
    }

    /// Rule to render for ON DELETE (`on_update == false`) or ON UPDATE.
    /// `None` drops the clause.
    fn referential_action(
        &self,
        action: ReferentialAction,
        _on_update: bool,
    ) -> Option<ReferentialAction> {
        Some(action)
    }

    fn index_syntax(&self) -> IndexSyntax {
        IndexSyntax::default()
    }

    /// Whether an access method such as `gin` exists here.
    fn index_method_supported(&self, _method: &str) -> bool {
        true
    }

    /// Spelling of a recognized default function, `None` if unavailable.
    fn default_function(&self, function: DefaultFunction) -> Option<String> {
        match function {
            DefaultFunction::CurrentTimestamp => Some("CURRENT_TIMESTAMP".to_string()),
            DefaultFunction::CurrentDate => Some("CURRENT_DATE".to_string()),
            DefaultFunction::Uuid => None,
        }
    }

    fn render_view(&self, r: &Renderer<'_>, view: &View) -> Result<String> {
        Ok(format!(
            "CREATE VIEW {}{} AS\n{}",
            r.object(view.schema.as_deref(), &view.name)?,
            r.optional_list(&view.columns)?,
            view.definition
        ))
    }

    /// Full trigger text, terminator included.
    fn render_trigger(&self, r: &Renderer<'_>, trigger: &Trigger) -> Result<String>;

    /// Append the statement terminator.
    fn terminate(&self, statement: String) -> String {
        format!("{};\n\n", statement)
    }
}

/// Per-call rendering context.
pub struct Renderer<'a> {
    pub catalog: &'a DriverCatalog,
    pub descriptor: &'a DialectDescriptor,
    pub options: &'a GenerateOptions,
    /// Dialect the schema was parsed from.
    pub source: DialectKind,
    pub hooks: &'a dyn RenderHooks,
}

impl<'a> Renderer<'a> {
    /// Target dialect tag.
    pub fn target(&self) -> DialectKind {
        self.descriptor.kind
    }

    pub fn ident(&self, name: &str) -> Result<String> {
        quote_identifier(name, self.descriptor, self.options.quote_identifiers)
    }

    /// Object name, schema-qualified when the options ask for it.
    pub fn object(&self, schema: Option<&str>, name: &str) -> Result<String> {
        let schema = schema.filter(|_| self.options.qualify_schema);
        qualify(schema, name, self.descriptor, self.options.quote_identifiers)
    }

    /// `a, b, c` with every name quoted as needed.
    pub fn list(&self, names: &[String]) -> Result<String> {
        let quoted: Result<Vec<String>> = names.iter().map(|n| self.ident(n)).collect();
        Ok(quoted?.join(", "))
    }

    /// ` (a, b)` or nothing for an empty list.
    pub fn optional_list(&self, names: &[String]) -> Result<String> {
        if names.is_empty() {
            Ok(String::new())
        } else {
            Ok(format!(" ({})", self.list(names)?))
        }
    }

    /// Target type for a column, logging lossy mappings.
    pub fn map_type(&self, table: &Table, column: &Column) -> Result<String> {
        let mapper = self.catalog.mapper(self.source, self.target())?;
        let mapping = mapper.map_type(&column.data_type);
        if mapping.is_lossy {
            warn!(
                "{}.{}: {}",
                table.name,
                column.name,
                mapping.warning.as_deref().unwrap_or("lossy type mapping")
            );
        }
        Ok(mapping.target_type)
    }

    /// Render a DEFAULT expression for the target.
    ///
    /// Same-dialect defaults are kept verbatim. Across dialects, wrapping
    /// parentheses and PostgreSQL casts are removed, known functions are
    /// respelled, and literals are re-encoded through the value registry
    /// when the type changes. Anything else passes through untouched.
    pub fn default_value(&self, table: &Table, column: &Column, target_type: &str) -> Option<String> {
        let text = column.default.as_deref()?;
        if self.source == self.target() {
            return Some(text.to_string());
        }

        let mut expression = strip_wrapping_parens(text.trim());
        if let Some(idx) = cast_position(expression) {
            let literal = strip_wrapping_parens(expression[..idx].trim());
            if SqlValue::from_literal(literal).is_some() {
                expression = literal;
            }
        }

        if let Some(function) = DefaultFunction::recognize(expression) {
            let spelled = self.hooks.default_function(function);
            if spelled.is_none() {
                warn!(
                    "{}.{}: default {} has no {} equivalent, dropped",
                    table.name,
                    column.name,
                    text,
                    self.target()
                );
            }
            return spelled;
        }

        let Some(value) = SqlValue::from_literal(expression) else {
            debug!("{}.{}: keeping default expression {}", table.name, column.name, text);
            return Some(expression.to_string());
        };

        let source_key = column.data_type.key();
        let target_key = normalize_type_key(target_type);
        let values = self.catalog.values();
        let converted = if normalize_type_key(&source_key) != target_key
            && values.has_mapping(&source_key, &target_key)
        {
            match values.convert_type(
                value.clone(),
                &source_key,
                &target_key,
                self.options.source_version.as_ref(),
                self.options.target_version.as_ref(),
            ) {
                Ok(converted) => converted,
                Err(e) => {
                    warn!("{}.{}: {}; keeping default as written", table.name, column.name, e);
                    value
                }
            }
        } else {
            value
        };
        Some(into_target_domain(converted, &target_key).to_literal(self.descriptor))
    }

    /// One column definition line.
    pub fn column(&self, table: &Table, column: &Column) -> Result<String> {
        let mapped = self.map_type(table, column)?;
        let identity = if column.auto_increment {
            let identity = self.hooks.identity(table, column, &mapped);
            if identity == IdentitySql::default() {
                warn!(
                    "{}.{}: auto-increment not expressible in {}, dropped",
                    table.name,
                    column.name,
                    self.target()
                );
            }
            identity
        } else {
            IdentitySql::default()
        };

        let type_sql = identity.type_sql.clone().unwrap_or_else(|| mapped.clone());
        let mut parts = vec![self.ident(&column.name)?, type_sql];

        if let Some(charset) = &column.charset {
            match self.hooks.charset_clause(charset) {
                Some(clause) if self.charset_supported(charset) => parts.push(clause),
                _ => warn!(
                    "{}.{}: character set {} not supported by {}, dropped",
                    table.name,
                    column.name,
                    charset,
                    self.target()
                ),
            }
        }
        if let Some(collation) = &column.collation {
            if self.collation_supported(collation) {
                parts.push(self.hooks.collate_clause(collation));
            } else {
                warn!(
                    "{}.{}: collation {} not supported by {}, dropped",
                    table.name,
                    column.name,
                    collation,
                    self.target()
                );
            }
        }

        if let Some(clause) = identity.before_null {
            parts.push(clause);
        }
        if !column.auto_increment {
            if let Some(default) = self.default_value(table, column, &mapped) {
                parts.push(format!("DEFAULT {}", default));
            }
        }
        if !column.is_nullable {
            parts.push("NOT NULL".to_string());
        }
        if let Some(clause) = identity.after_null {
            parts.push(clause);
        }
        if column.is_unique {
            parts.push("UNIQUE".to_string());
        }
        if let Some(clause) = column.comment.as_deref().and_then(|c| self.hooks.column_comment(c)) {
            parts.push(clause);
        }
        Ok(parts.join(" "))
    }

    /// One table-level constraint line.
    pub fn constraint(&self, table: &Table, constraint: &Constraint) -> Result<String> {
        let mut sql = match &constraint.name {
            Some(name) => format!("CONSTRAINT {} ", self.ident(name)?),
            None => String::new(),
        };
        match &constraint.kind {
            ConstraintKind::PrimaryKey => {
                sql.push_str(&format!("PRIMARY KEY ({})", self.list(&constraint.columns)?))
            }
            ConstraintKind::Unique => {
                sql.push_str(&format!("UNIQUE ({})", self.list(&constraint.columns)?))
            }
            ConstraintKind::Check(expression) => sql.push_str(&format!("CHECK ({})", expression)),
            ConstraintKind::ForeignKey(reference) => {
                sql.push_str(&format!(
                    "FOREIGN KEY ({}) REFERENCES {}{}",
                    self.list(&constraint.columns)?,
                    self.object(reference.schema.as_deref(), &reference.table)?,
                    self.optional_list(&reference.columns)?
                ));
                for (action, on_update) in [(reference.on_delete, false), (reference.on_update, true)] {
                    let Some(action) = action else { continue };
                    let keyword = if on_update { "ON UPDATE" } else { "ON DELETE" };
                    match self.hooks.referential_action(action, on_update) {
                        Some(rendered) => sql.push_str(&format!(" {} {}", keyword, rendered.as_sql())),
                        None if matches!(
                            action,
                            ReferentialAction::NoAction | ReferentialAction::Restrict
                        ) => {}
                        None => warn!(
                            "{}: {} {} not supported by {}, dropped",
                            table.name,
                            keyword,
                            action.as_sql(),
                            self.target()
                        ),
                    }
                }
            }
        }
        Ok(sql)
    }

    pub fn charset_supported(&self, charset: &str) -> bool {
        self.source == self.target() || self.catalog.charsets().is_supported(charset, self.target())
    }

    pub fn collation_supported(&self, collation: &str) -> bool {
        self.source == self.target()
            || self
                .catalog
                .collations()
                .is_supported(collation, self.target())
    }

    /// CREATE TABLE statement without terminator.
    pub fn table(&self, table: &Table) -> Result<String> {
        let mut lines = Vec::with_capacity(table.columns.len() + table.constraints.len());
        for column in &table.columns {
            lines.push(format!("    {}", self.column(table, column)?));
        }
        let inline_pk = self.hooks.primary_key_inline(table);
        for constraint in &table.constraints {
            if inline_pk && matches!(constraint.kind, ConstraintKind::PrimaryKey) {
                continue;
            }
            lines.push(format!("    {}", self.constraint(table, constraint)?));
        }
        Ok(format!(
            "CREATE TABLE {} (\n{}\n){}",
            self.object(table.schema.as_deref(), &table.name)?,
            lines.join(",\n"),
            self.hooks.table_suffix(self, table)?
        ))
    }

    /// CREATE INDEX statement without terminator.
    pub fn index(&self, table: &Table, index: &Index) -> Result<String> {
        let syntax = self.hooks.index_syntax();
        let key_part = |name: &String| -> Result<String> {
            if table.column(name).is_some() {
                self.ident(name)
            } else {
                Ok(name.clone())
            }
        };
        let columns: Result<Vec<String>> = index.columns.iter().map(key_part).collect();

        let mut sql = format!(
            "CREATE {}INDEX {} ON {}",
            if index.is_unique { "UNIQUE " } else { "" },
            self.ident(&index.name)?,
            self.object(table.schema.as_deref(), &table.name)?
        );
        let method = index
            .method
            .as_deref()
            .filter(|m| self.hooks.index_method_supported(m));
        if let (MethodPlacement::BeforeColumns, Some(method)) = (syntax.method, method) {
            sql.push_str(&format!(" USING {}", method));
        }
        sql.push_str(&format!(" ({})", columns?.join(", ")));
        if let (MethodPlacement::AfterColumns, Some(method)) = (syntax.method, method) {
            sql.push_str(&format!(" USING {}", method.to_uppercase()));
        }
        if let (Some(method), true) = (
            index.method.as_deref(),
            method.is_none() || syntax.method == MethodPlacement::Omit,
        ) {
            debug!("Dropping index method {} on {}", method, index.name);
        }

        if !index.include_columns.is_empty() {
            if syntax.include {
                sql.push_str(&format!(" INCLUDE ({})", self.list(&index.include_columns)?));
            } else {
                warn!(
                    "Index {}: INCLUDE columns not supported by {}, dropped",
                    index.name,
                    self.target()
                );
            }
        }
        if let Some(filter) = &index.filter {
            if syntax.filter {
                sql.push_str(&format!(" WHERE {}", filter));
            } else {
                warn!(
                    "Index {}: partial index filter not supported by {}, dropped",
                    index.name,
                    self.target()
                );
            }
        }
        Ok(sql)
    }

    /// CREATE SEQUENCE statement without terminator.
    pub fn sequence(&self, sequence: &Sequence) -> Result<String> {
        if !self.descriptor.supports_sequences {
            return Err(MapperError::unsupported(
                format!("CREATE SEQUENCE {}", sequence.name),
                self.target(),
            ));
        }
        let mut sql = format!(
            "CREATE SEQUENCE {} START WITH {} INCREMENT BY {}",
            self.object(sequence.schema.as_deref(), &sequence.name)?,
            sequence.start,
            sequence.increment
        );
        if let Some(min) = sequence.min_value {
            sql.push_str(&format!(" MINVALUE {}", min));
        }
        if let Some(max) = sequence.max_value {
            sql.push_str(&format!(" MAXVALUE {}", max));
        }
        if sequence.cycle {
            sql.push_str(" CYCLE");
        }
        Ok(sql)
    }
}

/// Integer flags become booleans when the target column is a native
/// boolean. MySQL `BOOL` and SQLite `BOOLEAN` keep `0`/`1` defaults under
/// the same type key as PostgreSQL `boolean`.
fn into_target_domain(value: SqlValue, target_key: &str) -> SqlValue {
    let base = target_key.split('(').next().unwrap_or(target_key).trim();
    match value {
        SqlValue::Integer(n) if matches!(base, "boolean" | "bool") => SqlValue::Boolean(n != 0),
        other => other,
    }
}

/// Byte offset of a top-level `::` cast outside string literals.
fn cast_position(expression: &str) -> Option<usize> {
    let bytes = expression.as_bytes();
    let mut in_string = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\'' => in_string = !in_string,
            b':' if !in_string && bytes.get(i + 1) == Some(&b':') => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

/// `COMMENT ON TABLE` / `COMMENT ON COLUMN` statements for a table.
pub fn comment_on_statements(r: &Renderer<'_>, table: &Table) -> Result<Vec<String>> {
    let name = r.object(table.schema.as_deref(), &table.name)?;
    let mut statements = Vec::new();
    if let Some(comment) = &table.comment {
        statements.push(format!("COMMENT ON TABLE {} IS {}", name, quote_string(comment)));
    }
    for column in &table.columns {
        if let Some(comment) = &column.comment {
            statements.push(format!(
                "COMMENT ON COLUMN {}.{} IS {}",
                name,
                r.ident(&column.name)?,
                quote_string(comment)
            ));
        }
    }
    Ok(statements)
}

/// Whether a trigger body is already a `BEGIN`/`DECLARE` block.
pub fn body_is_block(body: &str) -> bool {
    let head: String = body
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    head.eq_ignore_ascii_case("BEGIN") || head.eq_ignore_ascii_case("DECLARE")
}

/// The single event of a row-level trigger, for dialects that allow no more.
pub fn single_row_event(trigger: &Trigger, target: DialectKind) -> Result<TriggerEvent> {
    if !trigger.for_each_row {
        return Err(MapperError::unsupported(
            format!("statement-level trigger {}", trigger.name),
            target,
        ));
    }
    match trigger.events.as_slice() {
        [event] => Ok(*event),
        _ => Err(MapperError::unsupported(
            format!("trigger {} with several events", trigger.name),
            target,
        )),
    }
}

/// Render a whole schema.
///
/// # Errors
///
/// `NilSchema` when `schema` is `None`; otherwise the first error from any
/// object. Nothing is returned on failure.
pub fn generate_script(
    hooks: &dyn RenderHooks,
    catalog: &DriverCatalog,
    descriptor: &DialectDescriptor,
    options: &GenerateOptions,
    schema: Option<&Schema>,
) -> Result<String> {
    let schema = schema.ok_or(MapperError::NilSchema)?;
    let r = Renderer {
        catalog,
        descriptor,
        options,
        source: schema.dialect.unwrap_or(descriptor.kind),
        hooks,
    };

    let mut out = String::new();
    for sequence in &schema.sequences {
        out.push_str(&hooks.terminate(r.sequence(sequence)?));
    }
    for table in &schema.tables {
        table.validate()?;
        out.push_str(&hooks.terminate(r.table(table)?));
        for statement in hooks.comment_statements(&r, table)? {
            out.push_str(&hooks.terminate(statement));
        }
    }
    for table in &schema.tables {
        for index in &table.indexes {
            out.push_str(&hooks.terminate(r.index(table, index)?));
        }
    }
    for view in &schema.views {
        out.push_str(&hooks.terminate(hooks.render_view(&r, view)?));
    }
    for trigger in &schema.triggers {
        out.push_str(&hooks.render_trigger(&r, trigger)?);
    }

    let trimmed = out.trim_end().len();
    out.truncate(trimmed);
    if !out.is_empty() {
        out.push('\n');
    }
    Ok(out)
}
