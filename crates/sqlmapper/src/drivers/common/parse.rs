//! Shared DDL parse engine.
//!
//! Every dialect parser runs the same statement loop and the same CREATE
//! TABLE walk. Dialect syntax plugs in through [`ParseHooks`]: type
//! spellings, identity keywords, table options and trigger headers.

use tracing::{debug, warn};

use crate::core::schema::{
    Column, Constraint, ConstraintKind, DataType, ForeignKeyRef, Identity, Index,
    ReferentialAction, Schema, Sequence, Table, Trigger, TriggerEvent, TriggerTiming, View,
};
use crate::ddl::{
    classify, comma_items, group_body, name_list, span_text, split_statements, tokenize, Cursor,
    ScanOptions,
    StatementKind, Token, TokenKind,
};
use crate::dialect::DialectKind;
use crate::error::{MapperError, Result};

/// Words that end a DEFAULT expression after a cast.
const DEFAULT_STOPS: &[&str] = &[
    "NOT",
    "NULL",
    "PRIMARY",
    "UNIQUE",
    "CHECK",
    "REFERENCES",
    "CONSTRAINT",
    "COLLATE",
    "AUTO_INCREMENT",
    "AUTOINCREMENT",
    "IDENTITY",
    "GENERATED",
    "COMMENT",
    "ON",
    "CHARACTER",
    "CHARSET",
    "ENABLE",
    "DISABLE",
];

/// Words that can follow a column name when SQLite omits the type.
const MODIFIER_STARTS: &[&str] = &[
    "NOT",
    "NULL",
    "DEFAULT",
    "PRIMARY",
    "UNIQUE",
    "CHECK",
    "REFERENCES",
    "CONSTRAINT",
    "COLLATE",
    "GENERATED",
];

/// Types whose single parameter is a precision rather than a length.
const PRECISION_TYPES: &[&str] = &[
    "decimal",
    "numeric",
    "number",
    "dec",
    "fixed",
    "float",
    "double",
    "double precision",
    "real",
    "time",
    "timestamp",
    "timestamptz",
    "timetz",
    "datetime",
    "datetime2",
    "datetimeoffset",
];

/// Dialect-specific syntax consulted by the shared engine.
///
/// Every method has a default that covers the standard SQL spelling, so a
/// dialect overrides only what it spells differently.
pub trait ParseHooks: Send + Sync {
    /// Dialect tag stamped on the parsed schema.
    fn kind(&self) -> DialectKind;

    /// Lexical rules for this dialect.
    fn scan_options(&self) -> ScanOptions {
        ScanOptions::for_dialect(self.kind())
    }

    /// Type given to a column declared without one, if the dialect allows it.
    fn typeless_column(&self) -> Option<DataType> {
        None
    }

    /// Read a column type at the cursor.
    fn read_type(&self, cur: &mut Cursor<'_>) -> Result<DataType> {
        read_data_type(cur)
    }

    /// Consume one dialect-specific column modifier.
    ///
    /// Returns `Ok(false)` when the next token is not one, leaving the
    /// cursor untouched.
    fn column_modifier(&self, _cur: &mut Cursor<'_>, _column: &mut Column) -> Result<bool> {
        Ok(false)
    }

    /// Adjust a fully parsed column (serial types, sequence defaults).
    fn finish_column(&self, _column: &mut Column) {}

    /// Consume a table-body entry that is neither a column nor a standard
    /// constraint, such as MySQL `KEY idx (a)`.
    fn table_element(&self, _cur: &mut Cursor<'_>, _table: &mut Table) -> Result<bool> {
        Ok(false)
    }

    /// Options after the closing parenthesis of CREATE TABLE.
    fn table_options(&self, cur: &mut Cursor<'_>, _table: &mut Table) -> Result<()> {
        cur.skip_rest();
        Ok(())
    }

    /// Whether triggers without `FOR EACH` are row-level.
    fn row_triggers_by_default(&self) -> bool {
        false
    }

    /// Parse a trigger from just after its name.
    fn parse_trigger(&self, cur: &mut Cursor<'_>, name: String) -> Result<Trigger> {
        parse_standard_trigger(cur, name, self.row_triggers_by_default())
    }
}

// =============================================================================
// Statement loop
// =============================================================================

/// Parse a DDL script into a schema.
///
/// # Errors
///
/// `EmptyInput` when the script has no statements, otherwise the first
/// error raised by any statement. No partial schema is returned.
pub fn parse_script(hooks: &dyn ParseHooks, text: &str) -> Result<Schema> {
    let opts = hooks.scan_options();
    let statements = split_statements(text, &opts)?;
    let mut schema = Schema::new(hooks.kind());

    for statement in statements {
        let tokens = tokenize(statement, &opts)?;
        let kind = classify(&tokens);
        debug!("{:?}: {}", kind, abbreviate(statement));
        let mut cur = Cursor::new(&tokens, statement);

        match kind {
            StatementKind::CreateTable => {
                let table = parse_create_table(hooks, &mut cur)?;
                if schema.table(&table.name).is_some() {
                    return Err(MapperError::malformed(
                        statement,
                        format!("table '{}' is defined twice", table.name),
                    ));
                }
                schema.tables.push(table);
            }
            StatementKind::CreateIndex => {
                let index = parse_create_index(&mut cur)?;
                match schema.table_mut(&index.table) {
                    Some(table) => table.indexes.push(index),
                    None => warn!(
                        "Skipping index {} on unknown table {}",
                        index.name, index.table
                    ),
                }
            }
            StatementKind::CreateView => schema.views.push(parse_create_view(&mut cur)?),
            StatementKind::CreateTrigger => {
                cur.take_until_kw(&["TRIGGER"]);
                cur.expect_kw("TRIGGER")?;
                cur.eat_if_exists();
                let name = cur.object_name()?.name;
                schema.triggers.push(hooks.parse_trigger(&mut cur, name)?);
            }
            StatementKind::CreateSequence => {
                schema.sequences.push(parse_create_sequence(&mut cur)?)
            }
            StatementKind::AlterTable => apply_alter_table(hooks, &mut cur, &mut schema)?,
            StatementKind::CommentOn => apply_comment(&mut cur, &mut schema)?,
            StatementKind::Other => debug!("Skipping statement: {}", abbreviate(statement)),
        }
    }

    for table in &mut schema.tables {
        let pk: Vec<String> = table.primary_key_columns().to_vec();
        for name in &pk {
            if let Some(column) = table.column_mut(name) {
                column.is_nullable = false;
            }
        }
        table.validate()?;
    }

    Ok(schema)
}

fn abbreviate(statement: &str) -> String {
    let flat: String = statement.split_whitespace().collect::<Vec<_>>().join(" ");
    match flat.char_indices().nth(60) {
        Some((idx, _)) => format!("{}...", &flat[..idx]),
        None => flat,
    }
}

// =============================================================================
// CREATE TABLE
// =============================================================================

fn parse_create_table(hooks: &dyn ParseHooks, cur: &mut Cursor<'_>) -> Result<Table> {
    cur.take_until_kw(&["TABLE"]);
    cur.expect_kw("TABLE")?;
    cur.eat_if_exists();
    let name = cur.object_name()?;

    if cur.peek_kw("AS") || cur.peek_kw("LIKE") || cur.peek_kws(&["PARTITION", "OF"]) {
        return Err(MapperError::unsupported(
            format!("CREATE TABLE {} without a column list", name.name),
            hooks.kind(),
        ));
    }

    let body = cur.expect_group("table body")?;
    let mut table = Table::new(name.name);
    table.schema = name.schema;

    let inner = body.group().unwrap_or_default();
    for element in comma_items(inner) {
        let mut element_cur = Cursor::new(element, cur.source());
        if element_cur.is_done() {
            return Err(cur.malformed("empty table element"));
        }
        parse_table_element(hooks, &mut element_cur, &mut table)?;
    }

    if cur.peek_kw("AS") {
        return Err(MapperError::unsupported(
            format!("CREATE TABLE {} ... AS SELECT", table.name),
            hooks.kind(),
        ));
    }
    hooks.table_options(cur, &mut table)?;

    if table.columns.is_empty() {
        return Err(MapperError::malformed(
            cur.source(),
            format!("table '{}' has no columns", table.name),
        ));
    }
    Ok(table)
}

/// Parse one comma-separated entry of a table body (or an ALTER TABLE ADD).
pub fn parse_table_element(
    hooks: &dyn ParseHooks,
    cur: &mut Cursor<'_>,
    table: &mut Table,
) -> Result<()> {
    if hooks.table_element(cur, table)? {
        return Ok(());
    }
    if let Some(constraint) = parse_table_constraint(cur)? {
        return add_constraint(cur, table, constraint);
    }
    let column = parse_column(hooks, cur, table)?;
    table.columns.push(column);
    Ok(())
}

fn add_constraint(cur: &Cursor<'_>, table: &mut Table, constraint: Constraint) -> Result<()> {
    if matches!(constraint.kind, ConstraintKind::PrimaryKey) && table.primary_key().is_some() {
        return Err(MapperError::malformed(
            cur.source(),
            format!("table '{}' declares more than one primary key", table.name),
        ));
    }
    table.constraints.push(constraint);
    Ok(())
}

/// Parse a table-level constraint, or return `None` when the entry is not one.
pub fn parse_table_constraint(cur: &mut Cursor<'_>) -> Result<Option<Constraint>> {
    let name = if cur.peek_kw("CONSTRAINT")
        && cur.peek_at(1).is_some_and(|t| t.name().is_some())
        && !cur.peek_at(2).is_some_and(|t| t.is_kw("DEFAULT"))
    {
        cur.next();
        Some(cur.ident()?)
    } else {
        None
    };

    let constraint = if cur.eat_kws(&["PRIMARY", "KEY"]) {
        let columns = key_columns(cur, "primary key columns")?;
        Constraint::primary_key(columns)
    } else if cur.eat_kws(&["FOREIGN", "KEY"]) {
        let columns = key_columns(cur, "foreign key columns")?;
        cur.expect_kw("REFERENCES")?;
        let reference = parse_references(cur)?;
        Constraint::foreign_key(columns, reference)
    } else if cur.peek_kw("UNIQUE") && name_is_followed_by_group(cur) {
        cur.next();
        let columns = key_columns(cur, "unique columns")?;
        Constraint::unique(columns)
    } else if cur.peek_kw("CHECK") && cur.peek_at(1).is_some_and(|t| t.group().is_some()) {
        cur.next();
        let group = cur.expect_group("CHECK expression")?;
        Constraint::check(group_body(cur.source(), group).trim())
    } else if name.is_some() {
        return Err(cur.malformed("expected constraint type"));
    } else {
        return Ok(None);
    };

    // Trailing options: ENABLE, NOT DEFERRABLE, USING INDEX ..., ON [PRIMARY]
    cur.skip_rest();
    Ok(Some(constraint.named(name)))
}

/// `UNIQUE [KEY|INDEX] [name] (cols)` as opposed to a column named `unique`.
fn name_is_followed_by_group(cur: &Cursor<'_>) -> bool {
    (1..5).any(|i| cur.peek_at(i).is_some_and(|t| t.group().is_some()))
}

/// Skip index keywords and an optional name, then read the column group.
fn key_columns(cur: &mut Cursor<'_>, what: &str) -> Result<Vec<String>> {
    while cur.peek().is_some_and(|t| t.group().is_none()) {
        cur.next();
    }
    let group = cur.expect_group(what)?;
    name_list(cur.source(), group)
}

/// Parse the part after `REFERENCES`.
pub fn parse_references(cur: &mut Cursor<'_>) -> Result<ForeignKeyRef> {
    let target = cur.object_name()?;
    let columns = match cur.group() {
        Some(group) => name_list(cur.source(), group)?,
        None => Vec::new(),
    };
    let mut reference = ForeignKeyRef {
        table: target.name,
        schema: target.schema,
        columns,
        on_delete: None,
        on_update: None,
    };

    loop {
        if cur.eat_kws(&["ON", "DELETE"]) {
            reference.on_delete = Some(read_action(cur)?);
        } else if cur.eat_kws(&["ON", "UPDATE"]) {
            reference.on_update = Some(read_action(cur)?);
        } else if cur.eat_kw("MATCH") {
            cur.next();
        } else {
            break;
        }
    }
    Ok(reference)
}

fn read_action(cur: &mut Cursor<'_>) -> Result<ReferentialAction> {
    for words in [&["SET", "NULL"][..], &["SET", "DEFAULT"], &["NO", "ACTION"]] {
        if cur.eat_kws(words) {
            return ReferentialAction::from_keywords(&words.join(" "))
                .ok_or_else(|| cur.malformed("unknown referential action"));
        }
    }
    match cur.peek().filter(|t| t.is_word()) {
        Some(token) => {
            let action = ReferentialAction::from_keywords(&token.value)
                .ok_or_else(|| cur.malformed("unknown referential action"))?;
            cur.next();
            Ok(action)
        }
        None => Err(cur.malformed("expected referential action")),
    }
}

// =============================================================================
// Columns
// =============================================================================

fn parse_column(hooks: &dyn ParseHooks, cur: &mut Cursor<'_>, table: &mut Table) -> Result<Column> {
    let name = cur.ident()?;

    if cur.peek_kw("AS") {
        return Err(MapperError::unsupported(
            format!("computed column '{}'", name),
            hooks.kind(),
        ));
    }

    let data_type = if cur.is_done() || MODIFIER_STARTS.iter().any(|kw| cur.peek_kw(kw)) {
        hooks
            .typeless_column()
            .ok_or_else(|| cur.malformed(format!("column '{}' has no type", name)))?
    } else {
        hooks.read_type(cur)?
    };

    let mut column = Column::new(name, data_type);
    let mut constraint_name: Option<String> = None;

    while !cur.is_done() {
        if hooks.column_modifier(cur, &mut column)? {
            continue;
        }

        if cur.eat_kws(&["NOT", "NULL"]) {
            column.is_nullable = false;
            skip_conflict_clause(cur);
        } else if cur.eat_kw("NULL") {
            column.is_nullable = true;
        } else if cur.eat_kw("DEFAULT") {
            // A name before DEFAULT belongs to the default (SQL Server).
            constraint_name = None;
            column.default = read_default(cur)?;
        } else if cur.eat_kw("CONSTRAINT") {
            constraint_name = Some(cur.ident()?);
        } else if cur.eat_kws(&["PRIMARY", "KEY"]) {
            eat_any(cur, &["ASC", "DESC"]);
            eat_any(cur, &["CLUSTERED", "NONCLUSTERED"]);
            skip_conflict_clause(cur);
            let pk = Constraint::primary_key(vec![column.name.clone()]).named(constraint_name.take());
            add_constraint(cur, table, pk)?;
            column.is_nullable = false;
        } else if cur.eat_kw("UNIQUE") {
            cur.eat_kw("KEY");
            eat_any(cur, &["CLUSTERED", "NONCLUSTERED"]);
            skip_conflict_clause(cur);
            match constraint_name.take() {
                Some(name) => table
                    .constraints
                    .push(Constraint::unique(vec![column.name.clone()]).named(Some(name))),
                None => column.is_unique = true,
            }
        } else if cur.eat_kw("CHECK") {
            let group = cur.expect_group("CHECK expression")?;
            let expression = group_body(cur.source(), group).trim();
            table
                .constraints
                .push(Constraint::check(expression).named(constraint_name.take()));
        } else if cur.eat_kw("REFERENCES") {
            let reference = parse_references(cur)?;
            table.constraints.push(
                Constraint::foreign_key(vec![column.name.clone()], reference)
                    .named(constraint_name.take()),
            );
        } else if cur.eat_kw("COLLATE") {
            column.collation = Some(name_or_string(cur)?);
        } else if cur.peek_kws(&["GENERATED", "ALWAYS", "AS"])
            && cur.peek_at(3).is_some_and(|t| t.group().is_some())
        {
            return Err(MapperError::unsupported(
                format!("generated column '{}'", column.name),
                hooks.kind(),
            ));
        } else if let Some(token) = cur.next() {
            debug!(
                "Skipping column modifier '{}' on {}",
                token.text(cur.source()),
                column.name
            );
        }
    }

    hooks.finish_column(&mut column);
    Ok(column)
}

/// Read a DEFAULT expression verbatim. `DEFAULT NULL` yields `None`.
///
/// The expression is one token (literal, word, group) optionally extended
/// by a call group, operators, or a `::type` cast.
pub fn read_default(cur: &mut Cursor<'_>) -> Result<Option<String>> {
    let run = cur.rest();
    let start = cur.position();

    let Some(first) = cur.next() else {
        return Err(cur.malformed("DEFAULT without a value"));
    };
    let mut prev = first;
    if first.is_symbol("-") || first.is_symbol("+") {
        match cur.next() {
            Some(token) => prev = token,
            None => return Err(cur.malformed("DEFAULT without a value")),
        }
    }

    let mut in_cast = false;
    while let Some(next) = cur.peek() {
        let after_symbol = prev.kind == TokenKind::Symbol;
        let take = match next.kind {
            TokenKind::Group(_) => prev.is_word() || after_symbol,
            TokenKind::Symbol => !next.is_symbol(","),
            TokenKind::Word => {
                (after_symbol || in_cast) && !DEFAULT_STOPS.iter().any(|kw| next.is_kw(kw))
            }
            _ => after_symbol,
        };
        if !take {
            break;
        }
        if next.is_symbol("::") {
            in_cast = true;
        } else if !next.is_word() && next.group().is_none() && !next.is_symbol("[") && !next.is_symbol("]") {
            in_cast = false;
        }
        prev = next;
        cur.next();
    }

    let text = span_text(cur.source(), &run[..cur.position() - start]);
    if text.eq_ignore_ascii_case("NULL") {
        Ok(None)
    } else {
        Ok(Some(text.to_string()))
    }
}

/// Consume `GENERATED {ALWAYS | BY DEFAULT [ON NULL]} AS IDENTITY [(options)]`.
pub fn read_generated_identity(cur: &mut Cursor<'_>, column: &mut Column) -> Result<bool> {
    let consumed = if cur.peek_kws(&["GENERATED", "ALWAYS", "AS", "IDENTITY"]) {
        4
    } else if cur.peek_kws(&["GENERATED", "BY", "DEFAULT", "AS", "IDENTITY"]) {
        5
    } else if cur.peek_kws(&["GENERATED", "BY", "DEFAULT", "ON", "NULL", "AS", "IDENTITY"]) {
        7
    } else {
        return Ok(false);
    };
    for _ in 0..consumed {
        cur.next();
    }

    column.auto_increment = true;
    if let Some(group) = cur.group() {
        let inner = group.group().unwrap_or_default();
        let mut opts = Cursor::new(inner, cur.source());
        let mut identity = Identity::default();
        let mut explicit = false;
        while !opts.is_done() {
            if opts.eat_kw("START") {
                opts.eat_kw("WITH");
                if let Some(n) = signed_number(&mut opts)? {
                    identity.start = n;
                    explicit = true;
                }
            } else if opts.eat_kw("INCREMENT") {
                opts.eat_kw("BY");
                if let Some(n) = signed_number(&mut opts)? {
                    identity.increment = n;
                    explicit = true;
                }
            } else {
                opts.next();
            }
        }
        if explicit {
            column.identity = Some(identity);
        }
    }
    Ok(true)
}

fn skip_conflict_clause(cur: &mut Cursor<'_>) {
    if cur.eat_kws(&["ON", "CONFLICT"]) {
        cur.next();
    }
}

/// Consume the first of `words` present, returning it lowercased.
pub fn eat_any(cur: &mut Cursor<'_>, words: &[&str]) -> Option<String> {
    let word = words.iter().find(|w| cur.peek_kw(w))?;
    cur.next();
    Some(word.to_ascii_lowercase())
}

/// Identifier, keyword or string literal value.
pub fn name_or_string(cur: &mut Cursor<'_>) -> Result<String> {
    match cur.peek() {
        Some(token) if token.kind == TokenKind::Str || token.name().is_some() => {
            cur.next();
            Ok(token.value.clone())
        }
        _ => Err(cur.malformed("expected name or string")),
    }
}

/// Optionally signed integer. Values beyond `i64` read as `None`.
pub fn signed_number(cur: &mut Cursor<'_>) -> Result<Option<i64>> {
    let negative = cur.eat_symbol("-");
    if !negative {
        cur.eat_symbol("+");
    }
    match cur.peek() {
        Some(token) if token.kind == TokenKind::Number => {
            cur.next();
            let value = token.value.parse::<i64>().ok();
            if value.is_none() {
                debug!("Ignoring out-of-range number {}", token.value);
            }
            Ok(value.map(|n| if negative { -n } else { n }))
        }
        _ => Err(cur.malformed("expected number")),
    }
}

// =============================================================================
// Types
// =============================================================================

/// Read a type: multiword names, parameters, time zones, interval fields,
/// MySQL UNSIGNED/ZEROFILL and PostgreSQL array suffixes.
pub fn read_data_type(cur: &mut Cursor<'_>) -> Result<DataType> {
    let mut name = cur.ident()?.to_lowercase();
    while cur.peek().is_some_and(|t| t.is_symbol("."))
        && cur.peek_at(1).and_then(Token::name).is_some()
    {
        cur.next();
        name = cur.ident()?.to_lowercase();
    }

    loop {
        let follow: &[&str] = match name.as_str() {
            "double" => &["PRECISION"],
            "character" | "char" | "nchar" | "bit" | "national character" | "national char" => {
                &["VARYING"]
            }
            "national" => &["CHARACTER", "CHAR"],
            "long" => &["RAW", "VARCHAR", "VARBINARY"],
            "unsigned" => &["BIG", "BIGINT"],
            "unsigned big" => &["INT"],
            "varying" => &["CHARACTER", "TEXT"],
            _ => &[],
        };
        match eat_any(cur, follow) {
            Some(word) => name = format!("{} {}", name, word),
            None => break,
        }
    }

    let mut data_type = DataType::new(name);
    if let Some(group) = cur.group() {
        apply_type_params(cur, group, &mut data_type)?;
    }

    match data_type.name.as_str() {
        "timestamp" | "time" => {
            let suffix = if cur.eat_kws(&["WITH", "TIME", "ZONE"]) {
                Some(" with time zone")
            } else if cur.eat_kws(&["WITH", "LOCAL", "TIME", "ZONE"]) {
                Some(" with local time zone")
            } else if cur.eat_kws(&["WITHOUT", "TIME", "ZONE"]) {
                Some(" without time zone")
            } else {
                None
            };
            if let Some(suffix) = suffix {
                data_type.name.push_str(suffix);
            }
        }
        "interval" => {
            const FIELDS: &[&str] = &["YEAR", "MONTH", "DAY", "HOUR", "MINUTE", "SECOND"];
            while let Some(field) = eat_any(cur, FIELDS) {
                data_type.name = format!("{} {}", data_type.name, field);
                if let Some(group) = cur.group() {
                    apply_type_params(cur, group, &mut data_type)?;
                }
                if cur.eat_kw("TO") {
                    data_type.name.push_str(" to");
                }
            }
        }
        _ => {}
    }

    loop {
        if cur.eat_kw("UNSIGNED") {
            data_type.unsigned = true;
        } else if !(cur.eat_kw("SIGNED") || cur.eat_kw("ZEROFILL")) {
            break;
        }
    }

    while cur.eat_symbol("[") {
        if cur.peek().is_some_and(|t| t.kind == TokenKind::Number) {
            cur.next();
        }
        if !cur.eat_symbol("]") {
            return Err(cur.malformed("expected ']' in array type"));
        }
        data_type.name.push_str("[]");
    }
    if cur.eat_kw("ARRAY") {
        data_type.name.push_str("[]");
    }

    Ok(data_type)
}

fn apply_type_params(cur: &Cursor<'_>, group: &Token, data_type: &mut DataType) -> Result<()> {
    let inner = group.group().unwrap_or_default();
    let params: Vec<&[Token]> = comma_items(inner).collect();

    if inner.iter().all(|t| t.kind == TokenKind::Str || t.is_symbol(",")) {
        data_type.values = inner
            .iter()
            .filter(|t| t.kind == TokenKind::Str)
            .map(|t| t.value.clone())
            .collect();
        return Ok(());
    }

    let number = |param: &[Token]| -> Result<Option<u32>> {
        match param.first() {
            Some(t) if t.kind == TokenKind::Number => t
                .value
                .parse::<u32>()
                .map(Some)
                .map_err(|_| cur.malformed(format!("bad type parameter '{}'", t.value))),
            Some(t) if t.is_symbol("*") => Ok(None),
            Some(t) if t.is_kw("MAX") => Ok(None),
            _ => Err(cur.malformed(format!(
                "bad type parameter list '{}'",
                group.text(cur.source())
            ))),
        }
    };

    if params.len() == 1 && params[0].first().is_some_and(|t| t.is_kw("MAX")) {
        data_type.is_max = true;
        return Ok(());
    }

    let first = number(params[0])?;
    match params.get(1) {
        Some(second) => {
            data_type.precision = Some(first.unwrap_or(38));
            data_type.scale = number(second)?;
        }
        None if PRECISION_TYPES.contains(&data_type.name.as_str())
            || data_type.name.starts_with("interval") =>
        {
            data_type.precision = first;
        }
        // BYTE/CHAR length semantics after the number are dropped.
        None => data_type.length = first,
    }
    Ok(())
}

// =============================================================================
// Indexes, views, sequences
// =============================================================================

fn parse_create_index(cur: &mut Cursor<'_>) -> Result<Index> {
    let modifiers = cur.take_until_kw(&["INDEX"]);
    cur.expect_kw("INDEX")?;
    let is_unique = modifiers.iter().any(|t| t.is_kw("UNIQUE"));
    cur.eat_kw("CONCURRENTLY");
    cur.eat_if_exists();

    let name = if cur.peek_kw("ON") {
        None
    } else {
        Some(cur.object_name()?.name)
    };
    let mut method = None;
    if cur.eat_kw("USING") {
        method = Some(cur.ident()?.to_lowercase());
    }
    cur.expect_kw("ON")?;
    cur.eat_kw("ONLY");
    let table = cur.object_name()?.name;
    if cur.eat_kw("USING") {
        method = Some(cur.ident()?.to_lowercase());
    }

    let group = cur.expect_group("index columns")?;
    let columns = name_list(cur.source(), group)?;

    let mut index = Index {
        name: name.unwrap_or_else(|| default_index_name(&table, &columns)),
        table,
        columns,
        is_unique,
        filter: None,
        include_columns: Vec::new(),
        method,
    };

    while !cur.is_done() {
        if cur.eat_kw("INCLUDE") {
            let group = cur.expect_group("included columns")?;
            index.include_columns = name_list(cur.source(), group)?;
        } else if cur.eat_kw("WHERE") {
            let predicate = cur.take_until_kw(&["WITH", "TABLESPACE"]);
            index.filter = Some(span_text(cur.source(), predicate).to_string());
        } else if cur.eat_kw("USING") && cur.peek().is_some_and(|t| t.is_word()) && !cur.peek_kw("INDEX") {
            index.method = Some(cur.ident()?.to_lowercase());
        } else {
            cur.next();
        }
    }
    Ok(index)
}

/// `{table}_{columns}_idx`, keeping only word characters of expressions.
pub fn default_index_name(table: &str, columns: &[String]) -> String {
    let parts: String = columns
        .join("_")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    format!("{}_{}_idx", table, parts)
}

fn parse_create_view(cur: &mut Cursor<'_>) -> Result<View> {
    cur.take_until_kw(&["VIEW"]);
    cur.expect_kw("VIEW")?;
    cur.eat_if_exists();
    let name = cur.object_name()?;
    let columns = match cur.group() {
        Some(group) => name_list(cur.source(), group)?,
        None => Vec::new(),
    };
    cur.take_until_kw(&["AS"]);
    cur.expect_kw("AS")?;
    let definition = cur.rest_text().trim();
    if definition.is_empty() {
        return Err(cur.malformed("view has no definition"));
    }
    Ok(View {
        name: name.name,
        schema: name.schema,
        columns,
        definition: definition.to_string(),
    })
}

fn parse_create_sequence(cur: &mut Cursor<'_>) -> Result<Sequence> {
    cur.take_until_kw(&["SEQUENCE"]);
    cur.expect_kw("SEQUENCE")?;
    cur.eat_if_exists();
    let name = cur.object_name()?;
    let mut sequence = Sequence::new(name.name);
    sequence.schema = name.schema;

    while !cur.is_done() {
        if cur.eat_kw("START") {
            cur.eat_kw("WITH");
            if let Some(n) = signed_number(cur)? {
                sequence.start = n;
            }
        } else if cur.eat_kw("INCREMENT") {
            cur.eat_kw("BY");
            if let Some(n) = signed_number(cur)? {
                sequence.increment = n;
            }
        } else if cur.eat_kws(&["NO", "MINVALUE"]) || cur.eat_kw("NOMINVALUE") {
            sequence.min_value = None;
        } else if cur.eat_kws(&["NO", "MAXVALUE"]) || cur.eat_kw("NOMAXVALUE") {
            sequence.max_value = None;
        } else if cur.eat_kw("MINVALUE") {
            sequence.min_value = signed_number(cur)?;
        } else if cur.eat_kw("MAXVALUE") {
            sequence.max_value = signed_number(cur)?;
        } else if cur.eat_kws(&["NO", "CYCLE"]) || cur.eat_kw("NOCYCLE") {
            sequence.cycle = false;
        } else if cur.eat_kw("CYCLE") {
            sequence.cycle = true;
        } else if let Some(token) = cur.next() {
            debug!("Skipping sequence option '{}'", token.text(cur.source()));
        }
    }
    Ok(sequence)
}

// =============================================================================
// Triggers
// =============================================================================

/// `{BEFORE|AFTER|INSTEAD OF} ev [OR ev] ON t [FOR EACH ROW] [WHEN (c)] body`.
pub fn parse_standard_trigger(
    cur: &mut Cursor<'_>,
    name: String,
    row_by_default: bool,
) -> Result<Trigger> {
    let timing = if cur.eat_kw("BEFORE") {
        TriggerTiming::Before
    } else if cur.eat_kw("AFTER") {
        TriggerTiming::After
    } else if cur.eat_kws(&["INSTEAD", "OF"]) {
        TriggerTiming::InsteadOf
    } else if cur.peek().is_some_and(|t| TriggerEvent::from_keyword(&t.value).is_some()) {
        TriggerTiming::Before
    } else {
        return Err(cur.malformed("expected BEFORE, AFTER or INSTEAD OF"));
    };

    let events = trigger_events(cur)?;
    cur.expect_kw("ON")?;
    let table = cur.object_name()?.name;

    let mut for_each_row = row_by_default;
    let mut condition = None;
    loop {
        if cur.eat_kw("REFERENCING") {
            cur.take_until_kw(&["FOR", "WHEN", "BEGIN", "DECLARE", "EXECUTE"]);
        } else if cur.eat_kws(&["FOR", "EACH", "ROW"]) {
            for_each_row = true;
        } else if cur.eat_kws(&["FOR", "EACH", "STATEMENT"]) {
            for_each_row = false;
        } else if cur.peek_kw("FOLLOWS") || cur.peek_kw("PRECEDES") {
            cur.next();
            cur.next();
        } else if cur.eat_kw("WHEN") {
            condition = Some(match cur.group() {
                Some(group) => group_body(cur.source(), group).trim().to_string(),
                None => span_text(cur.source(), cur.take_until_kw(&["BEGIN"]))
                    .trim()
                    .to_string(),
            });
        } else if cur.eat_kw("ENABLE") || cur.eat_kw("DISABLE") {
            continue;
        } else {
            break;
        }
    }

    let body = cur.tail_text();
    if body.is_empty() {
        return Err(cur.malformed("trigger has no body"));
    }
    Ok(Trigger {
        name,
        table,
        timing,
        events,
        for_each_row,
        condition,
        body: body.to_string(),
    })
}

/// `INSERT OR UPDATE [OF a, b] OR DELETE`, also comma-separated.
pub fn trigger_events(cur: &mut Cursor<'_>) -> Result<Vec<TriggerEvent>> {
    let mut events = Vec::new();
    loop {
        let event = cur
            .peek()
            .filter(|t| t.is_word())
            .and_then(|t| TriggerEvent::from_keyword(&t.value))
            .ok_or_else(|| cur.malformed("expected INSERT, UPDATE or DELETE"))?;
        cur.next();
        if !events.contains(&event) {
            events.push(event);
        }
        if event == TriggerEvent::Update && cur.eat_kw("OF") {
            while cur.peek().is_some_and(|t| t.name().is_some() || t.is_symbol(","))
                && !cur.peek_kw("ON")
                && !cur.peek_kw("OR")
            {
                cur.next();
            }
        }
        if !(cur.eat_kw("OR") || cur.eat_symbol(",")) {
            break;
        }
    }
    Ok(events)
}

// =============================================================================
// ALTER TABLE and COMMENT ON
// =============================================================================

fn apply_alter_table(hooks: &dyn ParseHooks, cur: &mut Cursor<'_>, schema: &mut Schema) -> Result<()> {
    cur.expect_kw("ALTER")?;
    cur.expect_kw("TABLE")?;
    cur.eat_kw("ONLY");
    cur.eat_if_exists();
    let name = cur.object_name()?.name;

    let Some(table) = schema.table_mut(&name) else {
        warn!("Skipping ALTER TABLE on unknown table {}", name);
        cur.skip_rest();
        return Ok(());
    };

    for action in comma_items(cur.rest()) {
        let mut action_cur = Cursor::new(action, cur.source());
        apply_alter_action(hooks, &mut action_cur, table)?;
    }
    cur.skip_rest();
    Ok(())
}

fn apply_alter_action(hooks: &dyn ParseHooks, cur: &mut Cursor<'_>, table: &mut Table) -> Result<()> {
    if cur.eat_kw("WITH") {
        eat_any(cur, &["CHECK", "NOCHECK"]);
    }

    if cur.eat_kw("ADD") {
        // SQL Server: ADD CONSTRAINT df DEFAULT expr FOR col
        let named_default = cur.peek_kw("CONSTRAINT") && cur.peek_at(2).is_some_and(|t| t.is_kw("DEFAULT"));
        if named_default {
            cur.next();
            cur.next();
        }
        if cur.eat_kw("DEFAULT") {
            let default = read_default(cur)?;
            cur.expect_kw("FOR")?;
            let column_name = cur.ident()?;
            let column = table
                .column_mut(&column_name)
                .ok_or_else(|| cur.malformed(format!("unknown column '{}'", column_name)))?;
            column.default = default;
            return Ok(());
        }
        cur.eat_kw("COLUMN");
        cur.eat_if_exists();
        return parse_table_element(hooks, cur, table);
    }

    if cur.peek_kw("MODIFY") || cur.peek_kw("CHANGE") {
        let change = cur.peek_kw("CHANGE");
        cur.next();
        cur.eat_kw("COLUMN");
        let old_name = if change { Some(cur.ident()?) } else { None };
        let mut scratch = Table::new(table.name.clone());
        let column = parse_column(hooks, cur, &mut scratch)?;
        let target = old_name.unwrap_or_else(|| column.name.clone());
        let slot = table
            .columns
            .iter_mut()
            .find(|c| c.name.eq_ignore_ascii_case(&target))
            .ok_or_else(|| cur.malformed(format!("unknown column '{}'", target)))?;
        *slot = column;
        table.constraints.extend(scratch.constraints);
        return Ok(());
    }

    if cur.eat_kw("ALTER") {
        cur.eat_kw("COLUMN");
        let column_name = cur.ident()?;
        let column = table
            .column_mut(&column_name)
            .ok_or_else(|| cur.malformed(format!("unknown column '{}'", column_name)))?;
        if cur.eat_kws(&["SET", "DEFAULT"]) {
            column.default = read_default(cur)?;
            hooks.finish_column(column);
        } else if cur.eat_kws(&["DROP", "DEFAULT"]) {
            column.default = None;
        } else if cur.eat_kws(&["SET", "NOT", "NULL"]) {
            column.is_nullable = false;
        } else if cur.eat_kws(&["DROP", "NOT", "NULL"]) {
            column.is_nullable = true;
        } else {
            debug!("Skipping ALTER COLUMN action on {}.{}", table.name, column_name);
        }
        cur.skip_rest();
        return Ok(());
    }

    debug!("Skipping ALTER TABLE action: {}", cur.rest_text());
    cur.skip_rest();
    Ok(())
}

fn apply_comment(cur: &mut Cursor<'_>, schema: &mut Schema) -> Result<()> {
    cur.expect_kw("COMMENT")?;
    cur.expect_kw("ON")?;

    let on_table = cur.eat_kw("TABLE");
    let on_column = !on_table && cur.eat_kw("COLUMN");
    if !on_table && !on_column {
        debug!("Skipping comment: {}", cur.rest_text());
        cur.skip_rest();
        return Ok(());
    }

    let object = cur.object_name()?;
    cur.expect_kw("IS")?;
    let text = if cur.eat_kw("NULL") {
        None
    } else {
        Some(name_or_string(cur)?)
    };

    if on_table {
        match schema.table_mut(&object.name) {
            Some(table) => table.comment = text,
            None => warn!("Skipping comment on unknown table {}", object.name),
        }
        return Ok(());
    }

    let table_name = object.schema.unwrap_or_default();
    match schema
        .table_mut(&table_name)
        .and_then(|t| t.column_mut(&object.name))
    {
        Some(column) => column.comment = text,
        None => warn!("Skipping comment on unknown column {}.{}", table_name, object.name),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Standard SQL with no dialect extensions.
    struct PlainHooks;

    impl ParseHooks for PlainHooks {
        fn kind(&self) -> DialectKind {
            DialectKind::Postgres
        }
    }

    fn parse(sql: &str) -> Result<Schema> {
        parse_script(&PlainHooks, sql)
    }

    fn parse_type(text: &str) -> DataType {
        let opts = ScanOptions::for_dialect(DialectKind::Postgres);
        let tokens = tokenize(text, &opts).unwrap();
        let mut cur = Cursor::new(&tokens, text);
        read_data_type(&mut cur).unwrap()
    }

    fn default_of(text: &str) -> (Option<String>, String) {
        let opts = ScanOptions::for_dialect(DialectKind::Postgres);
        let tokens = tokenize(text, &opts).unwrap();
        let mut cur = Cursor::new(&tokens, text);
        let value = read_default(&mut cur).unwrap();
        (value, cur.rest_text().to_string())
    }

    // =========================================================================
    // Statement loop
    // =========================================================================

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse(""), Err(MapperError::EmptyInput)));
        assert!(matches!(parse("  -- nothing\n"), Err(MapperError::EmptyInput)));
    }

    #[test]
    fn test_other_statements_are_skipped() {
        let schema = parse("SET search_path = public; DROP TABLE IF EXISTS a;").unwrap();
        assert!(schema.is_empty());
        assert_eq!(schema.dialect, Some(DialectKind::Postgres));
    }

    #[test]
    fn test_column_named_begin_keeps_following_tables() {
        let schema = parse(
            "CREATE TABLE events (id INT, begin TIMESTAMP); CREATE TABLE z (q INT); CREATE TABLE y (r INT);",
        )
        .unwrap();
        let names: Vec<&str> = schema.tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["events", "z", "y"]);
        assert_eq!(schema.tables[0].columns[1].name, "begin");
    }

    #[test]
    fn test_duplicate_table_is_malformed() {
        let err = parse("CREATE TABLE a (x int); CREATE TABLE A (y int);").unwrap_err();
        assert!(matches!(err, MapperError::MalformedStatement { .. }));
    }

    #[test]
    fn test_failure_aborts_whole_parse() {
        let err = parse("CREATE TABLE ok (x int); CREATE TABLE bad (x int, PRIMARY KEY (nope));")
            .unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    // =========================================================================
    // CREATE TABLE
    // =========================================================================

    #[test]
    fn test_create_table_columns_and_constraints() {
        let schema = parse(
            "CREATE TABLE IF NOT EXISTS app.orders (
                id integer NOT NULL,
                user_id integer REFERENCES users (id) ON DELETE CASCADE,
                total numeric(10, 2) DEFAULT 0,
                note varchar(200),
                CONSTRAINT orders_pk PRIMARY KEY (id),
                CONSTRAINT chk CHECK (total >= 0),
                UNIQUE (note)
            );",
        )
        .unwrap();

        let table = &schema.tables[0];
        assert_eq!(table.name, "orders");
        assert_eq!(table.schema.as_deref(), Some("app"));
        assert_eq!(table.columns.len(), 4);
        assert_eq!(table.columns[2].data_type, DataType::numeric("numeric", 10, 2));
        assert_eq!(table.columns[2].default.as_deref(), Some("0"));
        assert_eq!(table.columns[3].data_type, DataType::with_length("varchar", 200));

        let pk = table.primary_key().unwrap();
        assert_eq!(pk.name.as_deref(), Some("orders_pk"));
        assert_eq!(table.primary_key_columns().to_vec(), vec!["id".to_string()]);

        let fk = table
            .constraints
            .iter()
            .find_map(|c| match &c.kind {
                ConstraintKind::ForeignKey(r) => Some((c, r)),
                _ => None,
            })
            .unwrap();
        assert_eq!(fk.0.columns, vec!["user_id".to_string()]);
        assert_eq!(fk.1.table, "users");
        assert_eq!(fk.1.on_delete, Some(ReferentialAction::Cascade));

        let check = table.constraints.iter().find(|c| c.name.as_deref() == Some("chk")).unwrap();
        assert_eq!(check.kind, ConstraintKind::Check("total >= 0".into()));
    }

    #[test]
    fn test_inline_primary_key_forces_not_null() {
        let schema = parse("CREATE TABLE t (id int PRIMARY KEY, v text)").unwrap();
        let table = &schema.tables[0];
        assert!(!table.columns[0].is_nullable);
        assert!(table.columns[1].is_nullable);
        assert!(table.is_single_pk("id"));
    }

    #[test]
    fn test_table_level_primary_key_forces_not_null() {
        let schema = parse("CREATE TABLE t (a int, b int, PRIMARY KEY (a, b))").unwrap();
        assert!(schema.tables[0].columns.iter().all(|c| !c.is_nullable));
    }

    #[test]
    fn test_two_primary_keys_are_rejected() {
        let err = parse("CREATE TABLE t (a int PRIMARY KEY, b int PRIMARY KEY)").unwrap_err();
        assert!(err.to_string().contains("more than one primary key"));
    }

    #[test]
    fn test_named_inline_unique_becomes_constraint() {
        let schema = parse("CREATE TABLE t (a int CONSTRAINT uq_a UNIQUE, b int UNIQUE)").unwrap();
        let table = &schema.tables[0];
        assert_eq!(table.constraints[0].name.as_deref(), Some("uq_a"));
        assert!(!table.columns[0].is_unique);
        assert!(table.columns[1].is_unique);
    }

    #[test]
    fn test_create_table_as_select_is_unsupported() {
        let err = parse("CREATE TABLE t AS SELECT * FROM s").unwrap_err();
        assert!(matches!(err, MapperError::UnsupportedConstruct { .. }));
    }

    #[test]
    fn test_missing_type_is_malformed() {
        let err = parse("CREATE TABLE t (a NOT NULL)").unwrap_err();
        assert!(matches!(err, MapperError::MalformedStatement { .. }));
    }

    #[test]
    fn test_unknown_constraint_column_is_malformed() {
        let err = parse("CREATE TABLE t (a int, UNIQUE (b))").unwrap_err();
        assert!(err.to_string().contains("'b'"));
    }

    #[test]
    fn test_column_named_like_a_keyword_is_not_identity() {
        let schema = parse("CREATE TABLE t (\"identity\" int, serial_no text)").unwrap();
        let table = &schema.tables[0];
        assert_eq!(table.columns[0].name, "identity");
        assert!(table.columns.iter().all(|c| !c.auto_increment));
    }

    #[test]
    fn test_generated_expression_column_is_unsupported() {
        let err = parse("CREATE TABLE t (a int, b int GENERATED ALWAYS AS (a * 2) STORED)")
            .unwrap_err();
        assert!(matches!(err, MapperError::UnsupportedConstruct { .. }));
    }

    #[test]
    fn test_generated_identity_with_options() {
        let sql = "id bigint GENERATED BY DEFAULT AS IDENTITY (START WITH 100 INCREMENT BY 5)";
        let opts = ScanOptions::for_dialect(DialectKind::Postgres);
        let tokens = tokenize(sql, &opts).unwrap();
        let mut cur = Cursor::new(&tokens, sql);
        cur.next();
        cur.next();
        let mut column = Column::new("id", DataType::new("bigint"));
        assert!(read_generated_identity(&mut cur, &mut column).unwrap());
        assert!(column.auto_increment);
        assert_eq!(
            column.identity,
            Some(Identity {
                start: 100,
                increment: 5
            })
        );
        assert!(cur.is_done());
    }

    // =========================================================================
    // Defaults
    // =========================================================================

    #[test]
    fn test_default_forms() {
        assert_eq!(default_of("0 NOT NULL"), (Some("0".into()), "NOT NULL".into()));
        assert_eq!(default_of("-1"), (Some("-1".into()), String::new()));
        assert_eq!(default_of("NULL"), (None, String::new()));
        assert_eq!(
            default_of("nextval('s'::regclass) NOT NULL"),
            (Some("nextval('s'::regclass)".into()), "NOT NULL".into())
        );
        assert_eq!(
            default_of("'a'::character varying NOT NULL"),
            (Some("'a'::character varying".into()), "NOT NULL".into())
        );
        assert_eq!(
            default_of("CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP"),
            (
                Some("CURRENT_TIMESTAMP".into()),
                "ON UPDATE CURRENT_TIMESTAMP".into()
            )
        );
        assert_eq!(default_of("((0))"), (Some("((0))".into()), String::new()));
        assert_eq!(
            default_of("'{}'::text[] COLLATE x"),
            (Some("'{}'::text[]".into()), "COLLATE x".into())
        );
    }

    // =========================================================================
    // Types
    // =========================================================================

    #[test]
    fn test_read_multiword_types() {
        assert_eq!(parse_type("double precision").name, "double precision");
        assert_eq!(
            parse_type("character varying(40)"),
            DataType::with_length("character varying", 40)
        );
        assert_eq!(
            parse_type("timestamp(3) with time zone").name,
            "timestamp with time zone"
        );
        assert_eq!(parse_type("timestamp(3) with time zone").precision, Some(3));
        assert_eq!(parse_type("interval day(2) to second(6)").name, "interval day to second");
        assert_eq!(parse_type("long raw").name, "long raw");
    }

    #[test]
    fn test_read_type_parameters() {
        assert_eq!(parse_type("decimal(12)").precision, Some(12));
        assert!(parse_type("int(11) unsigned zerofill").unsigned);
        assert_eq!(parse_type("int(11)").length, Some(11));
        assert!(parse_type("nvarchar(max)").is_max);
        assert_eq!(parse_type("varchar2(20 byte)").length, Some(20));
        assert_eq!(
            parse_type("enum('a','b''c')").values,
            vec!["a".to_string(), "b'c".to_string()]
        );
        assert_eq!(parse_type("number(*,0)"), DataType::numeric("number", 38, 0));
        assert_eq!(parse_type("integer[]").name, "integer[]");
        assert_eq!(parse_type("public.mood").name, "mood");
    }

    // =========================================================================
    // Other statements
    // =========================================================================

    #[test]
    fn test_create_index_attaches_to_table() {
        let schema = parse(
            "CREATE TABLE t (a int, b text);
             CREATE UNIQUE INDEX CONCURRENTLY ix ON t USING btree (a DESC) INCLUDE (b) WHERE a > 0;
             CREATE INDEX ON t (lower(b));
             CREATE INDEX ghost ON missing (x);",
        )
        .unwrap();
        let indexes: Vec<&Index> = schema.indexes().collect();
        assert_eq!(indexes.len(), 2);
        assert!(indexes[0].is_unique);
        assert_eq!(indexes[0].columns, vec!["a".to_string()]);
        assert_eq!(indexes[0].include_columns, vec!["b".to_string()]);
        assert_eq!(indexes[0].filter.as_deref(), Some("a > 0"));
        assert_eq!(indexes[0].method.as_deref(), Some("btree"));
        assert_eq!(indexes[1].columns, vec!["lower(b)".to_string()]);
    }

    #[test]
    fn test_create_view_keeps_definition_verbatim() {
        let schema =
            parse("CREATE OR REPLACE VIEW v (x) AS SELECT a  AS x FROM t WHERE a > 1;").unwrap();
        assert_eq!(schema.views[0].name, "v");
        assert_eq!(schema.views[0].columns, vec!["x".to_string()]);
        assert_eq!(schema.views[0].definition, "SELECT a  AS x FROM t WHERE a > 1");
    }

    #[test]
    fn test_create_sequence_options() {
        let schema = parse(
            "CREATE SEQUENCE s START WITH 10 INCREMENT BY -2 MINVALUE -100 NO MAXVALUE CYCLE CACHE 20;",
        )
        .unwrap();
        let seq = &schema.sequences[0];
        assert_eq!(seq.start, 10);
        assert_eq!(seq.increment, -2);
        assert_eq!(seq.min_value, Some(-100));
        assert_eq!(seq.max_value, None);
        assert!(seq.cycle);
    }

    #[test]
    fn test_standard_trigger() {
        let schema = parse(
            "CREATE TABLE t (a int);
             CREATE TRIGGER trg AFTER INSERT OR UPDATE OF a ON t
             FOR EACH ROW WHEN (NEW.a > 0) EXECUTE FUNCTION audit();",
        )
        .unwrap();
        let trigger = &schema.triggers[0];
        assert_eq!(trigger.name, "trg");
        assert_eq!(trigger.table, "t");
        assert_eq!(trigger.timing, TriggerTiming::After);
        assert_eq!(trigger.events, vec![TriggerEvent::Insert, TriggerEvent::Update]);
        assert!(trigger.for_each_row);
        assert_eq!(trigger.condition.as_deref(), Some("NEW.a > 0"));
        assert_eq!(trigger.body, "EXECUTE FUNCTION audit()");
    }

    #[test]
    fn test_alter_table_actions() {
        let schema = parse(
            "CREATE TABLE users (id int, email text);
             CREATE TABLE orders (id int, user_id int);
             ALTER TABLE ONLY users ADD CONSTRAINT users_pkey PRIMARY KEY (id);
             ALTER TABLE orders ADD CONSTRAINT fk FOREIGN KEY (user_id) REFERENCES users (id),
                 ALTER COLUMN id SET DEFAULT 7;
             ALTER TABLE users ADD COLUMN age int NOT NULL;
             ALTER TABLE nobody ADD PRIMARY KEY (x);
             ALTER TABLE users OWNER TO admin;",
        )
        .unwrap();
        let users = schema.table("users").unwrap();
        assert_eq!(users.primary_key().unwrap().name.as_deref(), Some("users_pkey"));
        assert_eq!(users.columns.len(), 3);
        assert!(!users.columns[2].is_nullable);
        let orders = schema.table("orders").unwrap();
        assert_eq!(orders.constraints.len(), 1);
        assert_eq!(orders.columns[0].default.as_deref(), Some("7"));
    }

    #[test]
    fn test_comment_on() {
        let schema = parse(
            "CREATE TABLE t (a int);
             COMMENT ON TABLE t IS 'Things';
             COMMENT ON COLUMN public.t.a IS 'The a';
             COMMENT ON INDEX ix IS 'ignored';",
        )
        .unwrap();
        assert_eq!(schema.tables[0].comment.as_deref(), Some("Things"));
        assert_eq!(schema.tables[0].columns[0].comment.as_deref(), Some("The a"));
    }
}
