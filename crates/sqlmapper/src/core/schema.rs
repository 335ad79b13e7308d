//! Canonical schema model.
//!
//! Passive, dialect-neutral data structures filled by a parser and consumed
//! by a generator. Names are stored unquoted in their original case; type
//! names are stored lowercase.

use serde::{Deserialize, Serialize};

use crate::dialect::DialectKind;
use crate::error::{MapperError, Result};

/// Root container for one conversion request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Dialect the schema was parsed from, if any.
    pub dialect: Option<DialectKind>,

    /// Tables in declaration order.
    pub tables: Vec<Table>,

    /// Views in declaration order.
    pub views: Vec<View>,

    /// Triggers in declaration order.
    pub triggers: Vec<Trigger>,

    /// Sequences in declaration order.
    pub sequences: Vec<Sequence>,
}

impl Schema {
    /// Create an empty schema tagged with its source dialect.
    pub fn new(dialect: DialectKind) -> Self {
        Self {
            dialect: Some(dialect),
            ..Self::default()
        }
    }

    /// Whether the schema holds no objects at all.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
            && self.views.is_empty()
            && self.triggers.is_empty()
            && self.sequences.is_empty()
    }

    /// Find a table by name, ignoring case.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Find a table by name for mutation, ignoring case.
    pub fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables
            .iter_mut()
            .find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Iterate all indexes across tables.
    pub fn indexes(&self) -> impl Iterator<Item = &Index> {
        self.tables.iter().flat_map(|t| t.indexes.iter())
    }
}

/// Table metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Table name.
    pub name: String,

    /// Optional schema/namespace qualifier.
    pub schema: Option<String>,

    /// Column definitions in declaration order.
    pub columns: Vec<Column>,

    /// Table-level constraints, including those declared inline on columns.
    pub constraints: Vec<Constraint>,

    /// Secondary indexes.
    pub indexes: Vec<Index>,

    /// Table comment.
    pub comment: Option<String>,

    /// Default character set (MySQL table option).
    pub charset: Option<String>,

    /// Default collation.
    pub collation: Option<String>,
}

impl Table {
    /// Create an empty table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Get the qualified name as written (`schema.table` or `table`).
    pub fn full_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{}.{}", schema, self.name),
            None => self.name.clone(),
        }
    }

    /// Find a column by name, ignoring case.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Find a column by name for mutation, ignoring case.
    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns
            .iter_mut()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Primary key constraint, if declared.
    pub fn primary_key(&self) -> Option<&Constraint> {
        self.constraints
            .iter()
            .find(|c| matches!(c.kind, ConstraintKind::PrimaryKey))
    }

    /// Primary key column names (empty if none).
    pub fn primary_key_columns(&self) -> &[String] {
        self.primary_key()
            .map(|c| c.columns.as_slice())
            .unwrap_or_default()
    }

    /// Whether `column` is the sole primary key column.
    pub fn is_single_pk(&self, column: &str) -> bool {
        let pk = self.primary_key_columns();
        pk.len() == 1 && pk[0].eq_ignore_ascii_case(column)
    }

    /// Check the structural invariants of the table.
    ///
    /// Column names are unique, and every column listed in a constraint or
    /// index exists in the table.
    pub fn validate(&self) -> Result<()> {
        for (i, col) in self.columns.iter().enumerate() {
            if self.columns[..i]
                .iter()
                .any(|c| c.name.eq_ignore_ascii_case(&col.name))
            {
                return Err(MapperError::malformed(
                    format!("CREATE TABLE {}", self.name),
                    format!("duplicate column '{}'", col.name),
                ));
            }
        }

        for constraint in &self.constraints {
            if constraint.columns.is_empty() && !matches!(constraint.kind, ConstraintKind::Check(_))
            {
                return Err(MapperError::malformed(
                    format!("CREATE TABLE {}", self.name),
                    format!("{} constraint has no columns", constraint.kind.keyword()),
                ));
            }
            for name in &constraint.columns {
                if self.column(name).is_none() {
                    return Err(MapperError::malformed(
                        format!("CREATE TABLE {}", self.name),
                        format!(
                            "{} constraint references unknown column '{}'",
                            constraint.kind.keyword(),
                            name
                        ),
                    ));
                }
            }
        }

        for index in &self.indexes {
            for name in index.columns.iter().chain(&index.include_columns) {
                // Expression index parts are kept verbatim and not resolvable.
                if is_plain_name(name) && self.column(name).is_none() {
                    return Err(MapperError::malformed(
                        format!("CREATE INDEX {}", index.name),
                        format!("index references unknown column '{}'", name),
                    ));
                }
            }
        }

        Ok(())
    }
}

fn is_plain_name(s: &str) -> bool {
    !s.is_empty() && !s.contains(['(', ' ', '\'', '+', '-', '*', '/', '|'])
}

/// Column metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name.
    pub name: String,

    /// Column type.
    pub data_type: DataType,

    /// Whether the column allows NULL.
    pub is_nullable: bool,

    /// Default value expression, verbatim from the source text.
    pub default: Option<String>,

    /// Whether the database generates the value on insert.
    pub auto_increment: bool,

    /// Explicit identity seed/increment, when the source declared one.
    pub identity: Option<Identity>,

    /// Whether the column carries an inline UNIQUE.
    pub is_unique: bool,

    /// Column collation.
    pub collation: Option<String>,

    /// Column character set.
    pub charset: Option<String>,

    /// Column comment.
    pub comment: Option<String>,
}

impl Column {
    /// Create a nullable column.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            is_nullable: true,
            ..Self::default()
        }
    }
}

/// Identity seed and increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub start: i64,
    pub increment: i64,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            start: 1,
            increment: 1,
        }
    }
}

/// Column data type.
///
/// `length` applies to character and binary types, `precision`/`scale` to
/// fixed-point numerics. Other types leave them unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataType {
    /// Base type name, lowercase (e.g. "varchar", "double precision").
    pub name: String,

    /// Length for character/binary types.
    pub length: Option<u32>,

    /// Precision for numeric types (and fractional seconds for temporal types).
    pub precision: Option<u32>,

    /// Scale for numeric types.
    pub scale: Option<u32>,

    /// MySQL UNSIGNED modifier.
    pub unsigned: bool,

    /// `(max)` length (SQL Server).
    pub is_max: bool,

    /// Enumerated values for ENUM/SET types.
    pub values: Vec<String>,
}

impl DataType {
    /// Create a type with no parameters.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_lowercase(),
            ..Self::default()
        }
    }

    /// Create a character/binary type with a length.
    pub fn with_length(name: impl Into<String>, length: u32) -> Self {
        Self {
            length: Some(length),
            ..Self::new(name)
        }
    }

    /// Create a numeric type with precision and scale.
    pub fn numeric(name: impl Into<String>, precision: u32, scale: u32) -> Self {
        Self {
            precision: Some(precision),
            scale: Some(scale),
            ..Self::new(name)
        }
    }

    /// Lookup key used by the value registry, e.g. `tinyint(1)` or `varchar`.
    pub fn key(&self) -> String {
        let name: String = self.name.split_whitespace().collect::<Vec<_>>().join(" ");
        match (self.length, self.precision, self.scale) {
            (Some(len), _, _) => format!("{}({})", name, len),
            (None, Some(p), Some(s)) if s > 0 => format!("{}({},{})", name, p, s),
            (None, Some(p), _) => format!("{}({})", name, p),
            _ => name,
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.values.is_empty() {
            let quoted: Vec<String> = self
                .values
                .iter()
                .map(|v| format!("'{}'", v.replace('\'', "''")))
                .collect();
            write!(f, "({})", quoted.join(","))?;
        } else if self.is_max {
            write!(f, "(max)")?;
        } else if let Some(len) = self.length {
            write!(f, "({})", len)?;
        } else if let Some(p) = self.precision {
            match self.scale {
                Some(s) => write!(f, "({},{})", p, s)?,
                None => write!(f, "({})", p)?,
            }
        }
        if self.unsigned {
            write!(f, " unsigned")?;
        }
        Ok(())
    }
}

/// Table constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    /// Constraint name, if declared.
    pub name: Option<String>,

    /// Constraint type and its type-specific data.
    pub kind: ConstraintKind,

    /// Constrained columns (empty for table-level CHECK).
    pub columns: Vec<String>,
}

impl Constraint {
    pub fn primary_key(columns: Vec<String>) -> Self {
        Self {
            name: None,
            kind: ConstraintKind::PrimaryKey,
            columns,
        }
    }

    pub fn unique(columns: Vec<String>) -> Self {
        Self {
            name: None,
            kind: ConstraintKind::Unique,
            columns,
        }
    }

    pub fn check(expression: impl Into<String>) -> Self {
        Self {
            name: None,
            kind: ConstraintKind::Check(expression.into()),
            columns: Vec::new(),
        }
    }

    pub fn foreign_key(columns: Vec<String>, reference: ForeignKeyRef) -> Self {
        Self {
            name: None,
            kind: ConstraintKind::ForeignKey(reference),
            columns,
        }
    }

    /// Attach a name.
    pub fn named(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }
}

/// Constraint type tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConstraintKind {
    PrimaryKey,
    ForeignKey(ForeignKeyRef),
    Unique,
    /// Opaque boolean expression, verbatim.
    Check(String),
}

impl ConstraintKind {
    /// SQL keyword for the constraint type.
    pub fn keyword(&self) -> &'static str {
        match self {
            ConstraintKind::PrimaryKey => "PRIMARY KEY",
            ConstraintKind::ForeignKey(_) => "FOREIGN KEY",
            ConstraintKind::Unique => "UNIQUE",
            ConstraintKind::Check(_) => "CHECK",
        }
    }
}

/// Referenced side of a foreign key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForeignKeyRef {
    /// Referenced table name.
    pub table: String,

    /// Referenced schema, if qualified.
    pub schema: Option<String>,

    /// Referenced columns (may be empty: the referenced primary key).
    pub columns: Vec<String>,

    /// ON DELETE rule.
    pub on_delete: Option<ReferentialAction>,

    /// ON UPDATE rule.
    pub on_update: Option<ReferentialAction>,
}

/// Referential action for ON DELETE / ON UPDATE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferentialAction {
    Cascade,
    SetNull,
    SetDefault,
    Restrict,
    NoAction,
}

impl ReferentialAction {
    /// Parse a rule from its keywords (case-insensitive, whitespace-normalized).
    pub fn from_keywords(words: &str) -> Option<Self> {
        let normalized = words
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_uppercase();
        match normalized.as_str() {
            "CASCADE" => Some(Self::Cascade),
            "SET NULL" => Some(Self::SetNull),
            "SET DEFAULT" => Some(Self::SetDefault),
            "RESTRICT" => Some(Self::Restrict),
            "NO ACTION" => Some(Self::NoAction),
            _ => None,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
            Self::Restrict => "RESTRICT",
            Self::NoAction => "NO ACTION",
        }
    }
}

/// Index metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Index {
    /// Index name.
    pub name: String,

    /// Owning table name.
    pub table: String,

    /// Indexed columns or expressions, in key order.
    pub columns: Vec<String>,

    /// Whether the index is unique.
    pub is_unique: bool,

    /// Partial index predicate (PostgreSQL, SQLite, SQL Server).
    pub filter: Option<String>,

    /// Non-key included columns (PostgreSQL, SQL Server).
    pub include_columns: Vec<String>,

    /// Access method (e.g. btree, gin, hash).
    pub method: Option<String>,
}

/// View definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct View {
    /// View name.
    pub name: String,

    /// Schema qualifier.
    pub schema: Option<String>,

    /// Explicit column list, if declared.
    pub columns: Vec<String>,

    /// SELECT text, verbatim.
    pub definition: String,
}

/// Trigger timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerTiming {
    Before,
    After,
    InsteadOf,
}

impl TriggerTiming {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Before => "BEFORE",
            Self::After => "AFTER",
            Self::InsteadOf => "INSTEAD OF",
        }
    }
}

/// Trigger event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerEvent {
    Insert,
    Update,
    Delete,
}

impl TriggerEvent {
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word.to_uppercase().as_str() {
            "INSERT" => Some(Self::Insert),
            "UPDATE" => Some(Self::Update),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

/// Trigger definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    /// Trigger name.
    pub name: String,

    /// Owning table name.
    pub table: String,

    /// Firing time.
    pub timing: TriggerTiming,

    /// Firing events (at least one).
    pub events: Vec<TriggerEvent>,

    /// FOR EACH ROW (true) or statement-level (false).
    pub for_each_row: bool,

    /// WHEN condition, verbatim.
    pub condition: Option<String>,

    /// Action body, verbatim.
    pub body: String,
}

/// Sequence definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    /// Sequence name.
    pub name: String,

    /// Schema qualifier.
    pub schema: Option<String>,

    /// START WITH value.
    pub start: i64,

    /// INCREMENT BY value.
    pub increment: i64,

    /// MINVALUE, if declared.
    pub min_value: Option<i64>,

    /// MAXVALUE, if declared.
    pub max_value: Option<i64>,

    /// Whether the sequence wraps around.
    pub cycle: bool,
}

impl Sequence {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            start: 1,
            increment: 1,
            min_value: None,
            max_value: None,
            cycle: false,
        }
    }
}
