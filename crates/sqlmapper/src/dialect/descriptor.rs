//! Static per-dialect facts.
//!
//! One immutable [`DialectDescriptor`] exists per [`DialectKind`]. They are
//! built once by [`Descriptors::builtin`] and handed to parsers and
//! generators through the driver catalog.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::reserved;
use crate::error::MapperError;

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    Mysql,
    #[serde(alias = "pg", alias = "postgresql")]
    Postgres,
    Sqlite,
    Oracle,
    #[serde(alias = "mssql", alias = "sql_server")]
    Sqlserver,
}

impl DialectKind {
    /// All dialects, in a stable order.
    pub const ALL: [DialectKind; 5] = [
        DialectKind::Mysql,
        DialectKind::Postgres,
        DialectKind::Sqlite,
        DialectKind::Oracle,
        DialectKind::Sqlserver,
    ];

    /// Canonical lowercase name, also used for output file suffixes.
    pub fn name(&self) -> &'static str {
        match self {
            DialectKind::Mysql => "mysql",
            DialectKind::Postgres => "postgres",
            DialectKind::Sqlite => "sqlite",
            DialectKind::Oracle => "oracle",
            DialectKind::Sqlserver => "sqlserver",
        }
    }

    fn index(&self) -> usize {
        match self {
            DialectKind::Mysql => 0,
            DialectKind::Postgres => 1,
            DialectKind::Sqlite => 2,
            DialectKind::Oracle => 3,
            DialectKind::Sqlserver => 4,
        }
    }
}

impl fmt::Display for DialectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DialectKind {
    type Err = MapperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(DialectKind::Mysql),
            "postgres" | "postgresql" | "pg" => Ok(DialectKind::Postgres),
            "sqlite" | "sqlite3" => Ok(DialectKind::Sqlite),
            "oracle" => Ok(DialectKind::Oracle),
            "sqlserver" | "mssql" | "sql_server" => Ok(DialectKind::Sqlserver),
            other => Err(MapperError::Config(format!(
                "Unknown dialect: '{}'. Supported dialects: mysql, postgres, sqlite, oracle, sqlserver",
                other
            ))),
        }
    }
}

/// How a dialect folds unquoted identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseFolding {
    Lower,
    Upper,
    Preserve,
}

/// Immutable per-dialect facts.
#[derive(Debug, Clone)]
pub struct DialectDescriptor {
    /// Dialect tag.
    pub kind: DialectKind,

    /// Opening identifier quote.
    pub quote_open: char,

    /// Closing identifier quote (doubled when it appears inside a name).
    pub quote_close: char,

    /// String literal quote.
    pub string_quote: char,

    /// Default schema name, if the dialect has one.
    pub default_schema: Option<&'static str>,

    /// Maximum identifier length in characters, if limited.
    pub max_identifier_length: Option<usize>,

    /// Batch terminator line for procedural bodies (`/` or `GO`).
    pub batch_terminator: Option<&'static str>,

    /// Whether TRUE/FALSE literals are accepted.
    pub supports_boolean_literals: bool,

    /// Whether CREATE SEQUENCE exists.
    pub supports_sequences: bool,

    /// Case folding for unquoted identifiers.
    pub case_folding: CaseFolding,

    reserved: HashSet<&'static str>,
}

impl DialectDescriptor {
    /// Build the descriptor for a dialect.
    pub fn new(kind: DialectKind) -> Self {
        let (quote_open, quote_close) = match kind {
            DialectKind::Mysql => ('`', '`'),
            DialectKind::Sqlserver => ('[', ']'),
            DialectKind::Postgres | DialectKind::Sqlite | DialectKind::Oracle => ('"', '"'),
        };

        Self {
            kind,
            quote_open,
            quote_close,
            string_quote: '\'',
            default_schema: match kind {
                DialectKind::Postgres => Some("public"),
                DialectKind::Sqlite => Some("main"),
                DialectKind::Sqlserver => Some("dbo"),
                DialectKind::Mysql | DialectKind::Oracle => None,
            },
            max_identifier_length: match kind {
                DialectKind::Mysql => Some(64),
                DialectKind::Postgres => Some(63),
                DialectKind::Sqlite => None,
                DialectKind::Oracle | DialectKind::Sqlserver => Some(128),
            },
            batch_terminator: match kind {
                DialectKind::Oracle => Some("/"),
                DialectKind::Sqlserver => Some("GO"),
                _ => None,
            },
            supports_boolean_literals: matches!(kind, DialectKind::Mysql | DialectKind::Postgres),
            supports_sequences: matches!(
                kind,
                DialectKind::Postgres | DialectKind::Oracle | DialectKind::Sqlserver
            ),
            case_folding: match kind {
                DialectKind::Postgres => CaseFolding::Lower,
                DialectKind::Oracle => CaseFolding::Upper,
                _ => CaseFolding::Preserve,
            },
            reserved: reserved::words(kind).iter().copied().collect(),
        }
    }

    /// Dialect name.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Whether `word` is reserved (case-insensitive).
    pub fn is_reserved(&self, word: &str) -> bool {
        self.reserved.contains(word.to_ascii_uppercase().as_str())
    }

    /// Whether `name` can be written without quotes.
    ///
    /// Plain identifiers start with a letter or underscore, continue with
    /// letters, digits, `_` or `$`, and are not reserved.
    pub fn is_plain_identifier(&self, name: &str) -> bool {
        let mut chars = name.chars();
        let first_ok = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        first_ok
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
            && !self.is_reserved(name)
    }

    /// Wrap `name` in the dialect's identifier quotes, doubling the closing quote.
    pub fn quote(&self, name: &str) -> String {
        let escaped = name.replace(
            self.quote_close,
            &format!("{}{}", self.quote_close, self.quote_close),
        );
        format!("{}{}{}", self.quote_open, escaped, self.quote_close)
    }
}

/// Registry of descriptors, one per dialect, built once and shared.
#[derive(Debug, Clone)]
pub struct Descriptors {
    by_kind: [Arc<DialectDescriptor>; 5],
}

impl Descriptors {
    /// Build all five descriptors.
    pub fn builtin() -> Self {
        Self {
            by_kind: DialectKind::ALL.map(|kind| Arc::new(DialectDescriptor::new(kind))),
        }
    }

    /// Shared descriptor for `kind`.
    pub fn get(&self, kind: DialectKind) -> Arc<DialectDescriptor> {
        Arc::clone(&self.by_kind[kind.index()])
    }
}

impl Default for Descriptors {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // DialectKind tests
    // =========================================================================

    #[test]
    fn test_dialect_kind_from_str_aliases() {
        assert_eq!("PG".parse::<DialectKind>().unwrap(), DialectKind::Postgres);
        assert_eq!("postgresql".parse::<DialectKind>().unwrap(), DialectKind::Postgres);
        assert_eq!("mssql".parse::<DialectKind>().unwrap(), DialectKind::Sqlserver);
        assert_eq!("MySQL".parse::<DialectKind>().unwrap(), DialectKind::Mysql);
        assert!("db2".parse::<DialectKind>().is_err());
    }

    #[test]
    fn test_dialect_kind_serde() {
        let kind: DialectKind = serde_yaml::from_str("mssql").unwrap();
        assert_eq!(kind, DialectKind::Sqlserver);
        assert_eq!(serde_yaml::to_string(&DialectKind::Oracle).unwrap().trim(), "oracle");
    }

    #[test]
    fn test_display_matches_name() {
        for kind in DialectKind::ALL {
            assert_eq!(kind.to_string(), kind.name());
        }
    }

    // =========================================================================
    // Descriptor tests
    // =========================================================================

    #[test]
    fn test_descriptor_facts() {
        let d = Descriptors::builtin();
        assert_eq!(d.get(DialectKind::Mysql).quote_open, '`');
        assert_eq!(d.get(DialectKind::Sqlserver).quote_close, ']');
        assert_eq!(d.get(DialectKind::Postgres).default_schema, Some("public"));
        assert_eq!(d.get(DialectKind::Postgres).max_identifier_length, Some(63));
        assert_eq!(d.get(DialectKind::Sqlite).max_identifier_length, None);
        assert_eq!(d.get(DialectKind::Oracle).batch_terminator, Some("/"));
        assert!(!d.get(DialectKind::Mysql).supports_sequences);
    }

    #[test]
    fn test_descriptors_are_shared() {
        let d = Descriptors::builtin();
        assert!(Arc::ptr_eq(
            &d.get(DialectKind::Oracle),
            &d.get(DialectKind::Oracle)
        ));
    }

    #[test]
    fn test_quote_doubles_close_char() {
        let d = Descriptors::builtin();
        assert_eq!(d.get(DialectKind::Mysql).quote("a`b"), "`a``b`");
        assert_eq!(d.get(DialectKind::Sqlserver).quote("a]b"), "[a]]b]");
        assert_eq!(d.get(DialectKind::Postgres).quote("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_plain_identifier() {
        let pg = DialectDescriptor::new(DialectKind::Postgres);
        assert!(pg.is_plain_identifier("user_id"));
        assert!(!pg.is_plain_identifier("user id"));
        assert!(!pg.is_plain_identifier("1abc"));
        assert!(!pg.is_plain_identifier("select"));
        assert!(!pg.is_plain_identifier(""));
    }
}
