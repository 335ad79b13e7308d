//! Character set and collation capability tables.
//!
//! Independent by-name registries. A generator asks whether a charset or
//! collation carried on a source column is representable in its dialect
//! and drops it otherwise.

use std::collections::HashMap;

use super::DialectKind;

/// Capability record for a character set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharsetInfo {
    /// Canonical lowercase name.
    pub name: &'static str,

    /// Maximum bytes used to encode one character.
    pub max_bytes_per_char: u8,

    /// Dialects that accept this charset by name.
    pub dialects: Vec<DialectKind>,
}

impl CharsetInfo {
    pub fn supports(&self, dialect: DialectKind) -> bool {
        self.dialects.contains(&dialect)
    }
}

/// Registry of known character sets.
#[derive(Debug, Clone, Default)]
pub struct CharsetRegistry {
    entries: HashMap<String, CharsetInfo>,
}

impl CharsetRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry populated with the charsets the five dialects name in DDL.
    pub fn with_builtins() -> Self {
        use DialectKind::*;

        let mut registry = Self::new();
        registry.register(CharsetInfo {
            name: "utf8mb4",
            max_bytes_per_char: 4,
            dialects: vec![Mysql],
        });
        registry.register(CharsetInfo {
            name: "utf8mb3",
            max_bytes_per_char: 3,
            dialects: vec![Mysql],
        });
        registry.register(CharsetInfo {
            name: "utf8",
            max_bytes_per_char: 4,
            dialects: vec![Mysql, Postgres, Sqlite],
        });
        registry.register(CharsetInfo {
            name: "latin1",
            max_bytes_per_char: 1,
            dialects: vec![Mysql, Postgres],
        });
        registry.register(CharsetInfo {
            name: "ascii",
            max_bytes_per_char: 1,
            dialects: vec![Mysql],
        });
        registry.register(CharsetInfo {
            name: "utf16",
            max_bytes_per_char: 4,
            dialects: vec![Mysql, Sqlite],
        });
        registry.register(CharsetInfo {
            name: "ucs2",
            max_bytes_per_char: 2,
            dialects: vec![Mysql],
        });
        registry.register(CharsetInfo {
            name: "al32utf8",
            max_bytes_per_char: 4,
            dialects: vec![Oracle],
        });
        registry.register(CharsetInfo {
            name: "we8iso8859p1",
            max_bytes_per_char: 1,
            dialects: vec![Oracle],
        });
        registry.register(CharsetInfo {
            name: "win1252",
            max_bytes_per_char: 1,
            dialects: vec![Postgres],
        });
        registry.register(CharsetInfo {
            name: "sql_ascii",
            max_bytes_per_char: 1,
            dialects: vec![Postgres],
        });
        registry
    }

    /// Register (or replace) a charset.
    pub fn register(&mut self, info: CharsetInfo) {
        self.entries.insert(info.name.to_string(), info);
    }

    /// Look up a charset by name, ignoring case.
    pub fn lookup(&self, name: &str) -> Option<&CharsetInfo> {
        self.entries.get(&name.to_lowercase())
    }

    /// Whether `name` is known and accepted by `dialect`.
    pub fn is_supported(&self, name: &str, dialect: DialectKind) -> bool {
        self.lookup(name).is_some_and(|c| c.supports(dialect))
    }
}

/// Capability record for a collation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollationInfo {
    /// Canonical lowercase name.
    pub name: &'static str,

    /// Character set the collation belongs to, if any.
    pub charset: Option<&'static str>,

    /// Dialects that accept this collation by name.
    pub dialects: Vec<DialectKind>,
}

/// Registry of known collations.
#[derive(Debug, Clone, Default)]
pub struct CollationRegistry {
    entries: HashMap<String, CollationInfo>,
}

impl CollationRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry populated with common collations per dialect.
    pub fn with_builtins() -> Self {
        use DialectKind::*;

        let mut registry = Self::new();
        let mysql = [
            ("utf8mb4_general_ci", "utf8mb4"),
            ("utf8mb4_unicode_ci", "utf8mb4"),
            ("utf8mb4_0900_ai_ci", "utf8mb4"),
            ("utf8mb4_bin", "utf8mb4"),
            ("utf8_general_ci", "utf8"),
            ("utf8_unicode_ci", "utf8"),
            ("utf8_bin", "utf8"),
            ("latin1_swedish_ci", "latin1"),
            ("latin1_bin", "latin1"),
            ("ascii_general_ci", "ascii"),
        ];
        for (name, charset) in mysql {
            registry.register(CollationInfo {
                name,
                charset: Some(charset),
                dialects: vec![Mysql],
            });
        }

        registry.register(CollationInfo {
            name: "c",
            charset: None,
            dialects: vec![Postgres],
        });
        registry.register(CollationInfo {
            name: "posix",
            charset: None,
            dialects: vec![Postgres],
        });
        registry.register(CollationInfo {
            name: "en_us.utf8",
            charset: Some("utf8"),
            dialects: vec![Postgres],
        });
        registry.register(CollationInfo {
            name: "und-x-icu",
            charset: None,
            dialects: vec![Postgres],
        });

        for name in ["binary", "nocase", "rtrim"] {
            registry.register(CollationInfo {
                name,
                charset: None,
                dialects: vec![Sqlite],
            });
        }

        for name in ["binary_ci", "binary_ai", "xgerman", "generic_m"] {
            registry.register(CollationInfo {
                name,
                charset: None,
                dialects: vec![Oracle],
            });
        }

        for name in [
            "sql_latin1_general_cp1_ci_as",
            "sql_latin1_general_cp1_cs_as",
            "latin1_general_ci_as",
            "latin1_general_bin",
            "latin1_general_100_ci_as_sc_utf8",
        ] {
            registry.register(CollationInfo {
                name,
                charset: None,
                dialects: vec![Sqlserver],
            });
        }
        registry
    }

    /// Register (or replace) a collation.
    pub fn register(&mut self, info: CollationInfo) {
        self.entries.insert(info.name.to_string(), info);
    }

    /// Look up a collation by name, ignoring case and surrounding quotes.
    pub fn lookup(&self, name: &str) -> Option<&CollationInfo> {
        let key = name.trim_matches(|c| c == '"' || c == '\'').to_lowercase();
        self.entries.get(&key)
    }

    /// Whether `name` is known and accepted by `dialect`.
    pub fn is_supported(&self, name: &str, dialect: DialectKind) -> bool {
        self.lookup(name)
            .is_some_and(|c| c.dialects.contains(&dialect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charset_lookup_ignores_case() {
        let registry = CharsetRegistry::with_builtins();
        let info = registry.lookup("UTF8MB4").unwrap();
        assert_eq!(info.max_bytes_per_char, 4);
        assert!(info.supports(DialectKind::Mysql));
        assert!(!info.supports(DialectKind::Postgres));
    }

    #[test]
    fn test_charset_unknown() {
        let registry = CharsetRegistry::with_builtins();
        assert!(registry.lookup("klingon").is_none());
        assert!(!registry.is_supported("klingon", DialectKind::Mysql));
    }

    #[test]
    fn test_charset_shared_name() {
        let registry = CharsetRegistry::with_builtins();
        assert!(registry.is_supported("utf8", DialectKind::Postgres));
        assert!(!registry.is_supported("utf8", DialectKind::Sqlserver));
    }

    #[test]
    fn test_collation_lookup() {
        let registry = CollationRegistry::with_builtins();
        assert!(registry.is_supported("utf8mb4_unicode_ci", DialectKind::Mysql));
        assert!(!registry.is_supported("utf8mb4_unicode_ci", DialectKind::Postgres));
        assert!(registry.is_supported("NOCASE", DialectKind::Sqlite));
        assert!(registry.is_supported("\"C\"", DialectKind::Postgres));
        assert_eq!(
            registry.lookup("latin1_bin").unwrap().charset,
            Some("latin1")
        );
    }
}
