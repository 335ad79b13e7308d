//! Driver catalog for explicit dependency injection.
//!
//! The [`DriverCatalog`] holds every shared, read-only table the parsers and
//! generators consult: dialect descriptors, type mappers, the value
//! conversion registry and the charset/collation registries. It is built
//! once, wrapped in an `Arc` and handed to each dialect; nothing in it is
//! global.
//!
//! # Design Rationale
//!
//! - **No global state**: registries are plain values, not lazy statics
//! - **Explicit registration**: clear, deterministic initialization order
//! - **Testable**: tests can build a catalog with extra or replaced rules

use std::collections::HashMap;
use std::sync::Arc;

use crate::dialect::{
    CharsetRegistry, CollationRegistry, DialectDescriptor, DialectKind, Descriptors,
    ValueRegistry,
};
use crate::error::{MapperError, Result};

use super::traits::TypeMapper;

/// Registry of dialect descriptors, type mappers and value rules.
///
/// # Example
///
/// ```rust,ignore
/// let catalog = DriverCatalog::with_builtins();
/// let mapper = catalog.mapper(DialectKind::Mysql, DialectKind::Postgres)?;
/// let mapping = mapper.map_type(&DataType::with_length("tinyint", 1));
/// assert_eq!(mapping.target_type, "boolean");
/// ```
pub struct DriverCatalog {
    descriptors: Descriptors,

    /// Type mappers keyed by (source, target) dialect pair.
    type_mappers: HashMap<(DialectKind, DialectKind), Arc<dyn TypeMapper>>,

    values: ValueRegistry,
    charsets: CharsetRegistry,
    collations: CollationRegistry,
}

impl Default for DriverCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DriverCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut pairs: Vec<String> = self
            .type_mappers
            .keys()
            .map(|(s, t)| format!("{}->{}", s, t))
            .collect();
        pairs.sort();
        f.debug_struct("DriverCatalog")
            .field("type_mappers", &pairs)
            .finish_non_exhaustive()
    }
}

impl DriverCatalog {
    /// Create a catalog with descriptors but no mappers and empty registries.
    pub fn new() -> Self {
        Self {
            descriptors: Descriptors::builtin(),
            type_mappers: HashMap::new(),
            values: ValueRegistry::new(),
            charsets: CharsetRegistry::new(),
            collations: CollationRegistry::new(),
        }
    }

    /// Create a catalog with the standard built-in mappers and registries.
    ///
    /// # Canonical Type System
    ///
    /// Every source→target combination uses a
    /// [`ComposedMapper`](crate::dialect::ComposedMapper) pairing the
    /// source's `ToCanonical` with the target's `FromCanonical`. Same-dialect
    /// pairs use [`IdentityMapper`](crate::dialect::IdentityMapper).
    pub fn with_builtins() -> Self {
        use crate::dialect::{
            ComposedMapper, FromCanonical, IdentityMapper, MssqlFromCanonical, MssqlToCanonical,
            MysqlFromCanonical, MysqlToCanonical, OracleFromCanonical, OracleToCanonical,
            PostgresFromCanonical, PostgresToCanonical, SqliteFromCanonical, SqliteToCanonical,
            ToCanonical,
        };

        let mut catalog = Self::new();
        catalog.values = ValueRegistry::with_builtins();
        catalog.charsets = CharsetRegistry::with_builtins();
        catalog.collations = CollationRegistry::with_builtins();

        let to: Vec<Arc<dyn ToCanonical>> = vec![
            Arc::new(MysqlToCanonical::new()),
            Arc::new(PostgresToCanonical::new()),
            Arc::new(SqliteToCanonical::new()),
            Arc::new(OracleToCanonical::new()),
            Arc::new(MssqlToCanonical::new()),
        ];
        let from: Vec<Arc<dyn FromCanonical>> = vec![
            Arc::new(MysqlFromCanonical::new()),
            Arc::new(PostgresFromCanonical::new()),
            Arc::new(SqliteFromCanonical::new()),
            Arc::new(OracleFromCanonical::new()),
            Arc::new(MssqlFromCanonical::new()),
        ];

        for source in &to {
            for target in &from {
                let (s, t) = (source.dialect(), target.dialect());
                if s == t {
                    catalog.register_mapper(s, t, Arc::new(IdentityMapper::new(s)));
                } else {
                    catalog.register_mapper(
                        s,
                        t,
                        Arc::new(ComposedMapper::new(source.clone(), target.clone())),
                    );
                }
            }
        }

        catalog
    }

    /// Register a type mapper for a source→target pair.
    pub fn register_mapper(
        &mut self,
        source: DialectKind,
        target: DialectKind,
        mapper: Arc<dyn TypeMapper>,
    ) {
        self.type_mappers.insert((source, target), mapper);
    }

    /// Type mapper for a source→target pair.
    ///
    /// # Errors
    ///
    /// Returns `MapperError::Config` when no mapper is registered.
    pub fn mapper(&self, source: DialectKind, target: DialectKind) -> Result<Arc<dyn TypeMapper>> {
        self.type_mappers
            .get(&(source, target))
            .cloned()
            .ok_or_else(|| {
                MapperError::Config(format!(
                    "No type mapper registered for {} -> {}",
                    source, target
                ))
            })
    }

    /// Whether a mapper is registered for the pair.
    pub fn has_mapper(&self, source: DialectKind, target: DialectKind) -> bool {
        self.type_mappers.contains_key(&(source, target))
    }

    /// Shared descriptor for a dialect.
    pub fn descriptor(&self, kind: DialectKind) -> Arc<DialectDescriptor> {
        self.descriptors.get(kind)
    }

    /// Value conversion rules.
    pub fn values(&self) -> &ValueRegistry {
        &self.values
    }

    /// Mutable value rules, for registering extra conversions before sharing.
    pub fn values_mut(&mut self) -> &mut ValueRegistry {
        &mut self.values
    }

    /// Charset capabilities.
    pub fn charsets(&self) -> &CharsetRegistry {
        &self.charsets
    }

    /// Collation capabilities.
    pub fn collations(&self) -> &CollationRegistry {
        &self.collations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::schema::DataType;

    #[test]
    fn test_builtins_cover_every_pair() {
        let catalog = DriverCatalog::with_builtins();
        for source in DialectKind::ALL {
            for target in DialectKind::ALL {
                let mapper = catalog.mapper(source, target).unwrap();
                assert_eq!(mapper.source_dialect(), source);
                assert_eq!(mapper.target_dialect(), target);
            }
        }
    }

    #[test]
    fn test_registered_value_rule_is_used() {
        use crate::core::value::SqlValue;
        use crate::dialect::TypeRule;

        let mut catalog = DriverCatalog::with_builtins();
        assert!(!catalog.values().has_mapping("geo_code", "char(2)"));

        catalog.values_mut().register(TypeRule::new("geo_code", "char(2)", |value| match value {
            SqlValue::Text(code) => Ok(SqlValue::Text(code.to_uppercase())),
            other => Ok(other),
        }));

        let value = catalog
            .values()
            .convert_type(SqlValue::Text("de".into()), "GEO_CODE", "CHAR(2)", None, None)
            .unwrap();
        assert_eq!(value, SqlValue::Text("DE".into()));
    }

    #[test]
    fn test_empty_catalog_has_no_mappers() {
        let catalog = DriverCatalog::new();
        assert!(!catalog.has_mapper(DialectKind::Mysql, DialectKind::Postgres));
        let err = catalog
            .mapper(DialectKind::Mysql, DialectKind::Postgres)
            .err()
            .unwrap();
        assert!(err.to_string().contains("mysql -> postgres"));
    }

    #[test]
    fn test_identity_mapper_for_same_dialect() {
        let catalog = DriverCatalog::with_builtins();
        let mapper = catalog
            .mapper(DialectKind::Mysql, DialectKind::Mysql)
            .unwrap();
        let mapping = mapper.map_type(&DataType::with_length("tinyint", 1));
        assert_eq!(mapping.target_type, "tinyint(1)");
    }

    #[test]
    fn test_builtin_registries_populated() {
        let catalog = DriverCatalog::with_builtins();
        assert!(catalog.values().has_mapping("tinyint(1)", "boolean"));
        assert!(catalog
            .charsets()
            .is_supported("utf8mb4", DialectKind::Mysql));
        assert!(catalog
            .collations()
            .is_supported("nocase", DialectKind::Sqlite));
        assert_eq!(
            catalog.descriptor(DialectKind::Sqlserver).quote_open,
            '['
        );
    }
}
