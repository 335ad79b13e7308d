//! Value conversion registry.
//!
//! Type *names* are bridged by the canonical type system; this registry
//! bridges type *values*. Each rule is keyed by a (source type, target type)
//! pair and may be scoped to source and target engine versions. When several
//! rules share a pair, the first whose version constraints hold wins.

use std::collections::HashMap;

use chrono::Timelike;
use tracing::debug;

use super::Version;
use crate::core::value::SqlValue;
use crate::error::{MapperError, Result};

/// Value conversion function.
pub type ConvertFn = fn(SqlValue) -> Result<SqlValue>;

/// A single conversion rule.
#[derive(Debug, Clone)]
pub struct TypeRule {
    /// Normalized source type key (e.g. `tinyint(1)`).
    pub source_type: String,

    /// Normalized target type key (e.g. `boolean`).
    pub target_type: String,

    /// Required source engine version, if scoped.
    pub source_version: Option<Version>,

    /// Required target engine version, if scoped.
    pub target_version: Option<Version>,

    /// Conversion logic.
    pub convert: ConvertFn,
}

impl TypeRule {
    /// Unscoped rule.
    pub fn new(source_type: &str, target_type: &str, convert: ConvertFn) -> Self {
        Self {
            source_type: normalize_type_key(source_type),
            target_type: normalize_type_key(target_type),
            source_version: None,
            target_version: None,
            convert,
        }
    }

    /// Scope the rule to a source version.
    pub fn for_source_version(mut self, version: Version) -> Self {
        self.source_version = Some(version);
        self
    }

    /// Scope the rule to a target version.
    pub fn for_target_version(mut self, version: Version) -> Self {
        self.target_version = Some(version);
        self
    }

    fn matches(&self, source_version: Option<&Version>, target_version: Option<&Version>) -> bool {
        version_ok(self.source_version.as_ref(), source_version)
            && version_ok(self.target_version.as_ref(), target_version)
    }
}

fn version_ok(required: Option<&Version>, actual: Option<&Version>) -> bool {
    match (required, actual) {
        (None, _) => true,
        (Some(req), Some(act)) => req.is_satisfied_by(act),
        (Some(_), None) => false,
    }
}

/// Normalize a type key: lowercase, single spaces, no spaces around parens/commas.
pub fn normalize_type_key(type_name: &str) -> String {
    let collapsed = type_name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    collapsed
        .replace(" (", "(")
        .replace("( ", "(")
        .replace(" )", ")")
        .replace(", ", ",")
        .replace(" ,", ",")
}

/// Base type name of a key (`tinyint(1)` -> `tinyint`).
fn base_key(key: &str) -> &str {
    key.split('(').next().unwrap_or(key).trim()
}

/// Registry of value conversion rules.
#[derive(Debug, Clone, Default)]
pub struct ValueRegistry {
    rules: HashMap<(String, String), Vec<TypeRule>>,
}

impl ValueRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in rules.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        // Boolean family: every ordered pair of boolean spellings.
        const BOOLEAN_KEYS: &[&str] = &["tinyint(1)", "boolean", "bool", "bit", "number(1)"];
        for source in BOOLEAN_KEYS {
            for target in BOOLEAN_KEYS {
                if source == target {
                    continue;
                }
                let convert: ConvertFn = if matches!(*target, "boolean" | "bool") {
                    to_boolean
                } else {
                    to_bit
                };
                registry.register(TypeRule::new(source, target, convert));
            }
        }
        // SQLite has no boolean type; booleans live in INTEGER columns.
        registry.register(TypeRule::new("integer", "boolean", to_boolean));
        registry.register(TypeRule::new("boolean", "integer", to_bit));

        // UUIDs
        registry.register(TypeRule::new("uuid", "uniqueidentifier", to_uuid_upper));
        registry.register(TypeRule::new("uniqueidentifier", "uuid", to_uuid_lower));
        registry.register(TypeRule::new("uuid", "char(36)", to_uuid_lower));
        registry.register(TypeRule::new("uuid", "varchar(36)", to_uuid_lower));
        registry.register(TypeRule::new("char(36)", "uuid", to_uuid_lower));
        registry.register(TypeRule::new("uniqueidentifier", "char(36)", to_uuid_lower));

        // Binary
        for (source, target) in [
            ("blob", "bytea"),
            ("bytea", "blob"),
            ("bytea", "varbinary"),
            ("varbinary", "bytea"),
            ("blob", "varbinary"),
            ("varbinary", "blob"),
            ("raw", "bytea"),
            ("bytea", "raw"),
            ("longblob", "bytea"),
        ] {
            registry.register(TypeRule::new(source, target, to_bytes));
        }

        // Temporal. MySQL before 5.6 stores DATETIME without fractional seconds.
        registry.register(
            TypeRule::new("datetime", "timestamp", to_timestamp)
                .for_source_version(Version::new(5, 6)),
        );
        registry.register(
            TypeRule::new("datetime", "timestamp", truncate_fraction)
                .for_source_version(Version::new(5, 0)),
        );
        registry.register(
            TypeRule::new("timestamp", "datetime", to_timestamp)
                .for_target_version(Version::new(5, 6)),
        );
        registry.register(
            TypeRule::new("timestamp", "datetime", truncate_fraction)
                .for_target_version(Version::new(5, 0)),
        );
        for (source, target) in [
            ("datetime", "timestamp"),
            ("timestamp", "datetime"),
            ("datetime", "datetime2"),
            ("datetime2", "datetime"),
            ("timestamp", "datetime2"),
            ("datetime2", "timestamp"),
            ("timestamptz", "datetimeoffset"),
            ("datetimeoffset", "timestamptz"),
            ("date", "date"),
            ("date", "timestamp"),
            ("date", "datetime"),
        ] {
            registry.register(TypeRule::new(source, target, to_timestamp));
        }

        // JSON is text on both sides.
        for (source, target) in [("json", "jsonb"), ("jsonb", "json"), ("json", "nvarchar(max)")] {
            registry.register(TypeRule::new(source, target, to_text));
        }

        registry
    }

    /// Append a rule. Rules for the same pair are tried in registration order.
    pub fn register(&mut self, rule: TypeRule) {
        self.rules
            .entry((rule.source_type.clone(), rule.target_type.clone()))
            .or_default()
            .push(rule);
    }

    /// Whether any rule exists for the pair, regardless of version.
    pub fn has_mapping(&self, source_type: &str, target_type: &str) -> bool {
        self.candidates(source_type, target_type).is_some()
    }

    /// Convert `value` from `source_type` to `target_type`.
    ///
    /// Keys are tried exactly first (`tinyint(1)`), then by base name
    /// (`tinyint`). NULL converts to NULL whenever a rule exists.
    ///
    /// # Errors
    ///
    /// `NoTypeMappingFound` when no rule matches the pair and versions, or
    /// when the rule cannot represent the given value.
    pub fn convert_type(
        &self,
        value: SqlValue,
        source_type: &str,
        target_type: &str,
        source_version: Option<&Version>,
        target_version: Option<&Version>,
    ) -> Result<SqlValue> {
        let rules = self
            .candidates(source_type, target_type)
            .ok_or_else(|| MapperError::no_mapping(source_type, target_type))?;

        let rule = rules
            .iter()
            .find(|r| r.matches(source_version, target_version))
            .ok_or_else(|| MapperError::no_mapping(source_type, target_type))?;

        debug!(
            "Converting {} value from {} to {}",
            value.variant_name(),
            rule.source_type,
            rule.target_type
        );

        if value.is_null() {
            return Ok(SqlValue::Null);
        }
        (rule.convert)(value).map_err(|_| MapperError::no_mapping(source_type, target_type))
    }

    fn candidates(&self, source_type: &str, target_type: &str) -> Option<&Vec<TypeRule>> {
        let source = normalize_type_key(source_type);
        let target = normalize_type_key(target_type);
        let keys = [
            (source.clone(), target.clone()),
            (source.clone(), base_key(&target).to_string()),
            (base_key(&source).to_string(), target.clone()),
            (base_key(&source).to_string(), base_key(&target).to_string()),
        ];
        keys.iter().find_map(|k| self.rules.get(k))
    }
}

fn unrepresentable(value: &SqlValue, target: &str) -> MapperError {
    MapperError::no_mapping(value.variant_name(), target)
}

fn to_boolean(value: SqlValue) -> Result<SqlValue> {
    value
        .as_bool()
        .map(SqlValue::Boolean)
        .ok_or_else(|| unrepresentable(&value, "boolean"))
}

fn to_bit(value: SqlValue) -> Result<SqlValue> {
    value
        .as_bool()
        .map(|b| SqlValue::Integer(i64::from(b)))
        .ok_or_else(|| unrepresentable(&value, "bit"))
}

fn normalize_uuid(value: &SqlValue) -> Option<String> {
    match value {
        SqlValue::Text(s) => {
            let hex: String = s
                .trim()
                .trim_matches(|c| c == '{' || c == '}')
                .chars()
                .filter(|c| *c != '-')
                .collect();
            (hex.len() == 32 && hex.chars().all(|c| c.is_ascii_hexdigit())).then_some(hex)
        }
        SqlValue::Bytes(b) if b.len() == 16 => {
            Some(b.iter().map(|x| format!("{:02x}", x)).collect())
        }
        _ => None,
    }
}

fn hyphenate(hex: &str) -> String {
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

fn to_uuid_lower(value: SqlValue) -> Result<SqlValue> {
    normalize_uuid(&value)
        .map(|hex| SqlValue::Text(hyphenate(&hex.to_lowercase())))
        .ok_or_else(|| unrepresentable(&value, "uuid"))
}

fn to_uuid_upper(value: SqlValue) -> Result<SqlValue> {
    normalize_uuid(&value)
        .map(|hex| SqlValue::Text(hyphenate(&hex.to_uppercase())))
        .ok_or_else(|| unrepresentable(&value, "uniqueidentifier"))
}

fn to_bytes(value: SqlValue) -> Result<SqlValue> {
    match value {
        SqlValue::Bytes(b) => Ok(SqlValue::Bytes(b)),
        SqlValue::Text(ref s) => {
            let hex = s
                .strip_prefix("\\x")
                .or_else(|| s.strip_prefix("0x"))
                .unwrap_or(s);
            decode_hex(hex)
                .map(SqlValue::Bytes)
                .ok_or_else(|| unrepresentable(&value, "bytes"))
        }
        other => Err(unrepresentable(&other, "bytes")),
    }
}

fn decode_hex(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| hex.get(i..i + 2).and_then(|h| u8::from_str_radix(h, 16).ok()))
        .collect()
}

fn to_timestamp(value: SqlValue) -> Result<SqlValue> {
    value
        .as_timestamp()
        .map(SqlValue::Timestamp)
        .ok_or_else(|| unrepresentable(&value, "timestamp"))
}

fn truncate_fraction(value: SqlValue) -> Result<SqlValue> {
    let ts = value
        .as_timestamp()
        .ok_or_else(|| unrepresentable(&value, "timestamp"))?;
    ts.with_nanosecond(0)
        .map(SqlValue::Timestamp)
        .ok_or_else(|| unrepresentable(&value, "timestamp"))
}

fn to_text(value: SqlValue) -> Result<SqlValue> {
    match value {
        SqlValue::Text(s) => Ok(SqlValue::Text(s)),
        other => Err(unrepresentable(&other, "text")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::core::value::parse_timestamp;

    fn registry() -> ValueRegistry {
        ValueRegistry::with_builtins()
    }

    // =========================================================================
    // Boolean family
    // =========================================================================

    #[test]
    fn test_tinyint_one_to_boolean() {
        let v = registry()
            .convert_type(SqlValue::Integer(1), "tinyint(1)", "boolean", None, None)
            .unwrap();
        assert_eq!(v, SqlValue::Boolean(true));
    }

    #[test]
    fn test_boolean_to_bit() {
        let v = registry()
            .convert_type(SqlValue::Boolean(false), "boolean", "bit", None, None)
            .unwrap();
        assert_eq!(v, SqlValue::Integer(0));
    }

    #[test]
    fn test_number_one_to_boolean_from_text() {
        let v = registry()
            .convert_type(SqlValue::Text("1".into()), "NUMBER(1)", "BOOLEAN", None, None)
            .unwrap();
        assert_eq!(v, SqlValue::Boolean(true));
    }

    #[test]
    fn test_boolean_rejects_garbage() {
        let err = registry()
            .convert_type(SqlValue::Text("perhaps".into()), "bit", "boolean", None, None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoTypeMappingFound);
    }

    #[test]
    fn test_null_passes_through() {
        let v = registry()
            .convert_type(SqlValue::Null, "tinyint(1)", "boolean", None, None)
            .unwrap();
        assert!(v.is_null());
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    #[test]
    fn test_missing_pair_fails() {
        let err = registry()
            .convert_type(SqlValue::Integer(1), "tinyint(1)", "uuid", None, None)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoTypeMappingFound);
    }

    #[test]
    fn test_base_name_fallback() {
        // varbinary(255) has no exact rule; the base name does.
        assert!(registry().has_mapping("blob", "bytea"));
        assert!(registry().has_mapping("varbinary(255)", "bytea"));
    }

    #[test]
    fn test_normalize_type_key() {
        assert_eq!(normalize_type_key("  TINYINT ( 1 ) "), "tinyint(1)");
        assert_eq!(normalize_type_key("Decimal(10, 2)"), "decimal(10,2)");
        assert_eq!(normalize_type_key("double   precision"), "double precision");
    }

    // =========================================================================
    // Version scoping
    // =========================================================================

    #[test]
    fn test_version_scoped_rule_wins_when_satisfied() {
        let ts = parse_timestamp("2024-05-01 10:00:00.123456").unwrap();
        let v = registry()
            .convert_type(
                SqlValue::Timestamp(ts),
                "datetime",
                "timestamp",
                Some(&Version::new(5, 5)),
                None,
            )
            .unwrap();
        assert_eq!(v, SqlValue::Timestamp(ts.with_nanosecond(0).unwrap()));
    }

    #[test]
    fn test_first_satisfied_rule_keeps_fraction() {
        let ts = parse_timestamp("2024-05-01 10:00:00.5").unwrap();
        let v = registry()
            .convert_type(
                SqlValue::Timestamp(ts),
                "datetime",
                "timestamp",
                Some(&Version::new(5, 7)),
                None,
            )
            .unwrap();
        assert_eq!(v, SqlValue::Timestamp(ts));
    }

    #[test]
    fn test_unconstrained_rule_used_for_other_versions() {
        let ts = parse_timestamp("2024-05-01 10:00:00.123456").unwrap();
        let v = registry()
            .convert_type(
                SqlValue::Timestamp(ts),
                "datetime",
                "timestamp",
                Some(&Version::new(8, 0)),
                None,
            )
            .unwrap();
        assert_eq!(v, SqlValue::Timestamp(ts));
    }

    #[test]
    fn test_scoped_rule_only_registry() {
        let mut reg = ValueRegistry::new();
        reg.register(TypeRule::new("a", "b", to_text).for_source_version(Version::new(2, 3)));
        let value = SqlValue::Text("x".into());
        assert!(reg
            .convert_type(value.clone(), "a", "b", Some(&Version::new(2, 4)), None)
            .is_ok());
        assert!(reg
            .convert_type(value.clone(), "a", "b", Some(&Version::new(2, 2)), None)
            .is_err());
        assert!(reg
            .convert_type(value.clone(), "a", "b", Some(&Version::new(3, 3)), None)
            .is_err());
        assert!(reg.convert_type(value, "a", "b", None, None).is_err());
    }

    // =========================================================================
    // Other families
    // =========================================================================

    #[test]
    fn test_uuid_to_uniqueidentifier() {
        let v = registry()
            .convert_type(
                SqlValue::Text("{6f9619ff-8b86-d011-b42d-00c04fc964ff}".into()),
                "uuid",
                "uniqueidentifier",
                None,
                None,
            )
            .unwrap();
        assert_eq!(
            v,
            SqlValue::Text("6F9619FF-8B86-D011-B42D-00C04FC964FF".into())
        );
    }

    #[test]
    fn test_bytea_hex_text_to_blob() {
        let v = registry()
            .convert_type(SqlValue::Text("\\xcafe".into()), "bytea", "blob", None, None)
            .unwrap();
        assert_eq!(v, SqlValue::Bytes(vec![0xCA, 0xFE]));
    }
}
