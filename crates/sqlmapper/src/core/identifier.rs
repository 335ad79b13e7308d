//! Centralized identifier validation and quoting.
//!
//! Every generator routes table, column, constraint and index names through
//! [`quote_identifier`], so limits and reserved-word handling are checked in
//! one place for all five dialects.
//!
//! Quoting wraps the name in the dialect's delimiters and doubles any
//! closing delimiter inside it:
//!
//! | Dialect    | Quoted           |
//! |------------|------------------|
//! | MySQL      | `` `a``b` ``     |
//! | PostgreSQL | `"a""b"`         |
//! | SQLite     | `"a""b"`         |
//! | Oracle     | `"a""b"`         |
//! | SQL Server | `[a]]b]`         |

use serde::{Deserialize, Serialize};

use crate::dialect::DialectDescriptor;
use crate::error::{MapperError, Result};

/// When generators quote identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuotePolicy {
    /// Quote only names that are reserved or not plain identifiers.
    #[default]
    AsNeeded,
    /// Quote every name.
    Always,
    /// Never quote; reserved or irregular names are errors.
    Never,
}

/// Validate an identifier against a dialect's limits.
///
/// # Errors
///
/// - `MalformedStatement` for empty identifiers or identifiers containing NUL
/// - `IdentifierTooLong` when the name exceeds the dialect's maximum length
pub fn validate_identifier(name: &str, dialect: &DialectDescriptor) -> Result<()> {
    if name.is_empty() {
        return Err(MapperError::malformed(name, "identifier cannot be empty"));
    }

    if name.contains('\0') {
        return Err(MapperError::malformed(
            name.replace('\0', "\\0"),
            "identifier contains a null byte",
        ));
    }

    if let Some(max) = dialect.max_identifier_length {
        if name.chars().count() > max {
            return Err(MapperError::IdentifierTooLong {
                name: name.to_string(),
                max,
                dialect: dialect.name().to_string(),
            });
        }
    }

    Ok(())
}

/// Validate and render an identifier for a dialect.
///
/// # Examples
///
/// ```ignore
/// let pg = Descriptors::builtin().get(DialectKind::Postgres);
/// assert_eq!(quote_identifier("users", &pg, QuotePolicy::AsNeeded)?, "users");
/// assert_eq!(quote_identifier("order", &pg, QuotePolicy::AsNeeded)?, "\"order\"");
/// ```
pub fn quote_identifier(
    name: &str,
    dialect: &DialectDescriptor,
    policy: QuotePolicy,
) -> Result<String> {
    validate_identifier(name, dialect)?;

    match policy {
        QuotePolicy::Always => Ok(dialect.quote(name)),
        QuotePolicy::AsNeeded => {
            if dialect.is_plain_identifier(name) {
                Ok(name.to_string())
            } else {
                Ok(dialect.quote(name))
            }
        }
        QuotePolicy::Never => {
            if dialect.is_reserved(name) {
                Err(MapperError::ReservedWordCollision {
                    word: name.to_string(),
                    dialect: dialect.name().to_string(),
                })
            } else if !dialect.is_plain_identifier(name) {
                Err(MapperError::unsupported(
                    format!("identifier '{}' requires quoting", name),
                    dialect.kind,
                ))
            } else {
                Ok(name.to_string())
            }
        }
    }
}

/// Qualify an object name with its schema, quoting both parts.
pub fn qualify(
    schema: Option<&str>,
    name: &str,
    dialect: &DialectDescriptor,
    policy: QuotePolicy,
) -> Result<String> {
    let object = quote_identifier(name, dialect, policy)?;
    match schema {
        Some(schema) if !schema.is_empty() => Ok(format!(
            "{}.{}",
            quote_identifier(schema, dialect, policy)?,
            object
        )),
        _ => Ok(object),
    }
}

/// Strip one level of identifier quoting as written in any dialect.
///
/// Handles `"x"`, `` `x` `` and `[x]`, un-doubling the escaped closing quote.
/// Unquoted text is returned unchanged.
pub fn unquote(text: &str) -> String {
    let mut chars = text.chars();
    let (open, close) = match chars.next() {
        Some('"') => ('"', '"'),
        Some('`') => ('`', '`'),
        Some('[') => ('[', ']'),
        _ => return text.to_string(),
    };
    if text.len() < 2 || !text.ends_with(close) {
        return text.to_string();
    }
    let inner = &text[open.len_utf8()..text.len() - close.len_utf8()];
    inner.replace(&format!("{}{}", close, close), &close.to_string())
}
