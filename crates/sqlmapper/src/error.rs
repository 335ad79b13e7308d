//! Error types for DDL conversion.

use thiserror::Error;

/// Main error type for parse, generate and conversion operations.
#[derive(Error, Debug)]
pub enum MapperError {
    /// Parser was handed empty (or whitespace/comment-only) text.
    #[error("Empty input: no DDL statements to parse")]
    EmptyInput,

    /// A recognized statement whose body does not match the expected shape.
    #[error("Malformed statement: {reason}\n  Statement: {statement}")]
    MalformedStatement { statement: String, reason: String },

    /// A recognized construct with no representation in the dialect.
    #[error("Unsupported construct for {dialect}: {construct}")]
    UnsupportedConstruct { construct: String, dialect: String },

    /// Identifier exceeds the dialect's maximum length.
    #[error("Identifier '{name}' exceeds the {dialect} maximum of {max} characters")]
    IdentifierTooLong {
        name: String,
        max: usize,
        dialect: String,
    },

    /// Identifier is a reserved word and may not be quoted.
    #[error("Identifier '{word}' is a reserved word in {dialect}")]
    ReservedWordCollision { word: String, dialect: String },

    /// No value conversion rule for the type pair.
    #[error("No type mapping found from '{source_type}' to '{target_type}'")]
    NoTypeMappingFound {
        source_type: String,
        target_type: String,
    },

    /// Generator was called without a schema.
    #[error("No schema to generate")]
    NilSchema,

    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A batch job exceeded its deadline.
    #[error("Job {job} timed out after {seconds}s")]
    Timeout { job: String, seconds: u64 },

    /// Run was cancelled (SIGINT, etc.)
    #[error("Conversion cancelled")]
    Cancelled,
}

/// Error taxonomy tag, independent of the context carried by [`MapperError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    EmptyInput,
    MalformedStatement,
    UnsupportedConstruct,
    IdentifierTooLong,
    ReservedWordCollision,
    NoTypeMappingFound,
    NilSchema,
    Config,
    Io,
    Timeout,
    Cancelled,
}

impl MapperError {
    /// Create a MalformedStatement error.
    pub fn malformed(statement: impl AsRef<str>, reason: impl Into<String>) -> Self {
        MapperError::MalformedStatement {
            statement: abbreviate(statement.as_ref()),
            reason: reason.into(),
        }
    }

    /// Create an UnsupportedConstruct error.
    pub fn unsupported(construct: impl Into<String>, dialect: impl ToString) -> Self {
        MapperError::UnsupportedConstruct {
            construct: construct.into(),
            dialect: dialect.to_string(),
        }
    }

    /// Create a NoTypeMappingFound error.
    pub fn no_mapping(source_type: impl Into<String>, target_type: impl Into<String>) -> Self {
        MapperError::NoTypeMappingFound {
            source_type: source_type.into(),
            target_type: target_type.into(),
        }
    }

    /// Taxonomy tag of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MapperError::EmptyInput => ErrorKind::EmptyInput,
            MapperError::MalformedStatement { .. } => ErrorKind::MalformedStatement,
            MapperError::UnsupportedConstruct { .. } => ErrorKind::UnsupportedConstruct,
            MapperError::IdentifierTooLong { .. } => ErrorKind::IdentifierTooLong,
            MapperError::ReservedWordCollision { .. } => ErrorKind::ReservedWordCollision,
            MapperError::NoTypeMappingFound { .. } => ErrorKind::NoTypeMappingFound,
            MapperError::NilSchema => ErrorKind::NilSchema,
            MapperError::Config(_) | MapperError::Yaml(_) | MapperError::Json(_) => {
                ErrorKind::Config
            }
            MapperError::Io(_) => ErrorKind::Io,
            MapperError::Timeout { .. } => ErrorKind::Timeout,
            MapperError::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Process exit code for this error.
    ///
    /// | Code | Meaning |
    /// |------|---------|
    /// | 1 | Configuration error |
    /// | 2 | Parse error (empty or malformed input) |
    /// | 3 | Target dialect cannot express the input |
    /// | 4 | Identifier rejected by the target dialect |
    /// | 5 | Type mapping error |
    /// | 6 | Timeout |
    /// | 7 | IO error |
    /// | 130 | Cancelled |
    pub fn exit_code(&self) -> u8 {
        match self.kind() {
            ErrorKind::Config => 1,
            ErrorKind::EmptyInput | ErrorKind::MalformedStatement | ErrorKind::NilSchema => 2,
            ErrorKind::UnsupportedConstruct => 3,
            ErrorKind::IdentifierTooLong | ErrorKind::ReservedWordCollision => 4,
            ErrorKind::NoTypeMappingFound => 5,
            ErrorKind::Timeout => 6,
            ErrorKind::Io => 7,
            ErrorKind::Cancelled => 130,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Collapse whitespace and cap statement text quoted in error messages.
fn abbreviate(statement: &str) -> String {
    const MAX_CHARS: usize = 120;
    let collapsed = statement.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= MAX_CHARS {
        collapsed
    } else {
        let head: String = collapsed.chars().take(MAX_CHARS).collect();
        format!("{}...", head)
    }
}

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, MapperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_matches_variant() {
        assert_eq!(MapperError::EmptyInput.kind(), ErrorKind::EmptyInput);
        assert_eq!(MapperError::NilSchema.kind(), ErrorKind::NilSchema);
        assert_eq!(
            MapperError::unsupported("SEQUENCE", "mysql").kind(),
            ErrorKind::UnsupportedConstruct
        );
        assert_eq!(
            MapperError::no_mapping("tinyint(1)", "uuid").kind(),
            ErrorKind::NoTypeMappingFound
        );
    }

    #[test]
    fn test_exit_codes_are_nonzero() {
        let errors = [
            MapperError::EmptyInput,
            MapperError::NilSchema,
            MapperError::malformed("CREATE TABLE", "missing body"),
            MapperError::Config("bad".into()),
            MapperError::Cancelled,
        ];
        for e in errors {
            assert_ne!(e.exit_code(), 0, "{e}");
        }
    }

    #[test]
    fn test_malformed_abbreviates_statement() {
        let long = format!("CREATE TABLE t ({})", "a INT,\n ".repeat(100));
        let err = MapperError::malformed(&long, "bad column");
        match err {
            MapperError::MalformedStatement { statement, .. } => {
                assert!(statement.ends_with("..."));
                assert!(!statement.contains('\n'));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_format_detailed_includes_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "schema.sql");
        let err = MapperError::from(io);
        let detailed = err.format_detailed();
        assert!(detailed.starts_with("Error: IO error"));
    }
}
