//! Statement classification by leading keywords.

use super::token::Token;

/// The statement shapes parsers act on. Everything else is skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    CreateTable,
    CreateIndex,
    CreateView,
    CreateTrigger,
    CreateSequence,
    AlterTable,
    CommentOn,
    Other,
}

/// Object keywords that decide what a CREATE statement creates.
const OBJECT_KEYWORDS: &[(&str, StatementKind)] = &[
    ("TABLE", StatementKind::CreateTable),
    ("INDEX", StatementKind::CreateIndex),
    ("VIEW", StatementKind::CreateView),
    ("TRIGGER", StatementKind::CreateTrigger),
    ("SEQUENCE", StatementKind::CreateSequence),
    ("MATERIALIZED", StatementKind::Other),
    ("PROCEDURE", StatementKind::Other),
    ("FUNCTION", StatementKind::Other),
    ("PACKAGE", StatementKind::Other),
    ("TYPE", StatementKind::Other),
    ("SCHEMA", StatementKind::Other),
    ("DATABASE", StatementKind::Other),
    ("EXTENSION", StatementKind::Other),
    ("DOMAIN", StatementKind::Other),
    ("SYNONYM", StatementKind::Other),
    ("USER", StatementKind::Other),
    ("ROLE", StatementKind::Other),
    ("EVENT", StatementKind::Other),
    ("RULE", StatementKind::Other),
    ("POLICY", StatementKind::Other),
    ("CONSTRAINT", StatementKind::Other),
];

/// Classify a tokenized statement.
///
/// CREATE statements are classified by the first object keyword, which
/// lets modifiers such as `OR REPLACE`, `UNIQUE`, `CLUSTERED`, `TEMPORARY`,
/// `DEFINER=…` or `ALGORITHM=…` sit in between.
pub fn classify(tokens: &[Token]) -> StatementKind {
    let Some(first) = tokens.first() else {
        return StatementKind::Other;
    };

    if first.is_kw("CREATE") {
        for token in tokens.iter().skip(1).take(16) {
            if token.group().is_some() {
                break;
            }
            if !token.is_word() {
                continue;
            }
            if let Some((_, kind)) = OBJECT_KEYWORDS.iter().find(|(kw, _)| token.is_kw(kw)) {
                return *kind;
            }
        }
        return StatementKind::Other;
    }

    if first.is_kw("ALTER") && tokens.get(1).is_some_and(|t| t.is_kw("TABLE")) {
        return StatementKind::AlterTable;
    }

    if first.is_kw("COMMENT") && tokens.get(1).is_some_and(|t| t.is_kw("ON")) {
        return StatementKind::CommentOn;
    }

    StatementKind::Other
}
