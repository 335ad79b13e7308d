//! Quote-, comment- and depth-aware splitting of DDL text.
//!
//! [`split_statements`] cuts a script into statements for every dialect
//! parser. Terminators inside string literals, quoted identifiers, comments,
//! dollar-quoted bodies and parentheses never split. Comma lists inside a
//! statement are cut later, over token groups (see [`super::token::comma_items`]).
//!
//! Procedural blocks (`BEGIN … END`, `CASE … END`, an Oracle `DECLARE`
//! section) are tracked only at parenthesis depth zero and only once a
//! routine header or an anonymous block has opened them, so semicolons
//! inside trigger bodies stay with their trigger while a column named
//! `begin` or `end` is just a word. The batch separators `GO` (SQL Server),
//! a lone `/` line (Oracle) and MySQL `DELIMITER` are honored.

use crate::dialect::DialectKind;
use crate::error::{MapperError, Result};

/// Lexical feature switches that differ between dialects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// `\'` escapes a quote inside string literals (MySQL).
    pub backslash_escapes: bool,
    /// `[name]` is a quoted identifier (SQL Server, SQLite).
    pub bracket_identifiers: bool,
    /// `$tag$ … $tag$` bodies (PostgreSQL).
    pub dollar_quotes: bool,
    /// `#` starts a line comment (MySQL).
    pub hash_comments: bool,
}

impl ScanOptions {
    pub fn for_dialect(kind: DialectKind) -> Self {
        match kind {
            DialectKind::Mysql => Self {
                backslash_escapes: true,
                hash_comments: true,
                ..Self::default()
            },
            DialectKind::Postgres => Self {
                dollar_quotes: true,
                ..Self::default()
            },
            DialectKind::Sqlite | DialectKind::Sqlserver => Self {
                bracket_identifiers: true,
                ..Self::default()
            },
            DialectKind::Oracle => Self::default(),
        }
    }
}

/// Lexeme classes produced by [`lex_one`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexKind {
    Space,
    Comment,
    Word,
    Number,
    /// String literal, including any `N`/`E`/`X`/`B`/`_charset` prefix.
    Str,
    /// `$tag$ … $tag$` body.
    DollarStr,
    QuotedIdent,
    Punct,
}

impl LexKind {
    pub fn is_trivia(&self) -> bool {
        matches!(self, LexKind::Space | LexKind::Comment)
    }
}

/// A lexeme as a byte range into the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme {
    pub kind: LexKind,
    pub start: usize,
    pub end: usize,
}

impl Lexeme {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

fn is_word_start(c: char, opts: &ScanOptions) -> bool {
    c.is_alphabetic() || c == '_' || c == '@' || (c == '#' && !opts.hash_comments)
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '$' | '#' | '@')
}

fn char_at(text: &str, pos: usize) -> Option<char> {
    text.get(pos..).and_then(|s| s.chars().next())
}

/// Length of a quoted run starting at `pos` (which holds `open`).
fn quoted_len(
    text: &str,
    pos: usize,
    open: char,
    close: char,
    backslash: bool,
) -> Option<usize> {
    let body = pos + open.len_utf8();
    let mut iter = text[body..].char_indices().peekable();
    while let Some((i, c)) = iter.next() {
        if backslash && c == '\\' {
            iter.next();
            continue;
        }
        if c == close {
            if iter.peek().map(|(_, n)| *n) == Some(close) {
                iter.next();
                continue;
            }
            return Some(body + i + close.len_utf8() - pos);
        }
    }
    None
}

/// Dollar-quote tag at `pos` (`$$` or `$tag$`), if one starts there.
fn dollar_tag(text: &str, pos: usize) -> Option<&str> {
    let rest = &text[pos + 1..];
    let end = rest.find('$')?;
    let tag = &rest[..end];
    let valid = tag.is_empty()
        || (tag.chars().all(|c| c.is_alphanumeric() || c == '_')
            && tag.chars().next().is_some_and(|c| !c.is_ascii_digit()));
    valid.then(|| &text[pos..pos + end + 2])
}

fn unterminated(text: &str, pos: usize, what: &str) -> MapperError {
    MapperError::malformed(&text[pos..], format!("unterminated {}", what))
}

/// Lex the single lexeme starting at byte `pos`.
///
/// # Errors
///
/// `MalformedStatement` for an unterminated string, quoted identifier,
/// block comment or dollar-quoted body.
pub fn lex_one(text: &str, pos: usize, opts: &ScanOptions) -> Result<Lexeme> {
    let c = char_at(text, pos).ok_or_else(|| MapperError::malformed(text, "unexpected end of input"))?;
    let next = char_at(text, pos + c.len_utf8());
    let rest = &text[pos..];

    let (kind, len) = if c.is_whitespace() {
        let len = rest
            .find(|ch: char| !ch.is_whitespace())
            .unwrap_or(rest.len());
        (LexKind::Space, len)
    } else if (c == '-' && next == Some('-')) || (c == '#' && opts.hash_comments) {
        (LexKind::Comment, rest.find('\n').unwrap_or(rest.len()))
    } else if c == '/' && next == Some('*') {
        let end = rest[2..]
            .find("*/")
            .ok_or_else(|| unterminated(text, pos, "block comment"))?;
        (LexKind::Comment, end + 4)
    } else if c == '\'' {
        let len = quoted_len(text, pos, '\'', '\'', opts.backslash_escapes)
            .ok_or_else(|| unterminated(text, pos, "string literal"))?;
        (LexKind::Str, len)
    } else if c == '"' || c == '`' || (c == '[' && opts.bracket_identifiers) {
        let close = if c == '[' { ']' } else { c };
        let len = quoted_len(text, pos, c, close, false)
            .ok_or_else(|| unterminated(text, pos, "quoted identifier"))?;
        (LexKind::QuotedIdent, len)
    } else if c == '$' && opts.dollar_quotes && dollar_tag(text, pos).is_some() {
        let tag = dollar_tag(text, pos).unwrap_or("$$");
        let body = pos + tag.len();
        let end = text[body..]
            .find(tag)
            .ok_or_else(|| unterminated(text, pos, "dollar-quoted body"))?;
        (LexKind::DollarStr, tag.len() + end + tag.len())
    } else if c.is_ascii_digit() || (c == '.' && next.is_some_and(|n| n.is_ascii_digit())) {
        (LexKind::Number, number_len(rest))
    } else if is_word_start(c, opts) {
        let len = rest
            .char_indices()
            .skip(1)
            .find(|(_, ch)| !is_word_char(*ch))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let word = &rest[..len];
        // N'..', E'..', X'..', B'..' and _charset'..' are prefixed strings.
        let prefixed = rest[len..].starts_with('\'')
            && ((len == 1 && "NnEeXxBb".contains(word)) || word.starts_with('_'));
        if prefixed {
            let backslash = opts.backslash_escapes || word.eq_ignore_ascii_case("e");
            let str_len = quoted_len(text, pos + len, '\'', '\'', backslash)
                .ok_or_else(|| unterminated(text, pos, "string literal"))?;
            (LexKind::Str, len + str_len)
        } else {
            (LexKind::Word, len)
        }
    } else {
        (LexKind::Punct, c.len_utf8())
    };

    Ok(Lexeme {
        kind,
        start: pos,
        end: pos + len,
    })
}

fn number_len(rest: &str) -> usize {
    let bytes = rest.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_alphanumeric() || b == b'.' {
            // Exponent sign.
            if (b == b'e' || b == b'E')
                && matches!(bytes.get(i + 1), Some(b'+') | Some(b'-'))
                && bytes.get(i + 2).is_some_and(|d| d.is_ascii_digit())
            {
                i += 2;
            }
            i += 1;
        } else {
            break;
        }
    }
    i
}

/// Next non-trivia lexeme at or after `pos`.
fn peek_significant<'a>(text: &'a str, mut pos: usize, opts: &ScanOptions) -> Option<(LexKind, &'a str)> {
    while pos < text.len() {
        let lexeme = lex_one(text, pos, opts).ok()?;
        if !lexeme.kind.is_trivia() {
            return Some((lexeme.kind, lexeme.text(text)));
        }
        pos = lexeme.end;
    }
    None
}

fn line_bounds(text: &str, start: usize, end: usize) -> (usize, usize) {
    let line_start = text[..start].rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line_end = text[end..].find('\n').map(|i| end + i).unwrap_or(text.len());
    (line_start, line_end)
}

/// Whether the lexeme is alone on its line, allowing a trailing repeat count.
fn alone_on_line(text: &str, lexeme: &Lexeme, allow_count: bool) -> Option<usize> {
    let (line_start, line_end) = line_bounds(text, lexeme.start, lexeme.end);
    let before = text[line_start..lexeme.start].trim();
    let after = text[lexeme.end..line_end].trim();
    let after_ok = after.is_empty() || (allow_count && after.chars().all(|c| c.is_ascii_digit()));
    (before.is_empty() && after_ok).then_some(line_end)
}

const ROUTINE_OBJECTS: &[&str] = &["TRIGGER", "PROCEDURE", "FUNCTION", "PACKAGE"];
const PLAIN_OBJECTS: &[&str] = &["TABLE", "INDEX", "VIEW", "SEQUENCE", "TYPE", "SCHEMA"];

#[derive(Debug, Default)]
struct SplitState {
    start: usize,
    depth: usize,
    blocks: usize,
    pending_declare: bool,
    suppress_case: bool,
    has_content: bool,
    head: Vec<String>,
}

impl SplitState {
    fn reset(&mut self, start: usize) {
        *self = SplitState {
            start,
            ..SplitState::default()
        };
    }

    fn finish<'a>(&self, text: &'a str, end: usize, out: &mut Vec<&'a str>) {
        if self.has_content {
            let piece = text[self.start..end].trim();
            if !piece.is_empty() {
                out.push(piece);
            }
        }
    }

    /// `CREATE [OR REPLACE] [DEFINER=..] TRIGGER|PROCEDURE|...`: the first
    /// object keyword after CREATE names a routine.
    fn in_routine_header(&self) -> bool {
        self.head.first().map(String::as_str) == Some("CREATE")
            && self
                .head
                .iter()
                .skip(1)
                .find(|w| ROUTINE_OBJECTS.contains(&w.as_str()) || PLAIN_OBJECTS.contains(&w.as_str()))
                .is_some_and(|w| ROUTINE_OBJECTS.contains(&w.as_str()))
    }

    /// Whether a `BEGIN` here opens a block: inside one already, in a
    /// routine header, or as the first word of an anonymous block.
    fn begin_opens_block(&self) -> bool {
        self.blocks > 0 || self.in_routine_header() || self.head.len() == 1
    }

    fn word(&mut self, upper: &str, lookahead: Option<(LexKind, &str)>) {
        if self.head.len() < 8 {
            self.head.push(upper.to_string());
        }
        if self.depth > 0 {
            return;
        }
        let next_word = match lookahead {
            Some((LexKind::Word, w)) => Some(w.to_ascii_uppercase()),
            _ => None,
        };
        match upper {
            "BEGIN" => {
                if self.pending_declare {
                    self.pending_declare = false;
                    return;
                }
                let transaction = matches!(
                    next_word.as_deref(),
                    Some(
                        "TRANSACTION" | "WORK" | "TRAN" | "DEFERRED" | "IMMEDIATE" | "EXCLUSIVE"
                            | "DISTRIBUTED"
                    )
                );
                let bare = matches!(lookahead, None | Some((LexKind::Punct, ";")));
                if !transaction && !bare && self.begin_opens_block() {
                    self.blocks += 1;
                }
            }
            "CASE" => {
                if self.suppress_case {
                    self.suppress_case = false;
                } else {
                    self.blocks += 1;
                }
            }
            "END" => match next_word.as_deref() {
                Some("IF" | "LOOP" | "WHILE" | "REPEAT" | "FOR") => {}
                other => {
                    self.blocks = self.blocks.saturating_sub(1);
                    self.suppress_case = other == Some("CASE");
                }
            },
            "DECLARE" => {
                // Opens the block that the following BEGIN would otherwise open.
                if self.blocks == 0 && self.depth == 0 && self.in_routine_header() {
                    self.pending_declare = true;
                    self.blocks += 1;
                }
            }
            _ => {}
        }
    }
}

/// Split a script into statements.
///
/// Pieces are trimmed; pieces holding only whitespace and comments are
/// dropped.
///
/// # Errors
///
/// - `EmptyInput` when nothing but whitespace and comments remains
/// - `MalformedStatement` for unterminated quotes or comments
pub fn split_statements<'a>(text: &'a str, opts: &ScanOptions) -> Result<Vec<&'a str>> {
    let mut out = Vec::new();
    let mut state = SplitState::default();
    let mut delimiter: Option<String> = None;
    let mut pos = 0;

    while pos < text.len() {
        if let Some(delim) = delimiter.as_deref() {
            if text[pos..].starts_with(delim) {
                state.finish(text, pos, &mut out);
                pos += delim.len();
                state.reset(pos);
                continue;
            }
        }

        let lexeme = lex_one(text, pos, opts)?;
        let raw = lexeme.text(text);
        pos = lexeme.end;

        match lexeme.kind {
            LexKind::Space | LexKind::Comment => {}
            LexKind::Word => {
                let upper = raw.to_ascii_uppercase();
                if !state.has_content && upper == "DELIMITER" {
                    let (_, line_end) = line_bounds(text, lexeme.start, lexeme.end);
                    let new_delim = text[lexeme.end..line_end].trim();
                    delimiter = match new_delim {
                        "" | ";" => None,
                        d => Some(d.to_string()),
                    };
                    pos = line_end;
                    state.reset(pos);
                    continue;
                }
                if upper == "GO" {
                    if let Some(line_end) = alone_on_line(text, &lexeme, true) {
                        state.finish(text, lexeme.start, &mut out);
                        pos = line_end;
                        state.reset(pos);
                        continue;
                    }
                }
                state.has_content = true;
                let lookahead = peek_significant(text, pos, opts);
                state.word(&upper, lookahead);
            }
            LexKind::Punct => {
                if raw == "/" && alone_on_line(text, &lexeme, false).is_some() {
                    state.finish(text, lexeme.start, &mut out);
                    state.reset(pos);
                    continue;
                }
                match raw {
                    "(" => state.depth += 1,
                    ")" => state.depth = state.depth.saturating_sub(1),
                    ";" if delimiter.is_none() && state.depth == 0 && state.blocks == 0 =>
                    {
                        state.finish(text, lexeme.start, &mut out);
                        state.reset(pos);
                        continue;
                    }
                    _ => {}
                }
                state.has_content = true;
            }
            _ => state.has_content = true,
        }
    }
    state.finish(text, text.len(), &mut out);

    if out.is_empty() {
        return Err(MapperError::EmptyInput);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn opts(kind: DialectKind) -> ScanOptions {
        ScanOptions::for_dialect(kind)
    }

    fn statements(text: &str, kind: DialectKind) -> Vec<&str> {
        split_statements(text, &opts(kind)).unwrap()
    }

    // =========================================================================
    // Lexing
    // =========================================================================

    #[test]
    fn test_lex_prefixed_strings() {
        let o = opts(DialectKind::Postgres);
        let lx = lex_one("E'a\\'b' x", 0, &o).unwrap();
        assert_eq!(lx.kind, LexKind::Str);
        assert_eq!(lx.end, 7);

        let m = opts(DialectKind::Mysql);
        let lx = lex_one("_utf8mb4'abc'", 0, &m).unwrap();
        assert_eq!(lx.kind, LexKind::Str);
        assert_eq!(lx.end, 13);

        let lx = lex_one("N'x'", 0, &opts(DialectKind::Sqlserver)).unwrap();
        assert_eq!(lx.kind, LexKind::Str);
    }

    #[test]
    fn test_lex_numbers() {
        let o = ScanOptions::default();
        assert_eq!(lex_one("1.5e-3,", 0, &o).unwrap().end, 6);
        assert_eq!(lex_one("0xFF)", 0, &o).unwrap().end, 4);
        assert_eq!(lex_one(".5", 0, &o).unwrap().kind, LexKind::Number);
    }

    #[test]
    fn test_lex_brackets_only_where_enabled() {
        let lx = lex_one("[a]]b] x", 0, &opts(DialectKind::Sqlserver)).unwrap();
        assert_eq!(lx.kind, LexKind::QuotedIdent);
        assert_eq!(lx.end, 6);
        let lx = lex_one("[]", 0, &opts(DialectKind::Postgres)).unwrap();
        assert_eq!(lx.kind, LexKind::Punct);
    }

    #[test]
    fn test_lex_unterminated() {
        let err = lex_one("'abc", 0, &ScanOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedStatement);
        assert!(lex_one("/* x", 0, &ScanOptions::default()).is_err());
    }

    // =========================================================================
    // Statement splitting
    // =========================================================================

    #[test]
    fn test_split_ignores_quoted_terminators() {
        let sql = "CREATE TABLE a (x VARCHAR(5) DEFAULT ';'); -- c;\nCREATE TABLE \"b;\" (y INT);";
        let parts = statements(sql, DialectKind::Postgres);
        assert_eq!(parts.len(), 2);
        assert!(parts[0].ends_with("DEFAULT ';')"));
        assert!(parts[1].starts_with("CREATE TABLE \"b;\""));
    }

    #[test]
    fn test_split_keeps_trailing_statement_without_terminator() {
        let parts = statements("CREATE TABLE a (x INT)", DialectKind::Sqlite);
        assert_eq!(parts, vec!["CREATE TABLE a (x INT)"]);
    }

    #[test]
    fn test_split_empty_and_comment_only() {
        for text in ["", "   \n", "-- nothing\n/* here */", ";;"] {
            let err = split_statements(text, &ScanOptions::default()).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::EmptyInput, "input {:?}", text);
        }
    }

    #[test]
    fn test_split_trigger_block() {
        let sql = "CREATE TRIGGER t AFTER INSERT ON a FOR EACH ROW BEGIN\n  UPDATE b SET n = n + 1;\n  DELETE FROM c;\nEND;\nCREATE TABLE z (i INT);";
        let parts = statements(sql, DialectKind::Sqlite);
        assert_eq!(parts.len(), 2);
        assert!(parts[0].ends_with("END"));
    }

    #[test]
    fn test_split_case_inside_block() {
        let sql = "CREATE TRIGGER t BEFORE INSERT ON a FOR EACH ROW BEGIN SET NEW.x = CASE WHEN 1 THEN 2 END; END; SELECT 1;";
        let parts = statements(sql, DialectKind::Mysql);
        assert_eq!(parts.len(), 2);
    }

    #[test]
    fn test_split_begin_transaction_is_not_a_block() {
        let parts = statements("BEGIN TRANSACTION; CREATE TABLE a (x INT); COMMIT;", DialectKind::Sqlite);
        assert_eq!(parts.len(), 3);
        let parts = statements("BEGIN; CREATE TABLE a (x INT);", DialectKind::Postgres);
        assert_eq!(parts.len(), 2);
    }

    #[test]
    fn test_split_oracle_declare_and_slash() {
        let sql = "CREATE OR REPLACE TRIGGER trg\nBEFORE INSERT ON t FOR EACH ROW\nDECLARE\n  v NUMBER;\nBEGIN\n  :NEW.id := v;\nEND;\n/\nCREATE TABLE x (id NUMBER(10));";
        let parts = statements(sql, DialectKind::Oracle);
        assert_eq!(parts.len(), 2);
        assert!(parts[0].contains("v NUMBER;"));
        assert!(parts[0].ends_with("END"));
    }

    #[test]
    fn test_split_mssql_go() {
        let sql = "CREATE TABLE a (x INT)\nGO\nCREATE VIEW v AS SELECT x FROM a\nGO 2\n";
        let parts = statements(sql, DialectKind::Sqlserver);
        assert_eq!(parts, vec!["CREATE TABLE a (x INT)", "CREATE VIEW v AS SELECT x FROM a"]);
    }

    #[test]
    fn test_split_mysql_delimiter() {
        let sql = "DELIMITER $$\nCREATE TRIGGER t BEFORE INSERT ON a FOR EACH ROW BEGIN SET NEW.x = 1; END$$\nDELIMITER ;\nCREATE TABLE b (y INT);";
        let parts = statements(sql, DialectKind::Mysql);
        assert_eq!(parts.len(), 2);
        assert!(parts[0].ends_with("END"));
        assert_eq!(parts[1], "CREATE TABLE b (y INT)");
    }

    #[test]
    fn test_split_dollar_quoted_body() {
        let sql = "CREATE FUNCTION f() RETURNS trigger AS $$ BEGIN NEW.x := 1; RETURN NEW; END; $$ LANGUAGE plpgsql;\nCREATE TABLE a (x INT);";
        let parts = statements(sql, DialectKind::Postgres);
        assert_eq!(parts.len(), 2);
    }

    #[test]
    fn test_split_hash_comment_mysql_only() {
        let parts = statements("# comment; here\nCREATE TABLE a (x INT);", DialectKind::Mysql);
        assert_eq!(parts.len(), 1);
    }

    #[test]
    fn test_split_column_named_begin_is_not_a_block() {
        let sql = "CREATE TABLE events (id INT, begin TIMESTAMP); CREATE TABLE z (q INT); CREATE TABLE y (r INT);";
        for kind in [DialectKind::Postgres, DialectKind::Mysql, DialectKind::Sqlite] {
            let parts = statements(sql, kind);
            assert_eq!(
                parts,
                vec![
                    "CREATE TABLE events (id INT, begin TIMESTAMP)",
                    "CREATE TABLE z (q INT)",
                    "CREATE TABLE y (r INT)"
                ],
                "{:?}",
                kind
            );
        }
    }

    #[test]
    fn test_split_begin_outside_routines_is_a_word() {
        let sql = "ALTER TABLE events ADD begin TIMESTAMP; CREATE VIEW v AS SELECT begin, id FROM events; CREATE TABLE z (q INT);";
        let parts = statements(sql, DialectKind::Postgres);
        assert_eq!(parts.len(), 3);
    }

    #[test]
    fn test_split_oracle_anonymous_block() {
        let sql = "BEGIN\n  NULL;\nEND;\n/\nCREATE TABLE x (id NUMBER(10));";
        let parts = statements(sql, DialectKind::Oracle);
        assert_eq!(parts.len(), 2);
    }
}
