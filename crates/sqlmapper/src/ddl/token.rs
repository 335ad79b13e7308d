//! Token trees over scanner lexemes.
//!
//! Parenthesized runs become a single [`TokenKind::Group`] holding its inner
//! tokens, so parsers can skip a default expression or a type parameter
//! list as one unit. Every token keeps its byte span into the source, which
//! is how opaque text (defaults, CHECK bodies, view definitions) is sliced
//! out verbatim.

use super::scanner::{lex_one, LexKind, ScanOptions};
use crate::core::identifier::unquote;
use crate::error::{MapperError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Word,
    QuotedIdent,
    Str,
    Number,
    Symbol,
    Group(Vec<Token>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Identifier name (unquoted), string content, or the raw text.
    pub value: String,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }

    /// Case-insensitive keyword match on an unquoted word.
    pub fn is_kw(&self, kw: &str) -> bool {
        self.is_word() && self.value.eq_ignore_ascii_case(kw)
    }

    pub fn is_symbol(&self, symbol: &str) -> bool {
        self.kind == TokenKind::Symbol && self.value == symbol
    }

    /// Inner tokens of a parenthesized group.
    pub fn group(&self) -> Option<&[Token]> {
        match &self.kind {
            TokenKind::Group(inner) => Some(inner),
            _ => None,
        }
    }

    /// Name carried by a word or quoted identifier.
    pub fn name(&self) -> Option<&str> {
        match self.kind {
            TokenKind::Word | TokenKind::QuotedIdent => Some(&self.value),
            _ => None,
        }
    }

    pub fn upper(&self) -> String {
        self.value.to_ascii_uppercase()
    }

    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.start..self.end]
    }
}

const COMPOUND_SYMBOLS: &[&str] = &["::", "<=", ">=", "<>", "!=", "||", "=>", ":="];

/// Strip prefix and quotes from a string literal and un-double `''`.
fn string_value(raw: &str) -> String {
    if raw.starts_with('$') {
        let tag_len = raw[1..].find('$').map(|i| i + 2).unwrap_or(0);
        return raw
            .get(tag_len..raw.len().saturating_sub(tag_len))
            .unwrap_or_default()
            .to_string();
    }
    let open = raw.find('\'').unwrap_or(0);
    let inner = raw
        .get(open + 1..raw.len().saturating_sub(1))
        .unwrap_or_default();
    inner.replace("''", "'")
}

/// Tokenize `text` into a token tree.
///
/// # Errors
///
/// `MalformedStatement` for unbalanced parentheses or unterminated quotes.
pub fn tokenize(text: &str, opts: &ScanOptions) -> Result<Vec<Token>> {
    let mut stack: Vec<(usize, Vec<Token>)> = Vec::new();
    let mut current: Vec<Token> = Vec::new();
    let mut pos = 0;

    while pos < text.len() {
        let lexeme = lex_one(text, pos, opts)?;
        pos = lexeme.end;
        let raw = lexeme.text(text);

        let kind = match lexeme.kind {
            LexKind::Space | LexKind::Comment => continue,
            LexKind::Punct if raw == "(" => {
                stack.push((lexeme.start, std::mem::take(&mut current)));
                continue;
            }
            LexKind::Punct if raw == ")" => {
                let (open, outer) = stack
                    .pop()
                    .ok_or_else(|| MapperError::malformed(text, "unbalanced ')'"))?;
                let inner = std::mem::replace(&mut current, outer);
                current.push(Token {
                    kind: TokenKind::Group(inner),
                    value: text[open..lexeme.end].to_string(),
                    start: open,
                    end: lexeme.end,
                });
                continue;
            }
            LexKind::Punct => {
                if let Some(prev) = current.last_mut() {
                    let joined = format!("{}{}", prev.value, raw);
                    if prev.kind == TokenKind::Symbol
                        && prev.end == lexeme.start
                        && COMPOUND_SYMBOLS.contains(&joined.as_str())
                    {
                        prev.value = joined;
                        prev.end = lexeme.end;
                        continue;
                    }
                }
                TokenKind::Symbol
            }
            LexKind::Word => TokenKind::Word,
            LexKind::Number => TokenKind::Number,
            LexKind::Str | LexKind::DollarStr => TokenKind::Str,
            LexKind::QuotedIdent => TokenKind::QuotedIdent,
        };

        let value = match kind {
            TokenKind::Str => string_value(raw),
            TokenKind::QuotedIdent => unquote(raw),
            _ => raw.to_string(),
        };
        current.push(Token {
            kind,
            value,
            start: lexeme.start,
            end: lexeme.end,
        });
    }

    if !stack.is_empty() {
        return Err(MapperError::malformed(text, "unbalanced '('"));
    }
    Ok(current)
}

/// Source text covered by a token run, from the first token's start to the
/// last token's end.
pub fn span_text<'s>(source: &'s str, tokens: &[Token]) -> &'s str {
    match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) => &source[first.start..last.end],
        _ => "",
    }
}

/// Text between a group's parentheses.
pub fn group_body<'s>(source: &'s str, group: &Token) -> &'s str {
    let raw = group.text(source);
    if raw.len() >= 2 {
        &raw[1..raw.len() - 1]
    } else {
        ""
    }
}

/// Schema-qualified object name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectName {
    pub schema: Option<String>,
    pub name: String,
}

/// Forward-only cursor over a token slice.
#[derive(Debug, Clone)]
pub struct Cursor<'t> {
    tokens: &'t [Token],
    pos: usize,
    source: &'t str,
}

impl<'t> Cursor<'t> {
    pub fn new(tokens: &'t [Token], source: &'t str) -> Self {
        Self {
            tokens,
            pos: 0,
            source,
        }
    }

    pub fn source(&self) -> &'t str {
        self.source
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn is_done(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.pos)
    }

    pub fn peek_at(&self, offset: usize) -> Option<&'t Token> {
        self.tokens.get(self.pos + offset)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Tokens not yet consumed.
    pub fn rest(&self) -> &'t [Token] {
        self.tokens.get(self.pos..).unwrap_or_default()
    }

    /// Source text of the unconsumed tokens.
    pub fn rest_text(&self) -> &'t str {
        span_text(self.source, self.rest())
    }

    /// Source text from the current token to the end of the source,
    /// including any trailing comments.
    pub fn tail_text(&self) -> &'t str {
        match self.peek() {
            Some(token) => self.source[token.start..].trim(),
            None => "",
        }
    }

    pub fn peek_kw(&self, kw: &str) -> bool {
        self.peek().is_some_and(|t| t.is_kw(kw))
    }

    /// Whether the next tokens are exactly the keyword sequence `kws`.
    pub fn peek_kws(&self, kws: &[&str]) -> bool {
        kws.iter()
            .enumerate()
            .all(|(i, kw)| self.peek_at(i).is_some_and(|t| t.is_kw(kw)))
    }

    pub fn eat_kw(&mut self, kw: &str) -> bool {
        if self.peek_kw(kw) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume the keyword sequence `kws` if all of it is present.
    pub fn eat_kws(&mut self, kws: &[&str]) -> bool {
        if self.peek_kws(kws) {
            self.pos += kws.len();
            true
        } else {
            false
        }
    }

    pub fn expect_kw(&mut self, kw: &str) -> Result<()> {
        if self.eat_kw(kw) {
            Ok(())
        } else {
            Err(self.malformed(format!("expected {}", kw)))
        }
    }

    pub fn eat_symbol(&mut self, symbol: &str) -> bool {
        if self.peek().is_some_and(|t| t.is_symbol(symbol)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume `IF NOT EXISTS` / `IF EXISTS`.
    pub fn eat_if_exists(&mut self) -> bool {
        self.eat_kws(&["IF", "NOT", "EXISTS"]) || self.eat_kws(&["IF", "EXISTS"])
    }

    /// Consume a parenthesized group.
    pub fn group(&mut self) -> Option<&'t Token> {
        match self.peek() {
            Some(token) if token.group().is_some() => {
                self.pos += 1;
                Some(token)
            }
            _ => None,
        }
    }

    pub fn expect_group(&mut self, what: &str) -> Result<&'t Token> {
        self.group()
            .ok_or_else(|| self.malformed(format!("expected parenthesized {}", what)))
    }

    /// Consume an identifier (bare word or quoted).
    pub fn ident(&mut self) -> Result<String> {
        match self.peek().and_then(Token::name) {
            Some(name) => {
                let name = name.to_string();
                self.pos += 1;
                Ok(name)
            }
            None => Err(self.malformed("expected identifier")),
        }
    }

    /// Consume `name`, `schema.name` or `db.schema.name` (keeping the last two parts).
    pub fn object_name(&mut self) -> Result<ObjectName> {
        let mut parts = vec![self.ident()?];
        while self.peek().is_some_and(|t| t.is_symbol("."))
            && self.peek_at(1).and_then(Token::name).is_some()
        {
            self.pos += 1;
            parts.push(self.ident()?);
        }
        let name = parts.pop().unwrap_or_default();
        Ok(ObjectName {
            schema: parts.pop(),
            name,
        })
    }

    /// Consume tokens up to (not including) the first word matching any of
    /// `stops`, returning the consumed run.
    pub fn take_until_kw(&mut self, stops: &[&str]) -> &'t [Token] {
        let start = self.pos;
        while let Some(token) = self.peek() {
            if stops.iter().any(|s| token.is_kw(s)) {
                break;
            }
            self.pos += 1;
        }
        &self.tokens[start..self.pos]
    }

    /// Skip to the end.
    pub fn skip_rest(&mut self) {
        self.pos = self.tokens.len();
    }

    /// A `MalformedStatement` error quoting the whole source.
    pub fn malformed(&self, reason: impl Into<String>) -> MapperError {
        let reason = reason.into();
        let reason = match self.peek() {
            Some(token) => format!("{} near '{}'", reason, token.text(self.source)),
            None => format!("{} at end of statement", reason),
        };
        MapperError::malformed(self.source, reason)
    }
}

/// `DESC`, `COLLATE x` or a MySQL prefix length `(10)` after a column name.
fn is_column_suffix(token: &Token) -> bool {
    match token.group() {
        Some(inner) => inner.len() == 1 && inner[0].kind == TokenKind::Number,
        None => token.is_word(),
    }
}

/// Split a token run at its top-level commas.
///
/// Nested parentheses are already folded into groups, so a comma inside
/// `DECIMAL(10,2)` or `CHECK (x IN (1,2))` never cuts. Empty items are kept
/// so callers can reject `a,,b`.
pub fn comma_items<'a>(tokens: &'a [Token]) -> impl Iterator<Item = &'a [Token]> + 'a {
    tokens.split(|t| t.is_symbol(","))
}

/// Column names inside a group like `(a, "b", c DESC)`; sort order and
/// prefix lengths are dropped.
pub fn name_list(source: &str, group: &Token) -> Result<Vec<String>> {
    let inner = group.group().unwrap_or_default();
    let mut names = Vec::new();
    for item in comma_items(inner) {
        match item.first() {
            Some(first) if first.name().is_some() && item.len() == 1 => {
                names.push(first.value.clone());
            }
            Some(first) if first.name().is_some() && item.get(1).is_some_and(is_column_suffix) => {
                names.push(first.value.clone());
            }
            Some(_) => names.push(span_text(source, item).to_string()),
            None => {
                return Err(MapperError::malformed(
                    group.text(source),
                    "empty entry in column list",
                ))
            }
        }
    }
    Ok(names)
}
