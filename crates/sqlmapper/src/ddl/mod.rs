//! Dialect-neutral DDL text handling: splitting, tokenizing, classifying.

pub mod scanner;
pub mod statement;
pub mod token;

pub use scanner::{split_statements, ScanOptions};
pub use statement::{classify, StatementKind};
pub use token::{comma_items, group_body, name_list, span_text, tokenize, Cursor, ObjectName, Token, TokenKind};
