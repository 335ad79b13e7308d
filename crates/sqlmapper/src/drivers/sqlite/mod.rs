//! SQLite driver.
//!
//! - [`SqliteDialect`]: parse and generate strategy for SQLite
//! - [`SqliteParser`]: typeless columns, AUTOINCREMENT, row-level triggers
//! - [`SqliteGenerator`]: inline `INTEGER PRIMARY KEY AUTOINCREMENT`, BEGIN/END trigger bodies

mod dialect;
mod generator;
mod parser;

pub use dialect::SqliteDialect;
pub use generator::SqliteGenerator;
pub use parser::SqliteParser;
