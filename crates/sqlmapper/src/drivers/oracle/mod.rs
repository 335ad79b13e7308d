//! Oracle driver.
//!
//! - [`OracleDialect`]: parse and generate strategy for Oracle Database
//! - [`OracleParser`]: identity columns, `DEFAULT ON NULL`, PL/SQL trigger bodies
//! - [`OracleGenerator`]: identity output, COMMENT ON, `/`-terminated triggers
//!
//! # Supported Versions
//!
//! - Oracle 12c+ (identity columns)

mod dialect;
mod generator;
mod parser;

pub use dialect::OracleDialect;
pub use generator::OracleGenerator;
pub use parser::OracleParser;
