//! PostgreSQL driver.
//!
//! This module provides PostgreSQL-specific implementations:
//!
//! - [`PostgresDialect`]: parse and generate strategy for PostgreSQL
//! - [`PostgresParser`]: serial types, identity columns, `nextval` defaults
//! - [`PostgresGenerator`]: serial/identity output, COMMENT ON, plpgsql triggers

mod dialect;
mod generator;
mod parser;

pub use dialect::PostgresDialect;
pub use generator::PostgresGenerator;
pub use parser::PostgresParser;
