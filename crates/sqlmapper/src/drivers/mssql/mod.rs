//! Microsoft SQL Server driver.
//!
//! This module provides MSSQL-specific implementations:
//!
//! - [`MssqlDialect`]: parse and generate strategy for SQL Server
//! - [`MssqlParser`]: `IDENTITY(s,i)`, bracket names, `ON t FOR ... AS` triggers
//! - [`MssqlGenerator`]: `IDENTITY` output, `GO` batches, AFTER/INSTEAD OF triggers

mod dialect;
mod generator;
mod parser;

pub use dialect::MssqlDialect;
pub use generator::MssqlGenerator;
pub use parser::MssqlParser;
