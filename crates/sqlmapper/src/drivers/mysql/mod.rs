//! MySQL/MariaDB driver.
//!
//! This module provides MySQL-specific implementations for:
//! - [`MysqlDialect`]: parse and generate strategy
//! - [`MysqlParser`]: AUTO_INCREMENT, inline KEY entries, table options
//! - [`MysqlGenerator`]: ENGINE/charset suffixes, inline comments, DELIMITER triggers
//!
//! # Supported Versions
//!
//! - MySQL 5.7+, 8.0+
//! - MariaDB 10.2+

mod dialect;
mod generator;
mod parser;

pub use dialect::MysqlDialect;
pub use generator::MysqlGenerator;
pub use parser::MysqlParser;
