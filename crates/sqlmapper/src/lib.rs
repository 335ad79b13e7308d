//! # sqlmapper
//!
//! DDL conversion between MySQL, PostgreSQL, SQLite, Oracle and SQL Server.
//!
//! Every dialect parses into one canonical schema model and every dialect
//! renders from it, so any source can be converted to any target:
//!
//! - **Parsers** for tables, indexes, views, triggers and sequences
//! - **Generators** that spell identities, defaults, comments and triggers
//!   the way each engine expects
//! - **Type mapping** through a canonical type hub, with version-scoped
//!   conversion of literal default values
//! - **Charset and collation** capability checks per dialect
//! - **Batch runner** converting many files on a worker pool
//!
//! ## Example
//!
//! ```rust
//! use sqlmapper::{Converter, DialectKind};
//!
//! let converter = Converter::default();
//! let ddl = converter
//!     .convert(
//!         "CREATE TABLE users (id INT NOT NULL AUTO_INCREMENT, PRIMARY KEY (id)) ENGINE=InnoDB;",
//!         DialectKind::Mysql,
//!         DialectKind::Postgres,
//!     )
//!     .unwrap();
//! assert!(ddl.contains("id serial NOT NULL"));
//! ```

pub mod config;
pub mod convert;
pub mod core;
pub mod ddl;
pub mod detect;
pub mod dialect;
pub mod drivers;
pub mod error;
pub mod runner;

// Re-exports for convenient access
pub use config::{Config, ConversionConfig, OutputConfig, RunnerConfig};
pub use convert::Converter;
pub use crate::core::{Dialect, DriverCatalog, GenerateOptions, QuotePolicy, Schema};
pub use detect::detect_dialect;
pub use dialect::{DialectKind, Version};
pub use drivers::DialectImpl;
pub use error::{ErrorKind, MapperError, Result};
pub use runner::{BatchResult, ConversionJob, JobReport, Runner};
