//! Configuration type definitions.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::core::identifier::QuotePolicy;
use crate::core::traits::GenerateOptions;
use crate::dialect::{DialectKind, Version};

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// What to convert and how to render it.
    #[serde(default)]
    pub conversion: ConversionConfig,

    /// Where converted files go.
    #[serde(default)]
    pub output: OutputConfig,

    /// Batch runner tuning.
    #[serde(default)]
    pub runner: RunnerConfig,
}

/// Source/target dialects and rendering options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Source dialect. Detected from the input text if not set.
    #[serde(
        default,
        deserialize_with = "dialect_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub source: Option<DialectKind>,

    /// Target dialect. Required unless given on the command line.
    #[serde(
        default,
        deserialize_with = "dialect_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub target: Option<DialectKind>,

    /// Source engine version (`major.minor`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_version: Option<Version>,

    /// Target engine version (`major.minor`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_version: Option<Version>,

    /// When to quote identifiers (default: as_needed).
    #[serde(default)]
    pub quote_identifiers: QuotePolicy,

    /// Emit schema qualifiers carried in the parsed input (default: false).
    #[serde(default)]
    pub qualify_schema: bool,
}

impl ConversionConfig {
    /// Generator options described by this section.
    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            quote_identifiers: self.quote_identifiers,
            qualify_schema: self.qualify_schema,
            source_version: self.source_version,
            target_version: self.target_version,
        }
    }
}

/// Output file placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output directory. Files are written next to their input if not set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Replace existing output files (default: true).
    #[serde(default = "default_true")]
    pub overwrite: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: None,
            overwrite: true,
        }
    }
}

/// Batch runner configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Number of parallel workers (default: 4).
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Jobs buffered between the producer and the workers (default: 16).
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Per-job deadline in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Read attempts after the first failure (default: 3).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay between read attempts, multiplied by the attempt number (default: 100).
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            queue_capacity: default_queue_capacity(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
        }
    }
}

impl RunnerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_base_delay(&self) -> Duration {
        Duration::from_millis(self.retry_base_delay_ms)
    }
}

/// Accept any spelling `DialectKind::from_str` accepts, case-insensitively.
fn dialect_name<'de, D>(deserializer: D) -> Result<Option<DialectKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let name: Option<String> = Option::deserialize(deserializer)?;
    name.map(|n| n.parse().map_err(serde::de::Error::custom))
        .transpose()
}

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_workers() -> usize {
    4
}

fn default_queue_capacity() -> usize {
    16
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    100
}
