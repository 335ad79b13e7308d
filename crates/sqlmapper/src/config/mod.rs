//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use crate::error::Result;
use std::path::Path;

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    /// Render the configuration back to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::QuotePolicy;
    use crate::dialect::{DialectKind, Version};
    use std::io::Write;

    #[test]
    fn test_from_yaml_full() {
        let yaml = r#"
conversion:
  source: mysql
  target: pg
  source_version: "5.7"
  target_version: "16"
  quote_identifiers: always
  qualify_schema: true
output:
  dir: out
  overwrite: false
runner:
  workers: 8
  queue_capacity: 32
  timeout_secs: 10
  max_retries: 5
  retry_base_delay_ms: 50
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.conversion.source, Some(DialectKind::Mysql));
        assert_eq!(config.conversion.target, Some(DialectKind::Postgres));
        assert_eq!(config.conversion.source_version, Some(Version::new(5, 7)));
        assert_eq!(config.conversion.target_version, Some(Version::new(16, 0)));
        assert_eq!(config.conversion.quote_identifiers, QuotePolicy::Always);
        assert!(config.conversion.qualify_schema);
        assert_eq!(config.output.dir.as_deref(), Some(Path::new("out")));
        assert!(!config.output.overwrite);
        assert_eq!(config.runner.workers, 8);
        assert_eq!(config.runner.queue_capacity, 32);
        assert_eq!(config.runner.timeout_secs, 10);
        assert_eq!(config.runner.max_retries, 5);
        assert_eq!(config.runner.retry_base_delay_ms, 50);
    }

    #[test]
    fn test_from_yaml_defaults() {
        let config = Config::from_yaml("conversion:\n  target: oracle\n").unwrap();
        assert_eq!(config.conversion.source, None);
        assert_eq!(config.conversion.quote_identifiers, QuotePolicy::AsNeeded);
        assert!(config.output.overwrite);
        assert_eq!(config.runner, RunnerConfig::default());
    }

    #[test]
    fn test_from_yaml_empty_document() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.conversion.target, None);
    }

    #[test]
    fn test_from_yaml_rejects_unknown_dialect() {
        let err = Config::from_yaml("conversion:\n  target: db2\n").unwrap_err();
        assert!(err.to_string().contains("db2"), "{err}");
    }

    #[test]
    fn test_from_yaml_rejects_zero_workers() {
        let err = Config::from_yaml("runner:\n  workers: 0\n").unwrap_err();
        assert!(err.to_string().contains("runner.workers"), "{err}");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "conversion:\n  target: sqlserver").unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.conversion.target, Some(DialectKind::Sqlserver));
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/sqlmapper.yaml").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Io);
    }

    #[test]
    fn test_to_yaml_reloads() {
        let config = Config::from_yaml("conversion:\n  target: sqlite\n").unwrap();
        let yaml = config.to_yaml().unwrap();
        let reloaded = Config::from_yaml(&yaml).unwrap();
        assert_eq!(reloaded, config);
    }
}
