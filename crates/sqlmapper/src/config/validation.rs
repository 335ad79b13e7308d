//! Configuration validation.

use super::Config;
use crate::error::{MapperError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    let runner = &config.runner;
    if runner.workers == 0 {
        return Err(MapperError::Config(
            "runner.workers must be at least 1".into(),
        ));
    }
    if runner.queue_capacity == 0 {
        return Err(MapperError::Config(
            "runner.queue_capacity must be at least 1".into(),
        ));
    }
    if runner.timeout_secs == 0 {
        return Err(MapperError::Config(
            "runner.timeout_secs must be at least 1".into(),
        ));
    }

    if let Some(dir) = &config.output.dir {
        if dir.as_os_str().is_empty() {
            return Err(MapperError::Config("output.dir must not be empty".into()));
        }
        if dir.is_file() {
            return Err(MapperError::Config(format!(
                "output.dir {:?} is a file, not a directory",
                dir
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OutputConfig, RunnerConfig};
    use std::path::PathBuf;

    fn valid_config() -> Config {
        Config::default()
    }

    #[test]
    fn test_valid_config() {
        let config = valid_config();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_queue_capacity() {
        let mut config = valid_config();
        config.runner.queue_capacity = 0;
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("runner.queue_capacity"));
    }

    #[test]
    fn test_zero_timeout() {
        let mut config = valid_config();
        config.runner = RunnerConfig {
            timeout_secs: 0,
            ..RunnerConfig::default()
        };
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_output_dir_is_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut config = valid_config();
        config.output = OutputConfig {
            dir: Some(file.path().to_path_buf()),
            overwrite: true,
        };
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("is a file"));
    }

    #[test]
    fn test_output_dir_empty() {
        let mut config = valid_config();
        config.output.dir = Some(PathBuf::new());
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_retries_allowed() {
        let mut config = valid_config();
        config.runner.max_retries = 0;
        assert!(validate(&config).is_ok());
    }
}
