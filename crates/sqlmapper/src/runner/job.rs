//! One file conversion: read, detect, convert, write.

use crate::config::{OutputConfig, RunnerConfig};
use crate::convert::Converter;
use crate::detect::detect_dialect;
use crate::dialect::DialectKind;
use crate::error::{MapperError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

/// A file to convert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionJob {
    /// Input DDL file.
    pub input: PathBuf,

    /// Source dialect. Detected from the file contents if not set.
    pub source: Option<DialectKind>,

    /// Target dialect.
    pub target: DialectKind,
}

impl ConversionJob {
    pub fn new(input: impl Into<PathBuf>, source: Option<DialectKind>, target: DialectKind) -> Self {
        Self {
            input: input.into(),
            source,
            target,
        }
    }
}

/// Outcome of one job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobReport {
    pub input: PathBuf,

    /// Source dialect, as given or detected.
    pub source: Option<DialectKind>,

    pub target: DialectKind,

    /// Written file, on success.
    pub output: Option<PathBuf>,

    /// Error message, on failure.
    pub error: Option<String>,

    /// Process exit code for the failure.
    pub exit_code: Option<u8>,

    pub duration_seconds: f64,
}

impl JobReport {
    pub fn is_success(&self) -> bool {
        self.output.is_some()
    }

    fn failed(job: &ConversionJob, err: &MapperError, duration_seconds: f64) -> Self {
        Self {
            input: job.input.clone(),
            source: job.source,
            target: job.target,
            output: None,
            error: Some(err.to_string()),
            exit_code: Some(err.exit_code()),
            duration_seconds,
        }
    }

    /// Report for a job no worker picked up.
    pub(crate) fn not_run(job: &ConversionJob, err: &MapperError) -> Self {
        Self::failed(job, err, 0.0)
    }
}

/// Output file for `input` converted to `target`: `<basename>_<dialect>.sql`.
///
/// Placed in `dir` when given, otherwise next to the input.
pub fn output_path(input: &Path, target: DialectKind, dir: Option<&Path>) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "schema".to_string());
    let name = format!("{}_{}.sql", stem, target.name());
    match dir {
        Some(dir) => dir.join(name),
        None => match input.parent() {
            Some(parent) => parent.join(name),
            None => PathBuf::from(name),
        },
    }
}

/// Run one job and report its outcome. Never fails; errors land in the report.
#[instrument(skip_all, fields(input = %job.input.display(), target = %job.target))]
pub(super) async fn execute(
    converter: &Arc<Converter>,
    config: &RunnerConfig,
    output: &OutputConfig,
    job: &ConversionJob,
    cancel: &CancellationToken,
) -> JobReport {
    let start = Instant::now();
    match convert_file(converter, config, output, job, cancel).await {
        Ok((source, path)) => {
            info!("{}: {} -> {}", job.input.display(), source, path.display());
            JobReport {
                input: job.input.clone(),
                source: Some(source),
                target: job.target,
                output: Some(path),
                error: None,
                exit_code: None,
                duration_seconds: start.elapsed().as_secs_f64(),
            }
        }
        Err(e) => {
            warn!("{}: {}", job.input.display(), e);
            JobReport::failed(job, &e, start.elapsed().as_secs_f64())
        }
    }
}

async fn convert_file(
    converter: &Arc<Converter>,
    config: &RunnerConfig,
    output: &OutputConfig,
    job: &ConversionJob,
    cancel: &CancellationToken,
) -> Result<(DialectKind, PathBuf)> {
    if cancel.is_cancelled() {
        return Err(MapperError::Cancelled);
    }

    let text = read_with_retry(&job.input, config, cancel).await?;
    let source = match job.source {
        Some(kind) => kind,
        None => detect_dialect(&text)?,
    };
    let target = job.target;

    let worker = converter.clone();
    let task = tokio::task::spawn_blocking(move || worker.convert(&text, source, target));
    let converted = tokio::select! {
        _ = cancel.cancelled() => Err(MapperError::Cancelled),
        res = tokio::time::timeout(config.timeout(), task) => match res {
            Ok(Ok(result)) => result,
            Ok(Err(join)) => Err(MapperError::Io(std::io::Error::other(join))),
            Err(_) => Err(MapperError::Timeout {
                job: job.input.display().to_string(),
                seconds: config.timeout_secs,
            }),
        },
    }?;

    let path = output_path(&job.input, target, output.dir.as_deref());
    if !output.overwrite && tokio::fs::try_exists(&path).await? {
        return Err(MapperError::Config(format!(
            "Output file {} already exists",
            path.display()
        )));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, converted).await?;

    Ok((source, path))
}

/// Read a file, retrying with linear backoff (`base * attempt`).
async fn read_with_retry(
    path: &Path,
    config: &RunnerConfig,
    cancel: &CancellationToken,
) -> Result<String> {
    let mut attempt: u32 = 0;
    loop {
        match tokio::fs::read_to_string(path).await {
            Ok(text) => return Ok(text),
            Err(e) if attempt < config.max_retries && !cancel.is_cancelled() => {
                attempt += 1;
                warn!(
                    "Failed to read {}: {}, retry {}/{}",
                    path.display(),
                    e,
                    attempt,
                    config.max_retries
                );
                tokio::time::sleep(config.retry_base_delay() * attempt).await;
            }
            Err(e) => return Err(e.into()),
        }
    }
}
