//! Batch runner - converts many files concurrently.
//!
//! Jobs flow through a bounded queue to a fixed pool of workers:
//! - the producer awaits when the queue is full
//! - each worker reads its input (with retries), picks the source dialect,
//!   runs the conversion on the blocking pool under a deadline and writes
//!   the output file
//! - a [`CancellationToken`] stops the producer and every worker; jobs that
//!   never ran are reported as cancelled

mod job;

pub use job::{output_path, ConversionJob, JobReport};

use crate::config::{OutputConfig, RunnerConfig};
use crate::convert::Converter;
use crate::error::MapperError;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Result of a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    /// Final status: "completed", "failed" or "cancelled".
    pub status: String,

    /// Total duration in seconds.
    pub duration_seconds: f64,

    /// When the run started.
    pub started_at: DateTime<Utc>,

    /// When the run completed.
    pub completed_at: DateTime<Utc>,

    /// Jobs submitted.
    pub jobs_total: usize,

    /// Jobs that wrote an output file.
    pub jobs_succeeded: usize,

    /// Jobs that failed or never ran.
    pub jobs_failed: usize,

    /// Per-job reports, in submission order.
    pub jobs: Vec<JobReport>,
}

impl BatchResult {
    /// Convert to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Whether every job succeeded.
    pub fn is_success(&self) -> bool {
        self.jobs_failed == 0
    }

    /// Exit code of the first failed job, or 0.
    pub fn exit_code(&self) -> u8 {
        self.jobs
            .iter()
            .find_map(|job| job.exit_code)
            .unwrap_or(0)
    }
}

/// Worker pool over a shared [`Converter`].
pub struct Runner {
    converter: Arc<Converter>,
    config: RunnerConfig,
    output: OutputConfig,
}

impl Runner {
    pub fn new(converter: Converter, config: RunnerConfig, output: OutputConfig) -> Self {
        Self {
            converter: Arc::new(converter),
            config,
            output,
        }
    }

    /// Run every job to completion, failure or cancellation.
    pub async fn run(&self, jobs: Vec<ConversionJob>, cancel: CancellationToken) -> BatchResult {
        let started_at = Utc::now();
        let start = Instant::now();
        let jobs_total = jobs.len();
        let workers = self.config.workers.max(1).min(jobs_total.max(1));

        info!(
            "Converting {} files with {} workers (queue capacity {})",
            jobs_total, workers, self.config.queue_capacity
        );

        let (tx, rx) = mpsc::channel::<(usize, ConversionJob)>(self.config.queue_capacity.max(1));
        let rx = Arc::new(Mutex::new(rx));

        let mut handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let rx = rx.clone();
            let converter = self.converter.clone();
            let config = self.config.clone();
            let output = self.output.clone();
            let cancel = cancel.clone();

            handles.push(tokio::spawn(async move {
                let mut done = Vec::new();
                loop {
                    let next = {
                        let mut rx = rx.lock().await;
                        tokio::select! {
                            _ = cancel.cancelled() => None,
                            job = rx.recv() => job,
                        }
                    };
                    let Some((index, job)) = next else {
                        break;
                    };
                    let report = job::execute(&converter, &config, &output, &job, &cancel).await;
                    debug!("worker {} finished {}", worker_id, job.input.display());
                    done.push((index, report));
                }
                done
            }));
        }

        let mut slots: Vec<Option<JobReport>> = vec![None; jobs_total];
        for (index, job) in jobs.iter().cloned().enumerate() {
            let sent = tokio::select! {
                _ = cancel.cancelled() => false,
                res = tx.send((index, job)) => res.is_ok(),
            };
            if !sent {
                info!("Cancellation requested, stopping new conversions");
                break;
            }
        }
        drop(tx);

        for handle in join_all(handles).await {
            match handle {
                Ok(done) => {
                    for (index, report) in done {
                        slots[index] = Some(report);
                    }
                }
                Err(e) => error!("Worker task failed: {}", e),
            }
        }

        // Jobs that never reached a worker.
        let reports: Vec<JobReport> = slots
            .into_iter()
            .zip(&jobs)
            .map(|(slot, job)| {
                slot.unwrap_or_else(|| JobReport::not_run(job, &MapperError::Cancelled))
            })
            .collect();

        let jobs_succeeded = reports.iter().filter(|r| r.output.is_some()).count();
        let jobs_failed = jobs_total - jobs_succeeded;
        let status = if cancel.is_cancelled() {
            "cancelled"
        } else if jobs_failed > 0 {
            "failed"
        } else {
            "completed"
        };

        let completed_at = Utc::now();
        let result = BatchResult {
            status: status.to_string(),
            duration_seconds: start.elapsed().as_secs_f64(),
            started_at,
            completed_at,
            jobs_total,
            jobs_succeeded,
            jobs_failed,
            jobs: reports,
        };
        info!(
            "Batch {}: {}/{} files converted in {:.2}s",
            result.status, result.jobs_succeeded, result.jobs_total, result.duration_seconds
        );
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::DialectKind;
    use std::path::Path;

    fn runner(dir: &Path) -> Runner {
        Runner::new(
            Converter::default(),
            RunnerConfig {
                workers: 2,
                queue_capacity: 1,
                max_retries: 0,
                ..RunnerConfig::default()
            },
            OutputConfig {
                dir: Some(dir.join("out")),
                overwrite: true,
            },
        )
    }

    fn write(dir: &Path, name: &str, sql: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, sql).unwrap();
        path
    }

    // =========================================================================
    // Batch Tests
    // =========================================================================

    #[tokio::test]
    async fn test_run_converts_every_file() {
        let dir = tempfile::tempdir().unwrap();
        let jobs = vec![
            ConversionJob::new(
                write(dir.path(), "a.sql", "CREATE TABLE a (id serial NOT NULL);"),
                None,
                DialectKind::Mysql,
            ),
            ConversionJob::new(
                write(dir.path(), "b.sql", "CREATE TABLE b (x integer);"),
                Some(DialectKind::Postgres),
                DialectKind::Sqlite,
            ),
            ConversionJob::new(
                write(dir.path(), "c.sql", "CREATE TABLE c (x NUMBER(10));"),
                None,
                DialectKind::Sqlserver,
            ),
        ];

        let result = runner(dir.path()).run(jobs, CancellationToken::new()).await;

        assert_eq!(result.status, "completed");
        assert!(result.is_success());
        assert_eq!(result.jobs_succeeded, 3);
        assert_eq!(result.exit_code(), 0);
        assert_eq!(result.jobs[0].source, Some(DialectKind::Postgres));
        assert_eq!(result.jobs[2].source, Some(DialectKind::Oracle));

        let out = dir.path().join("out");
        let a = std::fs::read_to_string(out.join("a_mysql.sql")).unwrap();
        assert!(a.contains("AUTO_INCREMENT"), "{a}");
        assert!(out.join("b_sqlite.sql").exists());
        assert!(out.join("c_sqlserver.sql").exists());
    }

    #[tokio::test]
    async fn test_run_failures_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let jobs = vec![
            ConversionJob::new(
                write(dir.path(), "good.sql", "CREATE TABLE g (x integer);"),
                Some(DialectKind::Postgres),
                DialectKind::Oracle,
            ),
            ConversionJob::new(
                write(dir.path(), "empty.sql", "-- nothing here\n"),
                Some(DialectKind::Postgres),
                DialectKind::Oracle,
            ),
            ConversionJob::new(
                write(dir.path(), "plain.sql", "CREATE TABLE p (x int);"),
                None,
                DialectKind::Oracle,
            ),
            ConversionJob::new(dir.path().join("missing.sql"), None, DialectKind::Oracle),
        ];

        let result = runner(dir.path()).run(jobs, CancellationToken::new()).await;

        assert_eq!(result.status, "failed");
        assert_eq!(result.jobs_succeeded, 1);
        assert_eq!(result.jobs_failed, 3);
        assert!(result.jobs[0].is_success());
        // Empty input is a parse error.
        assert_eq!(result.jobs[1].exit_code, Some(2));
        // Undetectable source is a configuration error.
        assert_eq!(result.jobs[2].exit_code, Some(1));
        assert_eq!(result.jobs[3].exit_code, Some(7));
        assert_eq!(result.exit_code(), 2);

        let out = dir.path().join("out");
        assert!(out.join("good_oracle.sql").exists());
        assert!(!out.join("empty_oracle.sql").exists());
        assert!(!out.join("plain_oracle.sql").exists());
    }

    #[tokio::test]
    async fn test_run_cancelled_before_start() {
        let dir = tempfile::tempdir().unwrap();
        let jobs = vec![ConversionJob::new(
            write(dir.path(), "a.sql", "CREATE TABLE a (x integer);"),
            Some(DialectKind::Postgres),
            DialectKind::Mysql,
        )];
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = runner(dir.path()).run(jobs, cancel).await;

        assert_eq!(result.status, "cancelled");
        assert_eq!(result.jobs_failed, 1);
        assert_eq!(result.exit_code(), 130);
        assert!(!dir.path().join("out").join("a_mysql.sql").exists());
    }

    #[tokio::test]
    async fn test_run_respects_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "a.sql", "CREATE TABLE a (x integer);");
        std::fs::write(dir.path().join("a_mysql.sql"), "keep").unwrap();

        let runner = Runner::new(
            Converter::default(),
            RunnerConfig::default(),
            OutputConfig {
                dir: None,
                overwrite: false,
            },
        );
        let jobs = vec![ConversionJob::new(input, Some(DialectKind::Postgres), DialectKind::Mysql)];
        let result = runner.run(jobs, CancellationToken::new()).await;

        assert!(!result.is_success());
        let kept = std::fs::read_to_string(dir.path().join("a_mysql.sql")).unwrap();
        assert_eq!(kept, "keep");
    }

    #[tokio::test]
    async fn test_run_empty_batch() {
        let dir = tempfile::tempdir().unwrap();
        let result = runner(dir.path()).run(Vec::new(), CancellationToken::new()).await;
        assert_eq!(result.jobs_total, 0);
        assert_eq!(result.status, "completed");
        let json = result.to_json().unwrap();
        assert!(json.contains("\"jobs_total\": 0"));
    }
}
