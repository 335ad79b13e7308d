//! sqlmapper CLI - convert DDL scripts between SQL dialects.

use clap::Parser;
use sqlmapper::{
    Config, ConversionJob, Converter, DialectKind, DriverCatalog, MapperError, Runner,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

#[derive(Parser)]
#[command(name = "sqlmapper")]
#[command(about = "Convert DDL between MySQL, PostgreSQL, SQLite, Oracle and SQL Server")]
#[command(version)]
struct Cli {
    /// DDL file to convert (repeat for a batch)
    #[arg(short, long = "file", value_name = "PATH", required = true)]
    files: Vec<PathBuf>,

    /// Target dialect: mysql, postgres, sqlite, oracle, sqlserver
    #[arg(short, long)]
    to: Option<String>,

    /// Source dialect (detected from the file contents if omitted)
    #[arg(long)]
    from: Option<String>,

    /// Directory for converted files (default: next to each input)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Path to YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of parallel workers
    #[arg(long)]
    workers: Option<usize>,

    /// Per-file conversion timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Print the batch result as JSON to stdout
    #[arg(long)]
    output_json: bool,

    /// Log format: text or json
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Log verbosity: trace, debug, info, warn, error
    #[arg(long, env = "SQLMAPPER_LOG", default_value = "info")]
    verbosity: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, MapperError> {
    let cli = Cli::parse();

    setup_logging(&cli.verbosity, &cli.log_format).map_err(MapperError::Config)?;

    let mut config = match &cli.config {
        Some(path) => {
            let config = Config::load(path)?;
            info!("Loaded configuration from {:?}", path);
            config
        }
        None => Config::default(),
    };

    // Apply overrides
    if let Some(to) = &cli.to {
        config.conversion.target = Some(to.parse()?);
    }
    if let Some(from) = &cli.from {
        config.conversion.source = Some(from.parse()?);
    }
    if let Some(dir) = cli.output_dir {
        config.output.dir = Some(dir);
    }
    if let Some(w) = cli.workers {
        config.runner.workers = w;
    }
    if let Some(t) = cli.timeout {
        config.runner.timeout_secs = t;
    }
    config.validate()?;

    let target: DialectKind = config.conversion.target.ok_or_else(|| {
        MapperError::Config("--to is required (or conversion.target in the config file)".into())
    })?;

    let converter = Converter::new(
        Arc::new(DriverCatalog::with_builtins()),
        config.conversion.generate_options(),
    );
    let jobs: Vec<ConversionJob> = cli
        .files
        .iter()
        .map(|file| ConversionJob::new(file.clone(), config.conversion.source, target))
        .collect();

    let cancel_token = setup_signal_handler();
    let runner = Runner::new(converter, config.runner.clone(), config.output.clone());
    let result = runner.run(jobs, cancel_token).await;

    if cli.output_json {
        println!("{}", result.to_json()?);
    } else {
        for job in &result.jobs {
            match (&job.output, &job.error) {
                (Some(output), _) => println!("{} -> {}", job.input.display(), output.display()),
                (None, Some(error)) => eprintln!("{}: {}", job.input.display(), error),
                (None, None) => eprintln!("{}: not converted", job.input.display()),
            }
        }
    }

    if result.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(result.exit_code().max(1)))
    }
}

fn setup_logging(verbosity: &str, format: &str) -> Result<(), String> {
    let filter = EnvFilter::try_new(verbosity.to_lowercase())
        .map_err(|e| format!("Invalid verbosity '{}': {}", verbosity, e))?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr);

    match format {
        "json" => subscriber.json().init(),
        "text" => subscriber.init(),
        other => return Err(format!("Unknown log format '{}': expected text or json", other)),
    }

    Ok(())
}

/// Setup signal handlers for graceful shutdown.
/// Handles both SIGINT (Ctrl-C) and SIGTERM.
/// Returns a CancellationToken that will be cancelled when a signal is received.
#[cfg(unix)]
fn setup_signal_handler() -> CancellationToken {
    let cancel_token = CancellationToken::new();

    let token_int = cancel_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nReceived SIGINT. Stopping after running conversions...");
            token_int.cancel();
        }
    });

    let token_term = cancel_token.clone();
    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::spawn(async move {
                sigterm.recv().await;
                eprintln!("\nReceived SIGTERM. Stopping after running conversions...");
                token_term.cancel();
            });
        }
        Err(e) => warn!("Failed to install SIGTERM handler: {}", e),
    }

    cancel_token
}

/// Setup signal handler for Windows (only Ctrl-C)
#[cfg(not(unix))]
fn setup_signal_handler() -> CancellationToken {
    let cancel_token = CancellationToken::new();
    let token = cancel_token.clone();

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nReceived Ctrl-C. Stopping after running conversions...");
            token.cancel();
        }
    });

    cancel_token
}
