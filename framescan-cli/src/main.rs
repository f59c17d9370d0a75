//! Framescan CLI - Command-line interface
//!
//! Submits one or more video sources to the analysis engine and polls their
//! progress until every job settles. The analyzer is simulated; sources do
//! not need to exist on disk.

mod error;

use clap::Parser;
use error::CliError;
use framescan::analyzer::SimulatedAnalyzer;
use framescan::engine::{AnalysisEngine, EngineConfig, JobId, JobRecord};
use framescan::logging::{default_log_dir, default_log_file, init_logging};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(name = "framescan")]
#[command(about = "Run simulated frame analysis jobs over video sources", long_about = None)]
struct Args {
    /// Video source paths to analyze (one job per source)
    #[arg(required = true)]
    sources: Vec<PathBuf>,

    /// Maximum concurrently processing jobs (defaults to CPU count)
    #[arg(long)]
    capacity: Option<usize>,

    /// Frames per simulated source
    #[arg(long, default_value = "120")]
    frames: u64,

    /// Simulated per-frame delay in milliseconds
    #[arg(long, default_value = "25")]
    frame_delay_ms: u64,

    /// Status poll interval in milliseconds
    #[arg(long, default_value = "200")]
    poll_ms: u64,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(e) = run(args).await {
        e.exit();
    }
}

async fn run(args: Args) -> Result<(), CliError> {
    let _logging_guard = init_logging(default_log_dir(), default_log_file())
        .map_err(|e| CliError::LoggingInit(e.to_string()))?;

    let config = match args.capacity {
        Some(capacity) => EngineConfig::with_capacity(capacity),
        None => EngineConfig::default(),
    };

    let analyzer = SimulatedAnalyzer::new(args.frames)
        .with_frame_delay(Duration::from_millis(args.frame_delay_ms));
    let engine = AnalysisEngine::new(config, analyzer);

    println!("framescan v{}", framescan::VERSION);
    println!(
        "Submitting {} job(s), capacity {}",
        args.sources.len(),
        engine.capacity()
    );
    println!();

    let mut ids: Vec<JobId> = Vec::with_capacity(args.sources.len());
    for source in &args.sources {
        let name = source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.display().to_string());
        let id = engine.submit(source.clone(), name).await;
        ids.push(id);
    }

    let failed = poll_until_settled(&engine, &ids, Duration::from_millis(args.poll_ms)).await?;

    println!();
    if failed > 0 {
        return Err(CliError::JobsFailed(failed));
    }
    println!("All jobs finished.");
    Ok(())
}

/// Polls job records until every submitted job is terminal, printing one
/// line per observed status transition. Returns the number of jobs that
/// ended in an error state.
async fn poll_until_settled(
    engine: &AnalysisEngine<SimulatedAnalyzer>,
    ids: &[JobId],
    interval: Duration,
) -> Result<usize, CliError> {
    let mut last_seen: HashMap<JobId, JobRecord> = HashMap::new();

    loop {
        let mut all_terminal = true;

        for &id in ids {
            let record = engine.status(id).await?;
            let changed = last_seen
                .get(&id)
                .map(|prev| prev.status != record.status)
                .unwrap_or(true);
            if changed {
                println!(
                    "[job {}] {} -> {} ({:.0}%)",
                    record.id, record.name, record.status, record.percentage
                );
            }
            if !record.status.is_terminal() {
                all_terminal = false;
            }
            last_seen.insert(id, record);
        }

        if all_terminal {
            break;
        }
        tokio::time::sleep(interval).await;
    }

    let failed = last_seen
        .values()
        .filter(|r| r.status == framescan::engine::JobStatus::Error)
        .count();
    info!(jobs = ids.len(), failed, "all jobs settled");
    Ok(failed)
}
