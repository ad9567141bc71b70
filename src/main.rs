use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use bitepace::audio::{band_energy, AudioFile};
use bitepace::classify::UnavailableClassifier;
use bitepace::detect::AmplitudeDetector;
use bitepace::engine::PacerEngine;
use bitepace::feedback::LogFeedback;
use bitepace::http::{create_router, AppState};
use bitepace::store::JsonFileStore;
use bitepace::Config;

#[derive(Parser)]
#[command(name = "bitepace", about = "Bite-detection and eating-pace engine")]
struct Cli {
    /// Configuration file (optional; defaults apply when missing)
    #[arg(long, default_value = "config/bitepace")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP control surface
    Serve,
    /// Run amplitude bite detection over a WAV file and print a summary
    Analyze {
        /// WAV file to analyze
        wav: String,
        /// Target seconds between bites
        #[arg(long)]
        interval_secs: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("bitepace v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded config: {}", cfg.service.name);

    match cli.command {
        Command::Serve => serve(cfg).await,
        Command::Analyze { wav, interval_secs } => analyze(cfg, &wav, interval_secs),
    }
}

async fn serve(cfg: Config) -> Result<()> {
    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);

    let store = Arc::new(JsonFileStore::new(&cfg.storage.history_path));
    let feedback = Arc::new(LogFeedback::new(cfg.pacing.feedback));
    let classifier = Arc::new(UnavailableClassifier::new());

    let engine = Arc::new(PacerEngine::new(cfg, store, feedback, classifier));
    let router = create_router(AppState::new(engine));

    info!("HTTP server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, router).await?;

    Ok(())
}

fn analyze(cfg: Config, wav: &str, interval_secs: Option<u32>) -> Result<()> {
    let target_secs = interval_secs.unwrap_or(cfg.pacing.default_interval_secs).max(1);
    let target_ms = target_secs as u64 * 1000;

    let file = AudioFile::open(wav)?;
    let samples = file.to_mono_f32();
    let frame_samples = cfg.audio.frame_samples;
    let frame_ms = (frame_samples as u64 * 1000) / file.sample_rate.max(1) as u64;

    let mut detector = AmplitudeDetector::new(cfg.detection.clone());
    let mut bites = Vec::new();

    for (i, chunk) in samples.chunks(frame_samples).enumerate() {
        let now_ms = i as u64 * frame_ms;
        let energy = band_energy(
            chunk,
            file.sample_rate,
            cfg.detection.min_frequency_hz,
            cfg.detection.max_frequency_hz,
        );
        if let Some(bite) = detector.update(energy, now_ms) {
            info!(
                "Bite at {:.1}s (interval {:?}ms)",
                bite.timestamp_ms as f64 / 1000.0,
                bite.interval_since_last_ms
            );
            bites.push(bite);
        }
    }

    let too_fast = bites
        .iter()
        .filter(|b| b.interval_since_last_ms.map_or(false, |ms| ms < target_ms))
        .count();

    info!(
        "{}: {} bites over {:.1}s, {} faster than the {}s target",
        file.path,
        bites.len(),
        file.duration_seconds,
        too_fast,
        target_secs
    );

    Ok(())
}
