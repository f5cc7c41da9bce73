use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tickwatch::data::duration::format_duration;
use tickwatch::{JolokiaSource, Overrides, PollLoop, Settings, TickWriter, Timeline};

#[derive(Parser, Debug)]
#[command(name = "tickwatch")]
#[command(about = "Stream per-tick server loop durations from a Jolokia agent as CSV")]
struct Args {
    /// Jolokia agent base URL [default: http://127.0.0.1:8778/jolokia]
    #[arg(long)]
    jolokia: Option<String>,

    /// Time between polls (e.g., "2.5s", "500ms")
    #[arg(short, long)]
    period: Option<String>,

    /// Request timeout (e.g., "5s")
    #[arg(short, long)]
    timeout: Option<String>,

    /// Minimum spacing between synthetic tick timestamps, in milliseconds
    #[arg(long)]
    min_tick_ms: Option<f64>,

    /// Path to a TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let overrides = Overrides {
        jolokia: args.jolokia,
        period: args.period,
        timeout: args.timeout,
        min_tick_ms: args.min_tick_ms,
    };
    let settings = Settings::load(args.config.as_deref(), &overrides)?;

    // stdout carries the data stream, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let period = settings.period()?;
    let timeout = settings.timeout()?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(async {
        let source = JolokiaSource::builder()
            .endpoint(settings.jolokia.as_str())
            .mbean(settings.mbean.as_str())
            .attribute(settings.attribute.as_str())
            .timeout(timeout)
            .build()
            .context("failed to create Jolokia source")?;

        info!(
            url = source.url(),
            period = %format_duration(period),
            "starting tick stream"
        );

        let writer = TickWriter::new(io::stdout(), settings.measurement.as_str());
        let timeline = Timeline::new(settings.min_tick_ms);
        let mut poll_loop = PollLoop::new(source, writer, timeline, period);

        poll_loop.run().await.context("failed to write tick stream")
    })
}
