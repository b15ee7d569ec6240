use anyhow::{Context, Result};
use clap::Parser;
use framejank::cli::{Cli, OutputFormat};
use framejank::classifier::JankClassifier;
use framejank::config::ThresholdConfig;
use framejank::lifecycle::SurfaceLifecycle;
use framejank::replay;
use framejank::sink::{DiagnosticSink, JsonLinesSink, TracingSink};
use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; FrameMetrics diagnostics are warn/error
/// events, so the default filter always lets them through
fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let filter = if debug {
        filter.add_directive(tracing::Level::TRACE.into())
    } else {
        filter
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

/// Resolve thresholds: defaults, then --config, then individual flags
fn load_config(args: &Cli) -> Result<ThresholdConfig> {
    let base = match &args.config {
        Some(path) => ThresholdConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ThresholdConfig::default(),
    };

    let config = args.apply_overrides(base);
    config.validate().context("Invalid threshold configuration")?;
    Ok(config)
}

fn open_input(args: &Cli) -> Result<Box<dyn BufRead>> {
    if args.input.as_os_str() == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(&args.input)
        .with_context(|| format!("Failed to open input {}", args.input.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = load_config(&args)?;
    tracing::debug!(?config, "threshold configuration");

    let sink: Arc<dyn DiagnosticSink> = match args.format {
        OutputFormat::Text => Arc::new(TracingSink),
        OutputFormat::Json => Arc::new(JsonLinesSink::new(io::stdout())),
    };

    let classifier = Arc::new(JankClassifier::with_sink(config, sink)?);
    let lifecycle = SurfaceLifecycle::new(classifier);

    let input = open_input(&args)?;
    let summary = replay::replay(&lifecycle, input)?;

    tracing::info!(
        events = summary.events,
        frames = summary.frames,
        janky = summary.janky_frames,
        dropped = summary.dropped_frames,
        "replay finished"
    );

    if args.summary {
        eprint!("{}", summary.format_table());
    }

    Ok(())
}
