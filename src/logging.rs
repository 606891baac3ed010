use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

/// Crates that drive the run; they log at the requested level.
const PIPELINE_TARGETS: &[&str] = &["anen", "anen_analog"];

/// Building-block crates; they log one level quieter than the pipeline.
const SUPPORT_TARGETS: &[&str] = &["anen_data", "anen_knn", "anen_stats"];

const LEVELS: [&str; 4] = ["warn", "info", "debug", "trace"];

/// Default `EnvFilter` directives for a verbosity count.
///
/// Mapping for the pipeline crates:
/// - 0 (none) -> warn
/// - 1 (-v)   -> info
/// - 2 (-vv)  -> debug
/// - 3+ (-vvv)-> trace
fn default_filter(verbosity: u8) -> String {
    let pipeline = LEVELS[usize::from(verbosity).min(3)];
    let support = LEVELS[usize::from(verbosity.saturating_sub(1)).min(3)];
    PIPELINE_TARGETS
        .iter()
        .map(|t| format!("{t}={pipeline}"))
        .chain(SUPPORT_TARGETS.iter().map(|t| format!("{t}={support}")))
        .collect::<Vec<_>>()
        .join(",")
}

/// Initialize tracing based on CLI verbosity level.
///
/// From `-vv` on, closing `compute`/`compute_sharded` spans are logged
/// with their elapsed time. `RUST_LOG` env var overrides the CLI flag if
/// set.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));
    let span_events = if verbosity >= 2 { FmtSpan::CLOSE } else { FmtSpan::NONE };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(span_events)
        .init();
}
