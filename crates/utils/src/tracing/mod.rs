use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vgm_core::constants::VGM_LOG_VAR;

const DEFAULT_FILTER: &str = "info";

/// Initialize the tracing system
///
/// Logs go to stderr so the wrapped command keeps stdout to itself. Lines carry
/// no timestamps or targets. The filter comes from `VGM_LOG`, then `RUST_LOG`,
/// then defaults to `info`.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let filter = build_filter(std::env::var(VGM_LOG_VAR).ok().as_deref());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(is_tty())
        .without_time()
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Resolve the log filter from an explicit directive, falling back to `RUST_LOG`
fn build_filter(directive: Option<&str>) -> EnvFilter {
    directive
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Check if we're running in a TTY environment
fn is_tty() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr())
}
