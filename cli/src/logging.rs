//! Logging configuration for the shell.
//!
//! Logs go to stderr so they never interleave with command output on stdout.
//! Set `DEBUG_LOGGING=1` to enable debug output for lmeter crates.

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEBUG_DIRECTIVE: &str = "info,lmeter_cli=debug,lmeter_core=debug";

pub fn init() {
    let debug_logging = std::env::var("DEBUG_LOGGING").is_ok();

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    let filter = EnvFilter::new(if debug_logging { DEBUG_DIRECTIVE } else { "info" });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(filter)
        .init();

    tracing::info!(debug_logging, "LMeter logging initialized");
}
