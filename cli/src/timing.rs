//! Tracing setup for the CLI.
//!
//! With `--timing`, span close events are logged with their duration, so any
//! function annotated with `#[tracing::instrument]` reports how long it took:
//!
//! ```ignore
//! #[tracing::instrument(skip_all, name = "compare")]
//! async fn run_compare(/* ... */) { /* ... */ }
//! ```

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

/// Installs the global subscriber. `RUST_LOG` overrides the default level.
///
/// Default level is WARN, INFO with `timing` (span close events are INFO),
/// DEBUG with `verbose`.
pub fn init_tracing(verbose: bool, timing: bool) {
    let default_level = match (verbose, timing) {
        (true, _) => LevelFilter::DEBUG,
        (false, true) => LevelFilter::INFO,
        (false, false) => LevelFilter::WARN,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    let span_events = if timing {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(verbose)
                .with_level(true)
                .with_span_events(span_events)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
