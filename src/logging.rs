use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber. Logs go to stderr; stdout carries JSON payloads.
///
/// `RUST_LOG` takes precedence; otherwise `verbose` selects debug over info.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "event_atlas=debug" } else { "event_atlas=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let console_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .init();
}
