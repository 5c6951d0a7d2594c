//! Log output for the command-line tool.

use tracing_subscriber::EnvFilter;

/// Filter directive for a given `-v` count.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "minirag=debug,minirag_cli=debug,info",
        _ => "trace",
    }
}

/// Install a stderr `fmt` subscriber. `RUST_LOG` takes precedence over `verbosity`.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
