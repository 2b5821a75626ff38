pub mod check;
pub mod compile;
pub mod loader;
pub mod run_common;

#[cfg(test)]
mod loader_tests;

use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `QUIRE_LOG` takes precedence over `-v`.
pub fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_env("QUIRE_LOG").unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        })
    });
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
