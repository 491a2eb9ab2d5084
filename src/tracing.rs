//! Installs the global `tracing` subscriber, in the shape of `pueue/src/tracing.rs`.
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Install the process-wide tracing subscriber. `verbosity` is the `-v` repeat count: 0 is
/// `warn`, 1 is `info`, 2 is `debug`, 3 is `trace`, 4+ is `trace` with pretty-printed spans.
pub fn install_tracing(verbosity: u8) -> color_eyre::Result<()> {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let timer = ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string());

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_error::ErrorLayer::default());

    if verbosity >= 4 {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_timer(timer)
                    .with_target(true)
                    .pretty(),
            )
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_timer(timer)
                    .with_target(verbosity >= 2),
            )
            .try_init()?;
    }

    Ok(())
}
