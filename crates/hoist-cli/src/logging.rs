use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the diagnostic log subscriber
///
/// `RUST_LOG` takes precedence; otherwise `verbose` selects `debug` for hoist crates
/// and everything else stays at `warn`.
pub fn init(verbose: bool) {
    let default = if verbose {
        "warn,hoist_core=debug,hoist_cli=debug"
    } else {
        "warn"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let format = fmt::format().with_target(false).compact();

    tracing_subscriber::registry()
        .with(fmt::layer().event_format(format).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
