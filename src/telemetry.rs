use tracing::info;
use tracing_subscriber::EnvFilter;

/// Initialize telemetry. `RUST_LOG` overrides the default filter.
pub fn init_telemetry(verbose: bool) {
    let default_filter = if verbose {
        "info,timelapse_control=debug"
    } else {
        "warn,timelapse_control=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    // Logs go to stderr so the panel output on stdout stays readable
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(verbose)
        .with_line_number(verbose)
        .with_writer(std::io::stderr)
        .init();

    info!("📊 Telemetry initialized (verbose: {})", verbose);
}
