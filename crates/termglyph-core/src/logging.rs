use tracing_subscriber::EnvFilter;

/// Default filter: everything from termglyph, only info and above from the
/// GPU and font stacks.
pub const DEFAULT_FILTER: &str =
    "trace,wgpu_core=info,wgpu_hal=info,naga=info,cosmic_text=info,winit=info";

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over [`DEFAULT_FILTER`]. Calling this more than
/// once is harmless; later calls are ignored.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    install(filter);
}

/// Install the global subscriber with an explicit filter directive string.
pub fn init_with_filter(directives: &str) {
    install(EnvFilter::new(directives));
}

fn install(filter: EnvFilter) {
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_err()
    {
        tracing::trace!("tracing subscriber already installed");
    }
}
