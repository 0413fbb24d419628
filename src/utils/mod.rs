pub mod build_info;

use tracing_subscriber::{filter::Directive, fmt, EnvFilter};

/// Installs the global fmt subscriber. `RUST_LOG` adds to the `cashview=info` default.
///
/// Logs go to stderr so report output on stdout stays machine-readable.
/// Call through [`crate::init`], which guards against a second install.
pub(crate) fn init_tracing() {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "cashview=info".parse::<Directive>() {
        filter = filter.add_directive(directive);
    }

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
