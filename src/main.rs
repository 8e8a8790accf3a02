use rotalog::cli::{self, Cli};
use tracing_subscriber::EnvFilter;

fn main() {
    // Rotation and file diagnostics go to stderr, RUST_LOG overrides
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = Cli::run() {
        cli::report_error(&e);
        std::process::exit(1);
    }
}
