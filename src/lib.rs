pub mod api; // HTTP JSON API
pub mod config;
pub mod crypto; // Report payload encryption
pub mod db; // Encrypted per-patient report history
pub mod knowledge; // Test catalogs and explanation table
pub mod models;
pub mod pipeline; // Normalize → extract → classify → explain → score
pub mod reporting; // Analysis with history, shared by API and CLI

use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber. Logs go to stderr so command
/// output on stdout stays machine-readable.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();
}
