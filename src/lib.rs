// Library module for the dataset sync function

pub mod azure;
pub mod config;
pub mod handler;
pub mod ingestion;

/// Install the fmt subscriber used by both binaries
pub fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .with_thread_ids(false)
        .with_level(true)
        .init();
}
