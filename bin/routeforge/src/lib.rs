//! Routeforge CLI Library
//!
//! Command implementations for the `routeforge` binary.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (build, route, type, check)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! # async fn example() -> color_eyre::eyre::Result<()> {
//! routeforge::cmd::build::run(Path::new("routeforge.toml")).await?;
//! # Ok(())
//! # }
//! ```

pub mod cmd;

pub use routeforge_core::SiteConfig;
pub use routeforge_generator::{BuildStats, Generator};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
