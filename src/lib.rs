//! # user-digest
//!
//! Fetches users, their posts, and (for one designated user) the comments on
//! those posts from a jsonplaceholder-style REST API, and reshapes them into a
//! single denormalized report.
//!
//! ## Quick Start
//!
//! ```no_run
//! use tokio_util::sync::CancellationToken;
//! use user_digest::{Config, aggregate, report};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config {
//!         special_user_name: "Ervin Howell".to_string(),
//!         ..Default::default()
//!     };
//!
//!     let users = aggregate::run(&config, CancellationToken::new()).await?;
//!     report::emit(&users)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Testing against another source
//!
//! The fetchers only need a [`ResourceSource`]; anything that can answer
//! `GET /users`, `/posts` and `/comments` with JSON will do.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Aggregation pass
pub mod aggregate;
/// HTTP resource client
pub mod client;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Collection fetchers
pub mod fetch;
/// Report output
pub mod report;
/// Wire and report types
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used types
pub use aggregate::Aggregator;
pub use client::{HttpClient, ResourceRequest, ResourceSource};
pub use config::{Config, HttpConfig, LimitsConfig};
pub use error::{Error, Result};
pub use fetch::Fetcher;
pub use report::ReportSummary;
pub use types::{Comment, Post, RawPost, RawUser, User};

/// Resolve when the process receives a termination signal.
///
/// - **Unix:** SIGTERM or SIGINT, with fallbacks if registration fails.
/// - **Windows/other:** Ctrl+C via `tokio::signal::ctrl_c()`.
#[cfg(unix)]
pub async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Registration may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register signal handlers, using ctrl_c fallback");
            tokio::signal::ctrl_c().await.ok();
        }
    }
}

/// Resolve when the process receives Ctrl+C.
#[cfg(not(unix))]
pub async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
