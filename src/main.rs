//! `user-digest` binary: one aggregation pass, JSON report on stdout.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};
use user_digest::{Config, Result, aggregate, report, wait_for_signal};

/// `user-digest` command arguments. Flags override the config file, which
/// overrides the built-in defaults.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "user-digest",
    about = "Print users with their posts, and comments for one special user, as JSON",
    version
)]
struct CliArgs {
    /// JSON configuration file
    #[arg(long = "config", value_name = "path")]
    config: Option<PathBuf>,
    /// API base URL
    #[arg(long = "base-url", value_name = "url")]
    base_url: Option<String>,
    /// User whose posts get comments; pass "" to disable
    #[arg(long = "special-user", value_name = "name")]
    special_user: Option<String>,
    /// Users to fetch by id range 1..=n (0 = all, one bulk request)
    #[arg(long = "users-limit", value_name = "n")]
    users_limit: Option<usize>,
    /// Posts kept per user (0 = all)
    #[arg(long = "posts-limit", value_name = "n")]
    posts_limit: Option<usize>,
    /// Comments kept per post (0 = all)
    #[arg(long = "comments-limit", value_name = "n")]
    comments_limit: Option<usize>,
    /// Per-request timeout in seconds
    #[arg(long = "timeout-secs", value_name = "secs")]
    timeout_secs: Option<u64>,
    /// Maximum requests in flight (1 = sequential)
    #[arg(long = "concurrency", value_name = "n")]
    concurrency: Option<usize>,
}

impl CliArgs {
    fn resolve(self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(base_url) = self.base_url {
            config.http.base_url = base_url;
        }
        if let Some(name) = self.special_user {
            config.special_user_name = name;
        }
        if let Some(n) = self.users_limit {
            config.limits.users_limit = n;
        }
        if let Some(n) = self.posts_limit {
            config.limits.posts_limit = n;
        }
        if let Some(n) = self.comments_limit {
            config.limits.comments_limit = n;
        }
        if let Some(secs) = self.timeout_secs {
            config.http.request_timeout = Duration::from_secs(secs);
        }
        if let Some(n) = self.concurrency {
            config.concurrency = n;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so stdout carries only the report
    if let Err(e) = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("tracing init failed: {}", e);
    }

    match run(CliArgs::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = e.error_code(), error = %e, "user-digest failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: CliArgs) -> Result<()> {
    let config = args.resolve()?;

    let cancel_token = CancellationToken::new();
    let signal_token = cancel_token.clone();
    tokio::spawn(async move {
        wait_for_signal().await;
        warn!("Cancelling aggregation pass");
        signal_token.cancel();
    });

    let users = aggregate::run(&config, cancel_token).await?;
    report::emit(&users)?;
    Ok(())
}
