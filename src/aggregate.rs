//! The aggregation pass: users, their posts, and comments for the special user.
//!
//! Per-user work runs through an ordered buffered stream. With a width of 1
//! (the default) each user is fully enriched before the next user's request
//! is issued; larger widths overlap requests but `try_buffered` yields results
//! in input order, so the report is the same either way.

use crate::client::{HttpClient, ResourceSource};
use crate::config::{Config, LimitsConfig};
use crate::error::{Error, Result};
use crate::fetch::Fetcher;
use crate::report::ReportSummary;
use crate::types::{Post, User};
use futures::{StreamExt, TryStreamExt, stream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Orchestrates the fetchers into the final report
pub struct Aggregator<S> {
    fetcher: Fetcher<S>,
    special_user: Option<String>,
    limits: LimitsConfig,
    concurrency: usize,
}

impl<S: ResourceSource> Aggregator<S> {
    /// Create an aggregator that takes the special user, limits and
    /// concurrency from `config`.
    pub fn new(fetcher: Fetcher<S>, config: &Config) -> Self {
        Self {
            fetcher,
            special_user: config.special_user().map(str::to_string),
            limits: config.limits.clone(),
            concurrency: config.concurrency.max(1),
        }
    }

    /// The wrapped fetcher
    pub fn fetcher(&self) -> &Fetcher<S> {
        &self.fetcher
    }

    /// Whether `name` belongs to the special user. Always false when the
    /// configured name is blank.
    pub fn is_special(&self, name: &str) -> bool {
        self.special_user.as_deref() == Some(name)
    }

    /// Run one aggregation pass.
    ///
    /// 1. fetch users (per-id failures are skipped when a users limit is set)
    /// 2. project each user
    /// 3. fetch and project each user's posts
    /// 4. for the special user, attach each post's comments in post order
    ///
    /// Posts and comments failures abort the pass.
    pub async fn get_correct_users(&self) -> Result<Vec<User>> {
        if self.fetcher.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let raw_users = self.fetcher.get_users(self.limits.users_limit).await?;
        let users: Vec<User> = raw_users.into_iter().map(User::from_raw).collect();
        debug!(count = users.len(), "Projected users");

        let users: Vec<User> = stream::iter(users)
            .map(|user| Ok::<_, Error>(self.attach_posts(user)))
            .try_buffered(self.concurrency)
            .try_collect::<Vec<User>>()
            .await?;

        let summary = ReportSummary::of(&users);
        info!(
            users = summary.users,
            posts = summary.posts,
            comments = summary.comments,
            "Aggregation pass complete"
        );
        Ok(users)
    }

    async fn attach_posts(&self, mut user: User) -> Result<User> {
        let posts = self
            .fetcher
            .get_posts(user.id, self.limits.posts_limit)
            .await?;
        user.posts = posts.into_iter().map(Post::from_raw).collect();
        debug!(user_id = user.id, posts = user.posts.len(), "Attached posts");

        if self.is_special(&user.name) {
            user.posts = self.attach_comments(user.posts).await?;
            debug!(user_id = user.id, "Attached comments for special user");
        }
        Ok(user)
    }

    async fn attach_comments(&self, posts: Vec<Post>) -> Result<Vec<Post>> {
        stream::iter(posts)
            .map(|mut post| {
                Ok::<_, Error>(async move {
                    let comments = self
                        .fetcher
                        .get_comments(post.id, self.limits.comments_limit)
                        .await?;
                    post.comments = Some(comments);
                    Ok::<_, Error>(post)
                })
            })
            .try_buffered(self.concurrency)
            .try_collect::<Vec<Post>>()
            .await
    }
}

/// Build the HTTP client from `config`, run one aggregation pass and return
/// the report.
///
/// # Errors
/// Returns [`Error::Config`] for invalid configuration, [`Error::Cancelled`]
/// if `cancel_token` fires, and any fatal fetch error.
pub async fn run(config: &Config, cancel_token: CancellationToken) -> Result<Vec<User>> {
    config.validate()?;
    let client = HttpClient::new(&config.http)?;
    info!(
        base_url = %client.base_url(),
        special_user = config.special_user().unwrap_or(""),
        users_limit = config.limits.users_limit,
        posts_limit = config.limits.posts_limit,
        comments_limit = config.limits.comments_limit,
        concurrency = config.concurrency,
        "Starting aggregation pass"
    );

    let fetcher = Fetcher::with_cancellation(client, cancel_token);
    Aggregator::new(fetcher, config).get_correct_users().await
}
