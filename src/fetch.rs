//! Collection fetchers: one endpoint each, with an optional client-side limit.
//!
//! A limit of 0 means "no limit". Limits are applied after a successful fetch
//! by truncating the returned list; nothing is paginated server-side.

use crate::client::{ResourceRequest, ResourceSource, fetch_as};
use crate::error::{Error, Result};
use crate::types::{Comment, RawPost, RawUser};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Keep the first `limit` items, or all of them when `limit` is 0
pub fn apply_limit<T>(mut items: Vec<T>, limit: usize) -> Vec<T> {
    if limit > 0 {
        items.truncate(limit);
    }
    items
}

/// Wraps a [`ResourceSource`] with the four collection fetches.
///
/// Every fetch races the cancellation token; a cancelled token aborts the
/// in-flight request and returns [`Error::Cancelled`].
pub struct Fetcher<S> {
    source: S,
    cancel_token: CancellationToken,
}

impl<S: ResourceSource> Fetcher<S> {
    /// Create a fetcher that is never cancelled
    pub fn new(source: S) -> Self {
        Self::with_cancellation(source, CancellationToken::new())
    }

    /// Create a fetcher bound to `cancel_token`
    pub fn with_cancellation(source: S, cancel_token: CancellationToken) -> Self {
        Self {
            source,
            cancel_token,
        }
    }

    /// The underlying source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Whether the bound token has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }

    async fn fetch<T: serde::de::DeserializeOwned>(&self, request: ResourceRequest) -> Result<T> {
        if self.cancel_token.is_cancelled() {
            return Err(Error::Cancelled);
        }
        tokio::select! {
            _ = self.cancel_token.cancelled() => Err(Error::Cancelled),
            result = fetch_as(&self.source, request) => result,
        }
    }

    /// Fetch one user by id (`GET /users?id={id}`).
    ///
    /// # Errors
    /// [`Error::NotFound`] when the filter matches no record; otherwise whatever
    /// the source reports.
    pub async fn get_user(&self, user_id: u64) -> Result<RawUser> {
        let users: Vec<RawUser> = self
            .fetch(ResourceRequest::filtered("users", "id", user_id))
            .await?;
        users.into_iter().next().ok_or(Error::NotFound {
            resource: "user",
            id: user_id,
        })
    }

    /// Fetch users.
    ///
    /// With `limit == 0` this is one bulk `GET /users`, returned in response
    /// order. With `limit > 0` it fetches ids `1..=limit` one at a time, in
    /// ascending order; an id whose lookup fails is logged and left out, so the
    /// result may be shorter than `limit`. Only cancellation and other
    /// non-lookup failures abort the loop.
    pub async fn get_users(&self, limit: usize) -> Result<Vec<RawUser>> {
        if limit == 0 {
            let users: Vec<RawUser> = self.fetch(ResourceRequest::all("users")).await?;
            debug!(count = users.len(), "Fetched all users");
            return Ok(users);
        }

        let mut users = Vec::new();
        for user_id in 1..=limit as u64 {
            match self.get_user(user_id).await {
                Ok(user) => users.push(user),
                Err(e) if e.is_skippable() => {
                    warn!(user_id, code = e.error_code(), error = %e, "Skipping user");
                }
                Err(e) => return Err(e),
            }
        }
        debug!(requested = limit, count = users.len(), "Fetched users by id");
        Ok(users)
    }

    /// Fetch the posts of one user (`GET /posts?userId={id}`), keeping the
    /// first `limit` (0 = all).
    pub async fn get_posts(&self, user_id: u64, limit: usize) -> Result<Vec<RawPost>> {
        let posts: Vec<RawPost> = self
            .fetch(ResourceRequest::filtered("posts", "userId", user_id))
            .await?;
        Ok(apply_limit(posts, limit))
    }

    /// Fetch the comments of one post (`GET /comments?postId={id}`), keeping
    /// the first `limit` (0 = all). Comments are passed through untouched.
    pub async fn get_comments(&self, post_id: u64, limit: usize) -> Result<Vec<Comment>> {
        let comments: Vec<Comment> = self
            .fetch(ResourceRequest::filtered("comments", "postId", post_id))
            .await?;
        Ok(apply_limit(comments, limit))
    }
}
