//! Shared test helpers: an in-memory [`ResourceSource`] seeded with
//! jsonplaceholder-shaped data.

use crate::client::{ResourceRequest, ResourceSource};
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Names of the ten seeded users, in id order
pub(crate) const USER_NAMES: [&str; 10] = [
    "Leanne Graham",
    "Ervin Howell",
    "Clementine Bauch",
    "Patricia Lebsack",
    "Chelsey Dietrich",
    "Mrs. Dennis Schulist",
    "Kurtis Weissnat",
    "Nicholas Runolfsdorf V",
    "Glenna Reichert",
    "Clementina DuBuque",
];

pub(crate) const POSTS_PER_USER: u64 = 10;
pub(crate) const COMMENTS_PER_POST: u64 = 5;

pub(crate) fn user_json(id: u64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "username": format!("user{}", id),
        "email": format!("user{}@example.com", id),
        "address": {
            "street": format!("Street {}", id),
            "suite": format!("Suite {}", id * 100),
            "city": format!("City {}", id),
            "zipcode": "00000",
            "geo": { "lat": "0", "lng": "0" }
        },
        "phone": "555-0100",
        "website": format!("site{}.example", id),
        "company": {
            "name": format!("Company {}", id),
            "catchPhrase": "n/a",
            "bs": "n/a"
        }
    })
}

pub(crate) fn post_json(id: u64, user_id: u64) -> Value {
    json!({
        "userId": user_id,
        "id": id,
        "title": format!("post number {} written by user {}", id, user_id),
        "body": format!("body of post {}", id)
    })
}

pub(crate) fn comment_json(id: u64, post_id: u64) -> Value {
    json!({
        "postId": post_id,
        "id": id,
        "name": format!("comment {}", id),
        "email": format!("commenter{}@example.com", id),
        "body": format!("comment body {}", id)
    })
}

/// In-memory source keyed by [`ResourceRequest`] display strings.
///
/// Unknown filtered requests answer `[]` (as the real API does), unknown
/// unfiltered paths answer 404.
#[derive(Default)]
pub(crate) struct StaticSource {
    routes: HashMap<String, Value>,
    failures: HashMap<String, Error>,
    calls: Mutex<Vec<String>>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl StaticSource {
    /// Ten users, ten posts each, five comments per post
    pub(crate) fn jsonplaceholder() -> Self {
        let mut source = Self::default();
        let users: Vec<Value> = USER_NAMES
            .iter()
            .zip(1u64..)
            .map(|(name, id)| user_json(id, name))
            .collect();

        for user in &users {
            let id = user["id"].as_u64().unwrap_or_default();
            source.insert(&format!("/users?id={}", id), json!([user]));

            let posts: Vec<Value> = (1..=POSTS_PER_USER)
                .map(|n| post_json((id - 1) * POSTS_PER_USER + n, id))
                .collect();
            for post in &posts {
                let post_id = post["id"].as_u64().unwrap_or_default();
                let comments: Vec<Value> = (1..=COMMENTS_PER_POST)
                    .map(|n| comment_json((post_id - 1) * COMMENTS_PER_POST + n, post_id))
                    .collect();
                source.insert(&format!("/comments?postId={}", post_id), json!(comments));
            }
            source.insert(&format!("/posts?userId={}", id), json!(posts));
        }
        source.insert("/users", json!(users));
        source
    }

    pub(crate) fn insert(&mut self, key: &str, value: Value) {
        self.routes.insert(key.to_string(), value);
    }

    pub(crate) fn fail(&mut self, key: &str, error: Error) {
        self.failures.insert(key.to_string(), error);
    }

    /// Sleep this long inside every fetch so concurrent calls overlap
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Every request seen, in call order
    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn respond(&self, key: &str, request: ResourceRequest) -> Result<Value> {
        if let Some(error) = self.failures.get(key) {
            return Err(clone_error(error));
        }
        match self.routes.get(key) {
            Some(value) => Ok(value.clone()),
            None if request.filter.is_some() => Ok(json!([])),
            None => Err(Error::Status {
                url: key.to_string(),
                status: 404,
            }),
        }
    }
}

#[async_trait]
impl ResourceSource for StaticSource {
    async fn fetch(&self, request: ResourceRequest) -> Result<Value> {
        let key = request.to_string();
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(key.clone());
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        self.respond(&key, request)
    }
}

// Error is not Clone (it wraps io::Error); tests only register lookup failures
fn clone_error(error: &Error) -> Error {
    match error {
        Error::NotFound { resource, id } => Error::NotFound {
            resource: *resource,
            id: *id,
        },
        Error::Transport { url, message } => Error::Transport {
            url: url.clone(),
            message: message.clone(),
        },
        Error::Status { url, status } => Error::Status {
            url: url.clone(),
            status: *status,
        },
        Error::Decode { url, message } => Error::Decode {
            url: url.clone(),
            message: message.clone(),
        },
        Error::Config { message, key } => Error::Config {
            message: message.clone(),
            key: key.clone(),
        },
        Error::Io(e) => Error::Io(std::io::Error::new(e.kind(), e.to_string())),
        Error::Cancelled => Error::Cancelled,
    }
}
