//! Core types for user-digest
//!
//! `Raw*` types mirror the API's wire format and only carry the fields the
//! report consumes; unknown fields are ignored. [`User`] and [`Post`] are the
//! projected report records.

use serde::{Deserialize, Serialize};

/// Marker appended to every cropped title
pub const TITLE_CROP_MARKER: &str = "...";

/// Number of title characters kept in [`Post::title_crop`]
pub const TITLE_CROP_CHARS: usize = 20;

/// A comment is passed through exactly as the API returned it
pub type Comment = serde_json::Value;

/// User record as returned by `/users`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawUser {
    /// User id
    pub id: u64,
    /// Full name
    pub name: String,
    /// Email address
    pub email: String,
    /// Postal address
    pub address: RawAddress,
    /// Website host without scheme (e.g., "anastasia.net")
    pub website: String,
    /// Employer
    pub company: RawCompany,
}

/// Nested address object of a [`RawUser`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawAddress {
    /// Street name
    pub street: String,
    /// Suite or apartment
    pub suite: String,
    /// City
    pub city: String,
}

/// Nested company object of a [`RawUser`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawCompany {
    /// Company display name
    pub name: String,
}

/// Post record as returned by `/posts`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawPost {
    /// Post id
    pub id: u64,
    /// Post title
    pub title: String,
    /// Post body
    pub body: String,
}

/// A user in the report
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// User id
    pub id: u64,
    /// Full name
    pub name: String,
    /// Email address
    pub email: String,
    /// `"{city}, {street}, {suite}"`
    pub address: String,
    /// `"https://"` followed by the raw website host
    pub website: String,
    /// Company display name
    pub company: String,
    /// The user's posts, attached by the aggregator
    #[serde(default)]
    pub posts: Vec<Post>,
}

impl User {
    /// Project a raw API user into the report shape, with no posts attached yet
    pub fn from_raw(raw: RawUser) -> Self {
        let RawUser {
            id,
            name,
            email,
            address,
            website,
            company,
        } = raw;

        Self {
            id,
            name,
            email,
            address: format!("{}, {}, {}", address.city, address.street, address.suite),
            website: format!("https://{}", website),
            company: company.name,
            posts: Vec::new(),
        }
    }
}

/// A post in the report
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Post id
    pub id: u64,
    /// Full title
    pub title: String,
    /// First 20 characters of the title followed by `...`
    pub title_crop: String,
    /// Post body
    pub body: String,
    /// Comments, only present on posts of the special user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,
}

impl Post {
    /// Project a raw API post into the report shape
    pub fn from_raw(raw: RawPost) -> Self {
        let title_crop = crop_title(&raw.title);
        Self {
            id: raw.id,
            title: raw.title,
            title_crop,
            body: raw.body,
            comments: None,
        }
    }
}

/// First [`TITLE_CROP_CHARS`] characters of `title` followed by the crop marker.
///
/// The marker is appended even when the title is shorter than the crop width.
pub fn crop_title(title: &str) -> String {
    let mut cropped: String = title.chars().take(TITLE_CROP_CHARS).collect();
    cropped.push_str(TITLE_CROP_MARKER);
    cropped
}
