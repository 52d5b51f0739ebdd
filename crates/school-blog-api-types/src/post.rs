use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::Category;
use crate::id::{MissingIdError, require_id};

/// Author summary embedded in every post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAuthor")]
pub struct Author {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Deserialize)]
struct RawAuthor {
    #[serde(default, rename = "_id")]
    legacy_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    username: String,
    #[serde(default)]
    avatar: Option<String>,
}

impl TryFrom<RawAuthor> for Author {
    type Error = MissingIdError;

    fn try_from(raw: RawAuthor) -> Result<Self, Self::Error> {
        Ok(Self {
            id: require_id("author", [raw.id, raw.legacy_id])?,
            username: raw.username,
            avatar: raw.avatar,
        })
    }
}

/// Canonical post as returned by the content service.
///
/// Serializes only `id` and `cover`; accepts `_id` and `imageUrl` as well,
/// alone or alongside the canonical keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawPost")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub category: Category,
    /// HTML body.
    pub content: String,
    pub cover: Option<String>,
    pub author: Author,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<OffsetDateTime>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPost {
    #[serde(default, rename = "_id")]
    legacy_id: Option<String>,
    #[serde(default)]
    id: Option<String>,
    title: String,
    category: Category,
    #[serde(default)]
    content: String,
    #[serde(default)]
    cover: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    author: Author,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    updated_at: Option<OffsetDateTime>,
}

impl TryFrom<RawPost> for Post {
    type Error = MissingIdError;

    fn try_from(raw: RawPost) -> Result<Self, Self::Error> {
        Ok(Self {
            id: require_id("post", [raw.id, raw.legacy_id])?,
            title: raw.title,
            category: raw.category,
            content: raw.content,
            cover: raw.cover.or(raw.image_url),
            author: raw.author,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        })
    }
}

/// JSON body for `PUT /post/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostUpdateRequest {
    pub title: String,
    pub category: Category,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
}
