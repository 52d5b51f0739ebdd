//! Post identifiers, drafts and presentation helpers.

use std::fmt;

use school_blog_api_types::{Category, Post};
use url::Url;

use crate::domain::error::DomainError;

/// Image served when a post has no cover.
pub const DEFAULT_COVER: &str = "defaultImage.jpg";

const UPLOADS_PREFIX: &str = "/uploads/";
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "webp"];

/// A caller-supplied post identifier that passed local validation.
///
/// Route parameters arrive as free text; the literals `undefined` and `null`
/// show up when a link was built from a missing value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostId(String);

impl PostId {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "undefined" || trimmed == "null" {
            return Err(DomainError::invalid_post_id(raw));
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(DomainError::invalid_post_id(raw));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cover file attached to a new post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Validated input for creating or updating a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub category: Category,
    pub content: String,
}

impl PostDraft {
    pub fn new(
        title: impl Into<String>,
        category: Category,
        content: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let title = title.into().trim().to_string();
        let content = content.into();
        if title.is_empty() {
            return Err(DomainError::validation("title must not be empty"));
        }
        if content.trim().is_empty() {
            return Err(DomainError::validation("content must not be empty"));
        }
        Ok(Self {
            title,
            category,
            content,
        })
    }
}

/// Posts matching `category`, in source order. `None` keeps everything.
pub fn filter_by_category(posts: &[Post], category: Option<Category>) -> Vec<&Post> {
    posts
        .iter()
        .filter(|post| category.is_none_or(|c| post.category == c))
        .collect()
}

/// Resolve the image URL for a post cover against the uploads root.
///
/// Missing covers fall back to [`DEFAULT_COVER`]; bare names without a known
/// image extension are assumed to be JPEGs.
pub fn cover_image_url(uploads: &Url, cover: Option<&str>) -> Url {
    let cover = cover.map(str::trim).filter(|c| !c.is_empty());
    let Some(cover) = cover else {
        return join_or_root(uploads, DEFAULT_COVER);
    };

    if cover.starts_with("http://") || cover.starts_with("https://") {
        if let Ok(url) = Url::parse(cover) {
            return url;
        }
    }

    let name = cover
        .strip_prefix(UPLOADS_PREFIX)
        .unwrap_or(cover)
        .trim_start_matches('/');
    if has_image_extension(name) {
        join_or_root(uploads, name)
    } else {
        join_or_root(uploads, &format!("{name}.jpg"))
    }
}

fn has_image_extension(name: &str) -> bool {
    name.rsplit_once('.').is_some_and(|(_, ext)| {
        IMAGE_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
    })
}

fn join_or_root(uploads: &Url, name: &str) -> Url {
    uploads.join(name).unwrap_or_else(|_| uploads.clone())
}
