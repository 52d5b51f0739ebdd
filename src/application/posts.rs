//! Single-post pages: read, create, edit, delete.

use std::sync::Arc;

use school_blog_api_types::{Post, PostUpdateRequest};
use serde::Serialize;
use time::OffsetDateTime;
use time::format_description::FormatItem;
use time::macros::format_description;
use tracing::{info, warn};
use url::Url;

use crate::application::api::BlogApi;
use crate::application::error::{Operation, OperationError, OperationResultExt};
use crate::domain::posts::{CoverUpload, PostDraft, PostId, cover_image_url};

const PUBLISHED_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year]");

/// A post as the detail page shows it.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub cover_url: String,
    pub published: String,
}

impl PostDetail {
    pub fn new(post: Post, uploads: &Url) -> Self {
        let cover_url = cover_image_url(uploads, post.cover.as_deref()).into();
        let published = published_label(post.created_at);
        Self {
            post,
            cover_url,
            published,
        }
    }
}

/// Render a creation date the way the post header does, e.g. "October 1, 2024".
pub fn published_label(timestamp: OffsetDateTime) -> String {
    timestamp
        .date()
        .format(PUBLISHED_FORMAT)
        .unwrap_or_else(|_| timestamp.date().to_string())
}

#[derive(Clone)]
pub struct PostService {
    api: Arc<dyn BlogApi>,
}

impl PostService {
    pub fn new(api: Arc<dyn BlogApi>) -> Self {
        Self { api }
    }

    pub async fn load(&self, raw_id: &str) -> Result<Post, OperationError> {
        let id = PostId::parse(raw_id).for_operation(Operation::LoadPost)?;
        let post = self
            .api
            .get_post(&id)
            .await
            .for_operation(Operation::LoadPost)
            .inspect_err(|err| warn!(post_id = %id, error = %err.source, "post load failed"))?;
        info!(post_id = %post.id, "post loaded");
        Ok(post)
    }

    pub async fn create(
        &self,
        draft: PostDraft,
        cover: Option<CoverUpload>,
    ) -> Result<Post, OperationError> {
        let post = self
            .api
            .create_post(&draft, cover)
            .await
            .for_operation(Operation::CreatePost)
            .inspect_err(|err| warn!(error = %err.source, "post creation failed"))?;
        info!(post_id = %post.id, category = %post.category, "post created");
        Ok(post)
    }

    pub async fn update(
        &self,
        raw_id: &str,
        draft: PostDraft,
        cover: Option<String>,
    ) -> Result<Post, OperationError> {
        let id = PostId::parse(raw_id).for_operation(Operation::UpdatePost)?;
        let request = PostUpdateRequest {
            title: draft.title,
            category: draft.category,
            content: draft.content,
            cover,
        };
        let post = self
            .api
            .update_post(&id, &request)
            .await
            .for_operation(Operation::UpdatePost)
            .inspect_err(|err| warn!(post_id = %id, error = %err.source, "post update failed"))?;
        info!(post_id = %post.id, "post updated");
        Ok(post)
    }

    pub async fn delete(&self, raw_id: &str) -> Result<(), OperationError> {
        let id = PostId::parse(raw_id).for_operation(Operation::DeletePost)?;
        self.api
            .delete_post(&id)
            .await
            .for_operation(Operation::DeletePost)
            .inspect_err(|err| warn!(post_id = %id, error = %err.source, "post delete failed"))?;
        info!(post_id = %id, "post deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use school_blog_api_types::Category;
    use time::macros::datetime;

    use super::*;
    use crate::application::testing::{StubApi, post};

    fn service(api: &Arc<StubApi>) -> PostService {
        PostService::new(api.clone())
    }

    #[tokio::test]
    async fn malformed_id_never_reaches_the_service() {
        let api = Arc::new(StubApi::with_posts(vec![post("p1", Category::News)]));
        let posts = service(&api);

        for raw in ["", "undefined", "a/b"] {
            let err = posts.load(raw).await.expect_err("invalid id");
            assert_eq!(err.message, "Invalid post ID");
        }
        let err = posts.delete("undefined").await.expect_err("invalid id");
        assert_eq!(err.message, "Invalid post ID");
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_post_reports_not_found() {
        let api = Arc::new(StubApi::with_posts(vec![post("p1", Category::News)]));
        let err = service(&api).load("p2").await.expect_err("absent");
        assert_eq!(err.message, "Post not found");

        let found = service(&api).load("p1").await.expect("present");
        assert_eq!(found.id, "p1");
    }

    #[tokio::test]
    async fn create_passes_cover_along() {
        let api = Arc::new(StubApi::default());
        let draft = PostDraft::new("Field trip", Category::Learning, "<p>Zoo</p>").expect("draft");
        let cover = CoverUpload {
            file_name: "zoo.png".into(),
            content_type: "image/png".into(),
            bytes: vec![1, 2, 3],
        };

        let created = service(&api)
            .create(draft, Some(cover))
            .await
            .expect("created");
        assert_eq!(created.title, "Field trip");
        assert_eq!(api.calls(), ["create:Field trip:zoo.png"]);
    }

    #[tokio::test]
    async fn failures_use_page_messages() {
        let api = Arc::new(StubApi::rejecting(500));
        let draft = PostDraft::new("T", Category::News, "C").expect("draft");

        let err = service(&api)
            .update("p1", draft.clone(), None)
            .await
            .expect_err("update fails");
        assert_eq!(err.message, "Failed to update the post. Please try again.");

        let err = service(&api).delete("p1").await.expect_err("delete fails");
        assert_eq!(err.message, "Failed to delete post. Please try again later.");

        let err = service(&api).create(draft, None).await.expect_err("create fails");
        assert_eq!(
            err.message,
            "An error occurred while creating the post. Please try again."
        );
    }

    #[test]
    fn detail_resolves_cover_and_date() {
        let mut p = post("p1", Category::News);
        p.created_at = datetime!(2024-10-01 12:30 UTC);
        let uploads = Url::parse("http://localhost:4000/uploads/").expect("url");

        let detail = PostDetail::new(p, &uploads);
        assert_eq!(
            detail.cover_url,
            "http://localhost:4000/uploads/defaultImage.jpg"
        );
        assert_eq!(detail.published, "October 1, 2024");

        let json = serde_json::to_value(&detail).expect("json");
        assert_eq!(json["id"], "p1");
        assert_eq!(json["cover_url"], detail.cover_url);
    }
}
