//! In-memory [`BlogApi`] used by the service tests.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use school_blog_api_types::{
    AuthResponse, AuthUser, Category, Credentials, Post, PostUpdateRequest,
};
use time::macros::datetime;

use crate::application::api::{BlogApi, ClientError};
use crate::domain::posts::{CoverUpload, PostDraft, PostId};

pub(crate) fn post(id: &str, category: Category) -> Post {
    Post {
        id: id.to_string(),
        title: format!("post {id}"),
        category,
        content: format!("<p>{id}</p>"),
        cover: None,
        author: school_blog_api_types::Author {
            id: "author-1".into(),
            username: "ms.frizzle".into(),
            avatar: None,
        },
        created_at: datetime!(2024-10-01 12:30 UTC),
        updated_at: None,
    }
}

#[derive(Default)]
pub(crate) struct StubApi {
    posts: Vec<Post>,
    reject_status: Option<u16>,
    search_latency: Duration,
    reset_message: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl StubApi {
    pub(crate) fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts,
            ..Self::default()
        }
    }

    pub(crate) fn rejecting(status: u16) -> Self {
        Self {
            reject_status: Some(status),
            ..Self::default()
        }
    }

    pub(crate) fn search_latency(mut self, latency: Duration) -> Self {
        self.search_latency = latency;
        self
    }

    pub(crate) fn reset_message(mut self, message: &str) -> Self {
        self.reset_message = Some(message.to_string());
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: String) -> Result<(), ClientError> {
        self.calls.lock().expect("calls lock").push(call);
        match self.reject_status {
            Some(404) => Err(ClientError::NotFound),
            Some(status) => Err(ClientError::rejected(status, None)),
            None => Ok(()),
        }
    }

    fn find(&self, id: &PostId) -> Result<Post, ClientError> {
        self.posts
            .iter()
            .find(|p| p.id == id.as_str())
            .cloned()
            .ok_or(ClientError::NotFound)
    }
}

fn label(category: Option<Category>) -> &'static str {
    category.map_or("-", Category::label)
}

#[async_trait]
impl BlogApi for StubApi {
    async fn list_posts(&self, category: Option<Category>) -> Result<Vec<Post>, ClientError> {
        self.record(format!("list:{}", label(category)))?;
        Ok(self.posts.clone())
    }

    async fn search_posts(
        &self,
        term: &str,
        category: Option<Category>,
    ) -> Result<Vec<Post>, ClientError> {
        self.record(format!("search:{term}:{}", label(category)))?;
        if !self.search_latency.is_zero() {
            tokio::time::sleep(self.search_latency).await;
        }
        Ok(self
            .posts
            .iter()
            .filter(|p| p.title.contains(term))
            .cloned()
            .collect())
    }

    async fn get_post(&self, id: &PostId) -> Result<Post, ClientError> {
        self.record(format!("get:{id}"))?;
        self.find(id)
    }

    async fn create_post(
        &self,
        draft: &PostDraft,
        cover: Option<CoverUpload>,
    ) -> Result<Post, ClientError> {
        self.record(format!(
            "create:{}:{}",
            draft.title,
            cover.map_or_else(|| "-".to_string(), |c| c.file_name)
        ))?;
        let mut created = post("new-1", draft.category);
        created.title.clone_from(&draft.title);
        created.content.clone_from(&draft.content);
        Ok(created)
    }

    async fn update_post(
        &self,
        id: &PostId,
        update: &PostUpdateRequest,
    ) -> Result<Post, ClientError> {
        self.record(format!("update:{id}"))?;
        let mut updated = self.find(id)?;
        updated.title.clone_from(&update.title);
        updated.category = update.category;
        updated.content.clone_from(&update.content);
        Ok(updated)
    }

    async fn delete_post(&self, id: &PostId) -> Result<(), ClientError> {
        self.record(format!("delete:{id}"))?;
        self.find(id).map(|_| ())
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ClientError> {
        self.record(format!("login:{}", credentials.username))?;
        Ok(AuthResponse {
            token: format!("token-{}", credentials.username),
            user: Some(AuthUser {
                id: "u-42".into(),
                username: Some(credentials.username.clone()),
            }),
            id: None,
        })
    }

    async fn signup(&self, credentials: &Credentials) -> Result<AuthResponse, ClientError> {
        self.record(format!("signup:{}", credentials.username))?;
        Ok(AuthResponse {
            token: format!("token-{}", credentials.username),
            user: None,
            id: None,
        })
    }

    async fn forgot_password(&self, email: &str) -> Result<Option<String>, ClientError> {
        self.record(format!("forgot:{email}"))?;
        Ok(self.reset_message.clone())
    }
}
