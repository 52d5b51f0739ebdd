//! Port describing the remote content service.

use async_trait::async_trait;
use school_blog_api_types::{AuthResponse, Category, Credentials, Post, PostUpdateRequest};
use thiserror::Error;

use crate::domain::error::DomainError;
use crate::domain::posts::{CoverUpload, PostDraft, PostId};

/// Failure talking to the content service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No response arrived (connect, DNS, TLS, timeout).
    #[error("transport failure: {0}")]
    Transport(String),
    /// The service answered with a non-success status.
    #[error("request rejected with status {status}")]
    Rejected { status: u16, message: Option<String> },
    #[error("invalid post id `{0}`")]
    InvalidId(String),
    #[error("resource not found")]
    NotFound,
    /// A response arrived but was not the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ClientError {
    pub fn rejected(status: u16, message: Option<String>) -> Self {
        Self::Rejected { status, message }
    }

    /// HTTP status when the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::NotFound => Some(404),
            _ => None,
        }
    }

    /// Message supplied by the service in its error body, if any.
    pub fn service_message(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

impl From<DomainError> for ClientError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::InvalidPostId(raw) => Self::InvalidId(raw),
            DomainError::Validation { message } => Self::InvalidInput(message),
        }
    }
}

/// Operations the pages need from the content service.
#[async_trait]
pub trait BlogApi: Send + Sync {
    async fn list_posts(&self, category: Option<Category>) -> Result<Vec<Post>, ClientError>;

    async fn search_posts(
        &self,
        term: &str,
        category: Option<Category>,
    ) -> Result<Vec<Post>, ClientError>;

    async fn get_post(&self, id: &PostId) -> Result<Post, ClientError>;

    async fn create_post(
        &self,
        draft: &PostDraft,
        cover: Option<CoverUpload>,
    ) -> Result<Post, ClientError>;

    async fn update_post(&self, id: &PostId, update: &PostUpdateRequest)
    -> Result<Post, ClientError>;

    async fn delete_post(&self, id: &PostId) -> Result<(), ClientError>;

    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ClientError>;

    async fn signup(&self, credentials: &Credentials) -> Result<AuthResponse, ClientError>;

    /// Returns the service's status message when it sent one.
    async fn forgot_password(&self, email: &str) -> Result<Option<String>, ClientError>;
}
