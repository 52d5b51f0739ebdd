use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use school_blog_api_types::{
    ApiErrorBody, AuthResponse, Category, Credentials, ForgotPasswordRequest, Post,
    PostUpdateRequest, StatusResponse,
};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::application::api::{BlogApi, ClientError};
use crate::application::session::SessionContext;
use crate::domain::posts::{CoverUpload, PostDraft, PostId};

/// Longest raw error body surfaced when the service did not send JSON.
const MAX_ERROR_TEXT: usize = 200;

/// [`BlogApi`] backed by `reqwest`.
///
/// The bearer token is read from the shared [`SessionContext`] on every
/// request, so a login performed through the same context takes effect
/// immediately.
#[derive(Clone)]
pub struct HttpBlogApi {
    client: Client,
    base: Url,
    session: SessionContext,
}

impl HttpBlogApi {
    pub fn new(
        base: Url,
        timeout: Option<Duration>,
        session: SessionContext,
    ) -> Result<Self, ClientError> {
        let mut builder = Client::builder().user_agent(Self::user_agent());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self {
            client,
            base,
            session,
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("school-blog/", env!("CARGO_PKG_VERSION"))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, ClientError> {
        let mut url = self
            .base
            .join(path)
            .map_err(|err| ClientError::InvalidInput(err.to_string()))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn auth_header(&self) -> Result<Option<HeaderValue>, ClientError> {
        self.session
            .token()
            .map(|token| {
                HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|err| ClientError::InvalidInput(err.to_string()))
            })
            .transpose()
    }

    fn request(&self, method: Method, url: Url) -> Result<RequestBuilder, ClientError> {
        debug!(%method, %url, "dispatching request");
        let mut req = self.client.request(method, url);
        if let Some(value) = self.auth_header()? {
            req = req.header(AUTHORIZATION, value);
        }
        Ok(req)
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let resp = Self::check(req.send().await?).await?;
        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|err| ClientError::Decode(err.to_string()))
    }

    async fn send_unit(&self, req: RequestBuilder) -> Result<Response, ClientError> {
        Self::check(req.send().await?).await
    }

    async fn check(resp: Response) -> Result<Response, ClientError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound);
        }
        let text = resp.text().await.unwrap_or_default();
        Err(ClientError::rejected(status.as_u16(), error_message(&text)))
    }
}

fn error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(trimmed) {
        return parsed.into_message();
    }
    if trimmed.starts_with('<') {
        return None;
    }
    Some(trimmed.chars().take(MAX_ERROR_TEXT).collect())
}

fn cover_part(cover: CoverUpload) -> Result<Part, ClientError> {
    Part::bytes(cover.bytes)
        .file_name(cover.file_name)
        .mime_str(&cover.content_type)
        .map_err(|err| ClientError::InvalidInput(err.to_string()))
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Decode(error.to_string())
        } else if error.is_builder() {
            Self::InvalidInput(error.to_string())
        } else if let Some(status) = error.status() {
            Self::rejected(status.as_u16(), None)
        } else {
            Self::Transport(error.to_string())
        }
    }
}

#[async_trait]
impl BlogApi for HttpBlogApi {
    async fn list_posts(&self, category: Option<Category>) -> Result<Vec<Post>, ClientError> {
        let query: Vec<(&str, &str)> = category
            .map(|c| ("category", c.label()))
            .into_iter()
            .collect();
        let url = self.url("post", &query)?;
        self.send_json(self.request(Method::GET, url)?).await
    }

    async fn search_posts(
        &self,
        term: &str,
        category: Option<Category>,
    ) -> Result<Vec<Post>, ClientError> {
        let label = category.map(Category::label).unwrap_or_default();
        let url = self.url("search", &[("term", term), ("category", label)])?;
        self.send_json(self.request(Method::GET, url)?).await
    }

    async fn get_post(&self, id: &PostId) -> Result<Post, ClientError> {
        let url = self.url(&format!("post/{id}"), &[])?;
        self.send_json(self.request(Method::GET, url)?).await
    }

    async fn create_post(
        &self,
        draft: &PostDraft,
        cover: Option<CoverUpload>,
    ) -> Result<Post, ClientError> {
        let mut form = Form::new()
            .text("title", draft.title.clone())
            .text("category", draft.category.label())
            .text("content", draft.content.clone());
        if let Some(cover) = cover {
            form = form.part("cover", cover_part(cover)?);
        }
        let url = self.url("post", &[])?;
        self.send_json(self.request(Method::POST, url)?.multipart(form))
            .await
    }

    async fn update_post(
        &self,
        id: &PostId,
        update: &PostUpdateRequest,
    ) -> Result<Post, ClientError> {
        let url = self.url(&format!("post/{id}"), &[])?;
        self.send_json(self.request(Method::PUT, url)?.json(update))
            .await
    }

    async fn delete_post(&self, id: &PostId) -> Result<(), ClientError> {
        let url = self.url(&format!("post/{id}"), &[])?;
        self.send_unit(self.request(Method::DELETE, url)?).await?;
        Ok(())
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthResponse, ClientError> {
        let url = self.url("auth/login", &[])?;
        self.send_json(self.request(Method::POST, url)?.json(credentials))
            .await
    }

    async fn signup(&self, credentials: &Credentials) -> Result<AuthResponse, ClientError> {
        let url = self.url("auth/signup", &[])?;
        self.send_json(self.request(Method::POST, url)?.json(credentials))
            .await
    }

    async fn forgot_password(&self, email: &str) -> Result<Option<String>, ClientError> {
        let url = self.url("auth/forgot-password", &[])?;
        let body = ForgotPasswordRequest {
            email: email.to_string(),
        };
        let resp = self
            .send_unit(self.request(Method::POST, url)?.json(&body))
            .await?;
        let text = resp.text().await.unwrap_or_default();
        Ok(serde_json::from_str::<StatusResponse>(&text)
            .ok()
            .and_then(|status| status.message)
            .filter(|message| !message.trim().is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_error_bodies_surface_their_message() {
        assert_eq!(
            error_message(r#"{"message":"Title is required"}"#).as_deref(),
            Some("Title is required")
        );
    }

    #[test]
    fn html_and_empty_bodies_carry_no_message() {
        assert_eq!(error_message("   "), None);
        assert_eq!(error_message("<!DOCTYPE html><p>oops</p>"), None);
    }

    #[test]
    fn plain_text_bodies_are_truncated() {
        let long = "x".repeat(500);
        assert_eq!(error_message(&long).map(|m| m.len()), Some(MAX_ERROR_TEXT));
    }
}
