//! Wire types shared by the school blog client library and its CLI.
//!
//! The content service has shipped more than one post shape over time
//! (`_id` vs `id`, `imageUrl` vs `cover`). Everything here deserializes the
//! legacy spellings and serializes only the canonical ones.

mod auth;
mod category;
mod id;
mod post;

pub use auth::{
    ApiErrorBody, AuthResponse, AuthUser, Credentials, ForgotPasswordRequest, StatusResponse,
};
pub use category::{Category, ParseCategoryError};
pub use id::MissingIdError;
pub use post::{Author, Post, PostUpdateRequest};
