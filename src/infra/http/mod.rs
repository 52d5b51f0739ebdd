//! HTTP adapter for the remote content service.

mod client;

pub use client::HttpBlogApi;
