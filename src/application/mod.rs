//! Application services: page-level flows over the content API.

pub mod api;
pub mod auth;
pub mod error;
pub mod feed;
pub mod posts;
pub mod reveal;
pub mod search;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;
