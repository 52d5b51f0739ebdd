//! Client library for the school blog content service.
//!
//! Layers follow the usual split: `domain` holds validated values,
//! `application` the page flows and the [`application::api::BlogApi`] port,
//! `infra` the HTTP, session-store and telemetry adapters.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub(crate) mod util;
