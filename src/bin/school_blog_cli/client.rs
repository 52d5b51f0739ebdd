#![deny(clippy::all, clippy::pedantic)]

use std::sync::Arc;

use school_blog::application::api::{BlogApi, ClientError};
use school_blog::application::auth::{AuthError, AuthService};
use school_blog::application::error::OperationError;
use school_blog::application::feed::FeedService;
use school_blog::application::posts::PostService;
use school_blog::application::session::{SessionContext, SessionError, SessionStore};
use school_blog::config::{self, LoadError, Settings};
use school_blog::infra::error::InfraError;
use school_blog::infra::http::HttpBlogApi;
use school_blog::infra::session::FileSessionStore;
use thiserror::Error;

use crate::args::Cli;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Config(#[from] LoadError),
    #[error("{0}")]
    Infra(#[from] InfraError),
    #[error("{0}")]
    Session(#[from] SessionError),
    #[error("failed to set up http client: {0}")]
    Client(#[from] ClientError),
    #[error("{0}")]
    Operation(#[from] OperationError),
    #[error("{}", .0.user_message())]
    Auth(#[from] AuthError),
    #[error("password is required (use --password-file or SCHOOL_BLOG_PASSWORD)")]
    MissingPassword,
    #[error("failed to read input file {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to read stdin: {0}")]
    Stdin(std::io::Error),
    #[error("{0}")]
    Failed(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to render output: {0}")]
    Output(String),
}

/// Everything a command handler needs.
#[derive(Clone)]
pub struct Ctx {
    pub settings: Settings,
    pub session: SessionContext,
    pub api: Arc<dyn BlogApi>,
}

impl Ctx {
    pub fn new(settings: Settings, store: Arc<dyn SessionStore>) -> Result<Self, CliError> {
        let session = SessionContext::load(store)?;
        let api = HttpBlogApi::new(
            settings.api.base_url.clone(),
            settings.api.timeout,
            session.clone(),
        )?;
        Ok(Self {
            settings,
            session,
            api: Arc::new(api),
        })
    }

    /// Context backed by the session file named in `settings`.
    pub fn from_settings(settings: Settings) -> Result<Self, CliError> {
        let store = FileSessionStore::new(settings.session.file.clone());
        Self::new(settings, Arc::new(store))
    }

    pub fn feed(&self) -> FeedService {
        FeedService::new(self.api.clone())
    }

    pub fn posts(&self) -> PostService {
        PostService::new(self.api.clone())
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.api.clone(), self.session.clone())
    }
}

pub fn load_settings(cli: &Cli) -> Result<Settings, CliError> {
    Ok(config::load(cli.config_file.as_deref(), &cli.overrides)?)
}
