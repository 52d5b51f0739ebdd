//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{num::NonZeroUsize, path::Path, path::PathBuf, str::FromStr, time::Duration};

use clap::{Args, ValueHint, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::application::reveal::ListRevealer;

const DEFAULT_CONFIG_BASENAME: &str = "config/school-blog";
const LOCAL_CONFIG_BASENAME: &str = "school-blog";
const ENV_PREFIX: &str = "SCHOOL_BLOG";
const DEFAULT_BASE_URL: &str = "http://localhost:4000";
const DEFAULT_UPLOADS_PATH: &str = "uploads/";
const DEFAULT_SESSION_FILE: &str = ".school-blog/session.json";
const DEFAULT_DEBOUNCE_MS: u64 = 300;
const DEFAULT_INITIAL_VISIBLE: usize = 4;
const DEFAULT_REVEAL_STEP: usize = 3;

/// Flags shared by every command that override file and environment values.
#[derive(Debug, Args, Default, Clone)]
pub struct SettingsOverrides {
    /// Base URL of the content service.
    #[arg(
        long = "site",
        env = "SCHOOL_BLOG_SITE_URL",
        value_name = "URL",
        value_hint = ValueHint::Url,
        global = true
    )]
    pub site: Option<String>,

    /// Where the login session is kept between runs.
    #[arg(
        long = "session-file",
        env = "SCHOOL_BLOG_SESSION_FILE",
        value_name = "PATH",
        value_hint = ValueHint::FilePath,
        global = true
    )]
    pub session_file: Option<PathBuf>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,
}

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api: ApiSettings,
    pub session: SessionSettings,
    pub search: SearchSettings,
    pub feed: FeedSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Always ends with `/` so relative joins stay under it.
    pub base_url: Url,
    pub uploads_url: Url,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub file: PathBuf,
}

#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub debounce: Duration,
}

#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub initial_visible: NonZeroUsize,
    pub reveal_step: NonZeroUsize,
}

impl FeedSettings {
    pub fn revealer(&self) -> ListRevealer {
        ListRevealer::new(self.initial_visible.get(), self.reveal_step.get())
    }
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(
    config_file: Option<&Path>,
    overrides: &SettingsOverrides,
) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = config_file {
        builder = builder.add_source(File::from(path).required(true));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(overrides);
    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    api: RawApiSettings,
    session: RawSessionSettings,
    search: RawSearchSettings,
    feed: RawFeedSettings,
    logging: RawLoggingSettings,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &SettingsOverrides) {
        if let Some(site) = overrides.site.as_ref() {
            self.api.base_url = Some(site.clone());
        }
        if let Some(file) = overrides.session_file.as_ref() {
            self.session.file = Some(file.clone());
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            api,
            session,
            search,
            feed,
            logging,
        } = raw;

        Ok(Self {
            api: build_api_settings(api)?,
            session: build_session_settings(session)?,
            search: build_search_settings(search)?,
            feed: build_feed_settings(feed)?,
            logging: build_logging_settings(logging)?,
        })
    }
}

fn build_api_settings(api: RawApiSettings) -> Result<ApiSettings, LoadError> {
    let base_url = parse_directory_url(
        "api.base_url",
        api.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL),
    )?;

    let uploads_url = match api.uploads_url.as_deref() {
        Some(raw) => parse_directory_url("api.uploads_url", raw)?,
        None => base_url
            .join(DEFAULT_UPLOADS_PATH)
            .map_err(|err| LoadError::invalid("api.uploads_url", err.to_string()))?,
    };

    let timeout = match api.timeout_seconds {
        Some(0) => {
            return Err(LoadError::invalid(
                "api.timeout_seconds",
                "must be greater than zero",
            ));
        }
        Some(seconds) => Some(Duration::from_secs(seconds)),
        None => None,
    };

    Ok(ApiSettings {
        base_url,
        uploads_url,
        timeout,
    })
}

fn build_session_settings(session: RawSessionSettings) -> Result<SessionSettings, LoadError> {
    let file = session
        .file
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));
    if file.as_os_str().is_empty() {
        return Err(LoadError::invalid("session.file", "must not be empty"));
    }
    Ok(SessionSettings { file })
}

fn build_search_settings(search: RawSearchSettings) -> Result<SearchSettings, LoadError> {
    let millis = search.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS);
    if millis == 0 {
        return Err(LoadError::invalid(
            "search.debounce_ms",
            "must be greater than zero",
        ));
    }
    Ok(SearchSettings {
        debounce: Duration::from_millis(millis),
    })
}

fn build_feed_settings(feed: RawFeedSettings) -> Result<FeedSettings, LoadError> {
    let initial_visible = non_zero_usize(
        feed.initial_visible.unwrap_or(DEFAULT_INITIAL_VISIBLE),
        "feed.initial_visible",
    )?;
    let reveal_step = non_zero_usize(
        feed.reveal_step.unwrap_or(DEFAULT_REVEAL_STEP),
        "feed.reveal_step",
    )?;
    Ok(FeedSettings {
        initial_visible,
        reveal_step,
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::WARN,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawApiSettings {
    base_url: Option<String>,
    uploads_url: Option<String>,
    timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSessionSettings {
    file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSearchSettings {
    debounce_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawFeedSettings {
    initial_visible: Option<usize>,
    reveal_step: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

/// Parse an http(s) URL and make sure its path ends with `/`.
fn parse_directory_url(key: &'static str, raw: &str) -> Result<Url, LoadError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|err| LoadError::invalid(key, format!("invalid URL `{raw}`: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(LoadError::invalid(key, "scheme must be http or https"));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn non_zero_usize(value: usize, key: &'static str) -> Result<NonZeroUsize, LoadError> {
    NonZeroUsize::new(value).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}
