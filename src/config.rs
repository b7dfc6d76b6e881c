use std::collections::BTreeMap;
use std::env;
use std::time::Duration;

use crate::url::DEFAULT_BASE_URL;

/// Referer sent with every request to identify the calling application.
pub const DEFAULT_REFERER: &str = "https://crates.io/crates/openrouter_client";
/// Application title sent with every request.
pub const DEFAULT_TITLE: &str = "OpenRouter Rust Client";
/// Ceiling for non-streaming calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub const ENV_API_KEY: &str = "OPENROUTER_API_KEY";
pub const ENV_BASE_URL: &str = "OPENROUTER_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "OPENROUTER_TIMEOUT_SECS";

/// Transport configuration for OpenRouter requests.
#[derive(Debug, Clone)]
pub struct OpenRouterConfig {
    /// Bearer token passed to `Authorization`.
    pub api_key: String,
    /// Base URL; endpoint paths are appended to it.
    pub base_url: String,
    /// `HTTP-Referer` identification header.
    pub referer: String,
    /// `X-Title` identification header.
    pub title: String,
    /// Total-duration ceiling for non-streaming calls. Never applied to streams.
    pub timeout: Option<Duration>,
    /// Connection establishment ceiling, applied to every call.
    pub connect_timeout: Option<Duration>,
    /// Maximum stall between two body chunks of a stream.
    pub stream_idle_timeout: Option<Duration>,
    /// Additional headers merged into request headers.
    pub extra_headers: BTreeMap<String, String>,
}

impl Default for OpenRouterConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            title: DEFAULT_TITLE.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
            connect_timeout: Some(DEFAULT_CONNECT_TIMEOUT),
            stream_idle_timeout: None,
            extra_headers: BTreeMap::new(),
        }
    }
}

impl OpenRouterConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Build a config from `OPENROUTER_*` environment variables.
    ///
    /// Unset or blank variables keep their defaults; an unparsable timeout is ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(api_key) = env_string_opt(ENV_API_KEY) {
            config.api_key = api_key;
        }
        if let Some(base_url) = env_string_opt(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        if let Some(secs) = env_string_opt(ENV_TIMEOUT_SECS).and_then(|v| v.trim().parse().ok()) {
            config.timeout = Some(Duration::from_secs(secs));
        }
        config
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = referer.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn with_stream_idle_timeout(mut self, timeout: Duration) -> Self {
        self.stream_idle_timeout = Some(timeout);
        self
    }

    pub fn insert_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(key.into(), value.into());
        self
    }

    pub fn with_headers(mut self, headers: impl IntoIterator<Item = (String, String)>) -> Self {
        self.extra_headers.extend(headers);
        self
    }
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}
