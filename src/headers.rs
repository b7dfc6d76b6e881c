use std::collections::BTreeMap;

use crate::config::OpenRouterConfig;
use crate::error::OpenRouterError;

pub const HEADER_AUTHORIZATION: &str = "authorization";
pub const HEADER_CONTENT_TYPE: &str = "content-type";
pub const HEADER_ACCEPT: &str = "accept";
pub const HEADER_REFERER: &str = "http-referer";
pub const HEADER_TITLE: &str = "x-title";

/// Build a deterministic header map for OpenRouter requests.
///
/// Streaming requests additionally ask for `text/event-stream`. Extra headers
/// from the config are applied last and may override the defaults.
pub fn build_headers(
    config: &OpenRouterConfig,
    stream: bool,
) -> Result<BTreeMap<String, String>, OpenRouterError> {
    let api_key = config.api_key.trim();
    if api_key.is_empty() {
        return Err(OpenRouterError::InvalidHeader(
            "API key is required".to_owned(),
        ));
    }

    let mut headers = BTreeMap::new();
    headers.insert(HEADER_AUTHORIZATION.to_owned(), format!("Bearer {api_key}"));
    headers.insert(
        HEADER_CONTENT_TYPE.to_owned(),
        "application/json".to_owned(),
    );
    headers.insert(HEADER_REFERER.to_owned(), config.referer.trim().to_owned());
    headers.insert(HEADER_TITLE.to_owned(), config.title.trim().to_owned());
    if stream {
        headers.insert(HEADER_ACCEPT.to_owned(), "text/event-stream".to_owned());
    }

    for (key, value) in &config.extra_headers {
        headers.insert(key.trim().to_ascii_lowercase(), value.trim().to_owned());
    }

    Ok(headers)
}
